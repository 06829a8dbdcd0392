use std::collections::HashSet;

use mmirs_core::models::{DocumentScoreMap, ImageId, MergeOp};
use mmirs_preselection::merge::merge_with_rng;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn arb_scores() -> impl Strategy<Value = DocumentScoreMap> {
    prop::collection::vec((0u32..200, 0.0f64..100.0), 0..120).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(id, score)| (ImageId::new(id.to_string()), score))
            .collect()
    })
}

fn arb_merge_op() -> impl Strategy<Value = MergeOp> {
    prop_oneof![Just(MergeOp::Union), Just(MergeOp::Intersection)]
}

fn keys(m: &DocumentScoreMap) -> HashSet<ImageId> {
    m.ids().cloned().collect()
}

proptest! {
    #[test]
    fn result_never_exceeds_cap(
        focus in arb_scores(),
        context in arb_scores(),
        op in arb_merge_op(),
        max in 0usize..150,
        min in 0usize..150,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let out = merge_with_rng(&focus, &context, op, max, min, &mut rng);
        prop_assert!(out.len() <= max);
    }

    #[test]
    fn underfilled_intersection_equals_union_modulo_cap(
        focus in arb_scores(),
        context in arb_scores(),
        min in 0usize..150,
        seed in any::<u64>(),
    ) {
        let f = keys(&focus);
        let c = keys(&context);
        let inter: HashSet<ImageId> = f.intersection(&c).cloned().collect();
        prop_assume!(inter.len() < min);
        let union: HashSet<ImageId> = f.union(&c).cloned().collect();

        let max = 1000;
        let mut rng = StdRng::seed_from_u64(seed);
        let out = merge_with_rng(&focus, &context, MergeOp::Intersection, max, min, &mut rng);
        prop_assert_eq!(out.to_set(), union);
    }

    #[test]
    fn uncapped_result_is_exact_set_operation(
        focus in arb_scores(),
        context in arb_scores(),
        op in arb_merge_op(),
        min in 0usize..150,
        seed in any::<u64>(),
    ) {
        let f = keys(&focus);
        let c = keys(&context);
        let inter: HashSet<ImageId> = f.intersection(&c).cloned().collect();
        let expected: HashSet<ImageId> = match op {
            MergeOp::Intersection if inter.len() >= min => inter,
            _ => f.union(&c).cloned().collect(),
        };
        let max = expected.len();
        let mut rng = StdRng::seed_from_u64(seed);
        let out = merge_with_rng(&focus, &context, op, max, min, &mut rng);
        prop_assert!(!out.was_truncated());
        prop_assert_eq!(out.len(), expected.len());
        prop_assert_eq!(out.to_set(), expected);
    }

    #[test]
    fn capped_result_is_a_subset_without_duplicates(
        focus in arb_scores(),
        context in arb_scores(),
        max in 1usize..40,
        seed in any::<u64>(),
    ) {
        let union: HashSet<ImageId> = keys(&focus).union(&keys(&context)).cloned().collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let out = merge_with_rng(&focus, &context, MergeOp::Union, max, 0, &mut rng);
        prop_assert_eq!(out.len(), union.len().min(max));
        prop_assert_eq!(out.to_set().len(), out.len());
        prop_assert!(out.to_set().is_subset(&union));
    }
}
