//! End-to-end: preselection feeding the feature pool.

use std::sync::Arc;

use mmirs_core::config::PreselectionConfig;
use mmirs_core::errors::Stage;
use mmirs_core::models::{ImageId, MergeOp, PoolKey, RetrieverType};
use mmirs_core::MmirsConfig;
use mmirs_pool::DataPoolFactory;
use mmirs_preselection::{
    ContextRanker, DatasetRankers, FocusRanker, PreselectionRequest, PreselectionStage,
    TermExpander,
};
use mmirs_runtime::tracing_setup::init_tracing_with_filter;
use mmirs_runtime::MmirsRuntime;
use test_fixtures::{CountingStoreOpener, FakeSemanticMatcher, FakeTermIndex, FakeTermSimilarity};

const POOLS: &str = r#"
    [preselection]
    shuffle_seed = 11

    [feature_pools.coco.teran]
    feats_root = "/unused"

    [feature_pools.coco.uniter]
    feats_root = "/unused"
"#;

fn stage(preselection: PreselectionConfig, context_hits: &[(&str, f32)]) -> PreselectionStage {
    let focus = FocusRanker::new(
        TermExpander::new(Arc::new(FakeTermSimilarity::new(["green"])), 10, 50),
        Arc::new(FakeTermIndex::new(&[
            ("green", "1", 5.0),
            ("green", "2", 4.0),
            ("green", "3", 3.0),
            ("green", "4", 2.0),
            ("green", "5", 1.0),
        ])),
    );
    let context = ContextRanker::new(Arc::new(FakeSemanticMatcher::new(context_hits)));
    PreselectionStage::new(preselection)
        .with_dataset("coco", DatasetRankers::new("coco", focus, context))
}

fn runtime(context_hits: &[(&str, f32)]) -> (MmirsRuntime, Arc<CountingStoreOpener>) {
    init_tracing_with_filter("mmirs=debug");
    let config = MmirsConfig::from_toml(POOLS).unwrap();
    let opener = Arc::new(CountingStoreOpener::new(
        &["000001", "000002", "000003", "000004", "000005", "000006"],
        2,
        4,
    ));
    let pools = DataPoolFactory::with_opener(&config, opener.clone()).unwrap();
    let stage = stage(config.preselection.clone(), context_hits);
    (MmirsRuntime::new(config, stage, pools), opener)
}

const CONTEXT: &[(&str, f32)] = &[
    ("000003", 0.9),
    ("000004", 0.8),
    ("000005", 0.7),
    ("000006", 0.6),
    ("000007", 0.5),
    ("000008", 0.4),
];

fn union_request(focus: &str) -> PreselectionRequest {
    PreselectionRequest::new(focus, "a green park next to a tall tower", "coco")
        .with_merge_op(MergeOp::Union)
        .with_bounds(100, 0)
}

#[test]
fn search_space_pairs_candidates_with_features() {
    let (rt, _) = runtime(CONTEXT);

    let space = rt
        .search_space(&union_request("green"), RetrieverType::Teran)
        .unwrap();

    assert_eq!(space.candidates.len(), 8);
    assert_eq!(space.features.len(), 6);
    let mut missing = space.features.missing().to_vec();
    missing.sort();
    assert_eq!(missing, vec![ImageId::from("000007"), ImageId::from("000008")]);
    for id in space.features.ids() {
        assert!(space.candidates.contains(id.as_str()));
    }
}

#[test]
fn no_candidates_means_no_features() {
    let (rt, opener) = runtime(&[]);

    let space = rt
        .search_space(&union_request("gyroscope"), RetrieverType::Teran)
        .unwrap();
    assert!(space.candidates.is_empty());
    assert!(space.features.is_empty());
    assert_eq!(opener.opens(), 1);
}

#[test]
fn unsupported_retriever_fails_in_pool_stage() {
    let (rt, _) = runtime(CONTEXT);

    let err = rt
        .search_space(&union_request("green"), RetrieverType::Uniter)
        .unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Pool));
    assert!(err.is_permanent());
}

#[test]
fn warm_start_builds_every_supported_pool_once() {
    let (rt, opener) = runtime(CONTEXT);

    assert_eq!(
        rt.available_pools(),
        vec![
            PoolKey::new("coco", RetrieverType::Teran),
            PoolKey::new("coco", RetrieverType::Uniter),
        ]
    );
    assert_eq!(rt.warm_start().unwrap(), 1);
    rt.search_space(&union_request("green"), RetrieverType::Teran)
        .unwrap();
    assert_eq!(opener.opens(), 1);
}

#[test]
fn clones_share_the_pool_cache() {
    let (rt, opener) = runtime(CONTEXT);
    let other = rt.clone();

    let a = rt.pool("coco", RetrieverType::Teran).unwrap();
    let b = other.pool("coco", RetrieverType::Teran).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(opener.opens(), 1);
}

#[test]
fn unknown_dataset_is_a_configuration_error() {
    let (rt, _) = runtime(CONTEXT);

    let err = rt
        .preselect(&PreselectionRequest::new("green", "park", "flickr"))
        .unwrap_err();
    assert!(err.is_permanent());
}
