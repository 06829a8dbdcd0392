use mmirs_core::config::*;
use mmirs_core::errors::ConfigError;
use mmirs_core::models::{MergeOp, PoolKey, RetrieverType};

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = MmirsConfig::from_toml("").unwrap();

    let p = &config.preselection;
    assert_eq!(p.max_num_focus_relevant, 5000);
    assert_eq!(p.max_num_context_relevant, 5000);
    assert_eq!(p.max_num_relevant, 5000);
    assert_eq!(p.min_num_relevant, 500);
    assert_eq!(p.merge_op, MergeOp::Intersection);
    assert!(!p.weight_by_sim);
    assert!(!p.exact_context_retrieval);
    assert_eq!(p.top_k_similar, 10);
    assert_eq!(p.max_similar, 50);
    assert_eq!(p.shuffle_seed, None);

    assert!(config.feature_pools.is_empty());
    assert_eq!(config.observability.log_level, "info");
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[preselection]
merge_op = "union"
max_num_relevant = 1000
min_num_relevant = 100
shuffle_seed = 7

[feature_pools.coco.teran]
feats_root = "/data/coco/teran"
fn_prefix = "coco_"
pre_fetch = true
"#;
    let config = MmirsConfig::from_toml(toml).unwrap();
    assert_eq!(config.preselection.merge_op, MergeOp::Union);
    assert_eq!(config.preselection.max_num_relevant, 1000);
    assert_eq!(config.preselection.shuffle_seed, Some(7));
    // Non-overridden fields keep defaults
    assert_eq!(config.preselection.max_num_focus_relevant, 5000);

    let pool = &config.feature_pools["coco"]["teran"];
    assert_eq!(pool.fn_prefix, "coco_");
    assert!(pool.pre_fetch);
    assert_eq!(pool.num_workers, 8);
    assert_eq!(pool.id_width, None);
}

#[test]
fn merge_op_accepts_intersect_alias() {
    let config = MmirsConfig::from_toml("[preselection]\nmerge_op = \"intersect\"\n").unwrap();
    assert_eq!(config.preselection.merge_op, MergeOp::Intersection);
}

#[test]
fn unknown_merge_op_fails_fast() {
    let err = MmirsConfig::from_toml("[preselection]\nmerge_op = \"xor\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("xor"));
}

#[test]
fn min_above_max_is_rejected() {
    let toml = "[preselection]\nmax_num_relevant = 10\nmin_num_relevant = 11\n";
    let err = MmirsConfig::from_toml(toml).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn zero_cap_is_rejected() {
    let err = MmirsConfig::from_toml("[preselection]\nmax_num_relevant = 0\nmin_num_relevant = 0\n")
        .unwrap_err();
    assert!(err.to_string().contains("max_num_relevant"));
}

#[test]
fn unknown_retriever_name_is_rejected() {
    let toml = "[feature_pools.coco.clip]\nfeats_root = \"/x\"\n";
    let err = MmirsConfig::from_toml(toml).unwrap_err();
    assert!(matches!(err, ConfigError::UnknownRetriever { .. }));
}

#[test]
fn retriever_names_match_whole_words_only() {
    assert_eq!("TERAN".parse::<RetrieverType>().unwrap(), RetrieverType::Teran);
    assert!("teran_v2".parse::<RetrieverType>().is_err());
}

#[test]
fn zero_workers_are_rejected() {
    let toml = "[feature_pools.coco.teran]\nfeats_root = \"/x\"\nnum_workers = 0\n";
    assert!(MmirsConfig::from_toml(toml).is_err());
}

#[test]
fn pool_entries_lists_every_combination() {
    let toml = r#"
[feature_pools.coco.teran]
feats_root = "/c/t"

[feature_pools.coco.uniter]
feats_root = "/c/u"

[feature_pools.wicsmmir.teran]
feats_root = "/w/t"
"#;
    let config = MmirsConfig::from_toml(toml).unwrap();
    let keys: Vec<PoolKey> = config
        .pool_entries()
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        keys,
        vec![
            PoolKey::new("coco", RetrieverType::Teran),
            PoolKey::new("coco", RetrieverType::Uniter),
            PoolKey::new("wicsmmir", RetrieverType::Teran),
        ]
    );
}
