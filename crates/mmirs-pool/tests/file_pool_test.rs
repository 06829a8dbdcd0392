//! Pools backed by feature files on disk.

use std::path::Path;

use mmirs_core::models::{ImageId, RetrieverType};
use mmirs_core::MmirsConfig;
use mmirs_pool::DataPoolFactory;
use test_fixtures::{feature_values, write_feature_dir, write_feature_file};

fn config_for(root: &Path, pre_fetch: bool) -> MmirsConfig {
    let toml = format!(
        r#"
        [feature_pools.coco.teran]
        feats_root = "{}"
        fn_prefix = "COCO_"
        pre_fetch = {pre_fetch}
        num_workers = 2
        "#,
        root.display().to_string().replace('\\', "/")
    );
    MmirsConfig::from_toml(&toml).unwrap()
}

#[test]
fn empty_request_equals_request_for_every_known_id() {
    let dir = tempfile::tempdir().unwrap();
    write_feature_dir(dir.path(), "COCO_", &["000010", "000002", "000300"], 3, 4);
    let factory = DataPoolFactory::new(&config_for(dir.path(), false)).unwrap();
    let pool = factory.get_or_create("coco", RetrieverType::Teran).unwrap();

    let known = pool.known_ids();
    let explicit = pool.get_subset(known.as_slice()).unwrap();
    let whole = pool.get_all().unwrap();

    let a: Vec<&ImageId> = explicit.ids().collect();
    let b: Vec<&ImageId> = whole.ids().collect();
    assert_eq!(a, b);
    assert_eq!(whole.len(), 3);
}

#[test]
fn pre_fetch_and_lazy_pools_return_the_same_features() {
    let dir = tempfile::tempdir().unwrap();
    write_feature_dir(dir.path(), "COCO_", &["000001", "000002", "000003"], 2, 5);
    let eager = DataPoolFactory::new(&config_for(dir.path(), true)).unwrap();
    let lazy = DataPoolFactory::new(&config_for(dir.path(), false)).unwrap();

    let eager = eager.get_or_create("coco", RetrieverType::Teran).unwrap();
    let lazy = lazy.get_or_create("coco", RetrieverType::Teran).unwrap();
    assert!(eager.is_fully_resident());
    assert!(!lazy.is_fully_resident());

    let request = ["3", "000001", "42"];
    let from_eager = eager.get_subset(&request).unwrap();
    let from_lazy = lazy.get_subset(&request).unwrap();

    let eager_ids: Vec<&ImageId> = from_eager.ids().collect();
    let lazy_ids: Vec<&ImageId> = from_lazy.ids().collect();
    assert_eq!(eager_ids, lazy_ids);
    assert_eq!(from_eager.missing(), from_lazy.missing());
    assert_eq!(from_eager.missing(), &[ImageId::from("000042")]);
    for id in ["000001", "000003"] {
        assert_eq!(from_eager.get(id), from_lazy.get(id));
        assert_eq!(from_lazy.get(id).unwrap().data, feature_values(id, 2, 5));
    }
}

#[test]
fn corrupt_file_fails_pre_fetch_without_caching_the_pool() {
    let dir = tempfile::tempdir().unwrap();
    write_feature_dir(dir.path(), "COCO_", &["000001"], 1, 2);
    write_feature_file(&dir.path().join("COCO_000002.bin"), 2, 2, &[0.0]);
    let factory = DataPoolFactory::new(&config_for(dir.path(), true)).unwrap();

    let err = factory.get_or_create("coco", RetrieverType::Teran).unwrap_err();
    assert!(!err.is_permanent());
    assert!(err.to_string().contains("COCO_000002.bin"), "{err}");
    assert!(!factory.is_built("coco", RetrieverType::Teran));

    std::fs::remove_file(dir.path().join("COCO_000002.bin")).unwrap();
    let pool = factory.get_or_create("coco", RetrieverType::Teran).unwrap();
    assert_eq!(pool.get_all().unwrap().len(), 1);
}
