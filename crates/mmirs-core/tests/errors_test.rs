use mmirs_core::errors::*;

#[test]
fn not_implemented_pool_carries_dataset_and_retriever() {
    let err = PoolError::NotImplemented {
        dataset: "coco".into(),
        retriever: "uniter".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("coco"));
    assert!(msg.contains("uniter"));
}

#[test]
fn unknown_merge_op_carries_value() {
    let err = ConfigError::UnknownMergeOp {
        value: "xor".into(),
    };
    assert!(err.to_string().contains("xor"));
}

#[test]
fn config_errors_are_permanent() {
    let err: MmirsError = ConfigError::UnknownMergeOp {
        value: "xor".into(),
    }
    .into();
    assert!(err.is_permanent());
}

#[test]
fn not_implemented_pool_is_permanent_but_io_is_not() {
    let permanent: MmirsError = PoolError::NotImplemented {
        dataset: "coco".into(),
        retriever: "uniter".into(),
    }
    .into();
    assert!(permanent.is_permanent());

    let transient: MmirsError = PoolError::RootUnreadable {
        path: "/nope".into(),
        reason: "missing".into(),
    }
    .into();
    assert!(!transient.is_permanent());
}

#[test]
fn external_failures_are_not_permanent() {
    let err = MmirsError::external("sbert", "timeout");
    assert!(!err.is_permanent());
    assert!(err.to_string().contains("sbert"));
    assert!(err.to_string().contains("timeout"));
}

#[test]
fn in_stage_tags_origin() {
    let err = MmirsError::external("faiss", "unavailable").in_stage(Stage::Context);
    assert_eq!(err.stage(), Some(Stage::Context));
    assert!(err.to_string().starts_with("context stage failed"));
}

#[test]
fn in_stage_keeps_innermost_stage() {
    let err = MmirsError::external("wtf-idf", "down")
        .in_stage(Stage::Focus)
        .in_stage(Stage::Merge);
    assert_eq!(err.stage(), Some(Stage::Focus));
}

#[test]
fn staged_permanence_follows_source() {
    let err: MmirsError = MmirsError::from(ConfigError::UnknownRetriever {
        value: "clip".into(),
    })
    .in_stage(Stage::Pool);
    assert!(err.is_permanent());
}

// --- From impls ---

#[test]
fn pool_error_converts_to_mmirs_error() {
    let err: MmirsError = PoolError::LockPoisoned {
        reason: "boom".into(),
    }
    .into();
    assert!(matches!(err, MmirsError::Pool(_)));
}

#[test]
fn retrieval_error_converts_to_mmirs_error() {
    let err: MmirsError = RetrievalError::DimensionMismatch {
        expected: 768,
        actual: 384,
    }
    .into();
    assert!(matches!(err, MmirsError::Retrieval(_)));
    assert!(err.to_string().contains("768"));
}

#[test]
fn io_error_converts_to_mmirs_error() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err: MmirsError = io.into();
    assert!(matches!(err, MmirsError::Io(_)));
}
