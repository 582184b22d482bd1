use record_store::prelude::*;

const SCHEMA: &str = "
    create table t (id text primary key, v text);
    create table local_storage (key text primary key, value text);
";

fn seeded_db() -> Database {
    let mut db = Database::open_in_memory().unwrap();
    db.unsafe_reset_database(SCHEMA, 1).unwrap();
    db.batch(&[BatchOperation::new(
        CacheBehavior::Ignore,
        "",
        "insert into t values (?, ?)",
        vec![vec![HostValue::Str("a".into()), HostValue::Str("x".into())]],
    )])
    .unwrap();
    // Materialize the record so it lands in the identity cache.
    db.find("t", "a").unwrap();
    assert!(db.is_cached("t", "a"));
    db
}

#[test]
fn failed_batch_leaves_cache_and_rows_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db();

    // The delete runs, then the second operation fails to prepare; the whole
    // batch must roll back.
    let result = db.batch(&[
        BatchOperation::new(
            CacheBehavior::Remove,
            "t",
            "delete from t where id = ?",
            vec![vec![HostValue::Str("a".into())]],
        ),
        BatchOperation::new(
            CacheBehavior::Ignore,
            "",
            "this is not sql",
            vec![vec![]],
        ),
    ]);
    assert!(matches!(result, Err(RecordStoreError::Db { .. })));

    // Cache state is byte-identical to before the batch.
    assert!(db.is_cached("t", "a"));
    // And the row survived the rolled-back delete.
    let rows = db.unsafe_query_raw("select * from t", &[])?;
    assert_eq!(rows.as_arr().unwrap().len(), 1);

    Ok(())
}

#[test]
fn failed_batch_discards_pending_additions() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db();

    let result = db.batch(&[
        BatchOperation::new(
            CacheBehavior::Add,
            "t",
            "insert into t values (?, ?)",
            vec![vec![HostValue::Str("b".into()), HostValue::Str("y".into())]],
        ),
        // Fails on step: duplicate primary key.
        BatchOperation::new(
            CacheBehavior::Add,
            "t",
            "insert into t values (?, ?)",
            vec![vec![HostValue::Str("a".into()), HostValue::Str("z".into())]],
        ),
    ]);
    assert!(matches!(result, Err(RecordStoreError::Db { .. })));

    assert!(!db.is_cached("t", "b"), "pending addition was discarded");
    let total = db.count("select count(*) from t", &[])?;
    assert_eq!(total.as_num(), Some(1.0));

    Ok(())
}

#[test]
fn connection_is_usable_after_rollback() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = seeded_db();

    let _ = db.batch(&[BatchOperation::new(
        CacheBehavior::Ignore,
        "",
        "this is not sql",
        vec![vec![]],
    )]);

    // A fresh transaction opens cleanly after the rollback.
    db.batch(&[BatchOperation::new(
        CacheBehavior::Add,
        "t",
        "insert into t values (?, ?)",
        vec![vec![HostValue::Str("c".into()), HostValue::Str("w".into())]],
    )])?;
    assert!(db.is_cached("t", "c"));

    Ok(())
}
