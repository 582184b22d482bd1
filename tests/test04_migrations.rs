use record_store::prelude::*;

const SCHEMA: &str = "
    create table t (id text primary key, v text);
    create table local_storage (key text primary key, value text);
";

#[test]
fn migration_applies_script_and_bumps_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open_in_memory()?;
    db.unsafe_reset_database(SCHEMA, 3)?;

    db.migrate("alter table t add column w text;", 3, 4)?;
    assert_eq!(db.user_version()?, 4);

    // The new column is writable.
    db.batch(&[BatchOperation::new(
        CacheBehavior::Ignore,
        "",
        "insert into t (id, v, w) values (?, ?, ?)",
        vec![vec![
            HostValue::Str("a".into()),
            HostValue::Str("x".into()),
            HostValue::Str("wide".into()),
        ]],
    )])?;
    let rows = db.unsafe_query_raw("select w from t", &[])?;
    assert_eq!(
        rows.as_arr().unwrap()[0].get("w").and_then(HostValue::as_str),
        Some("wide")
    );

    Ok(())
}

#[test]
fn migration_from_wrong_version_fails_and_rolls_back() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open_in_memory()?;
    db.unsafe_reset_database(SCHEMA, 3)?;

    let result = db.migrate("alter table t add column w text;", 9, 10);
    assert!(matches!(
        result,
        Err(RecordStoreError::MigrationPrecondition {
            expected: 9,
            actual: 3
        })
    ));

    // Neither the script nor the version write survived.
    assert_eq!(db.user_version()?, 3);
    assert!(db.unsafe_query_raw("select w from t", &[]).is_err());

    Ok(())
}

#[test]
fn failing_migration_script_rolls_back_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open_in_memory()?;
    db.unsafe_reset_database(SCHEMA, 3)?;

    let result = db.migrate("alter table missing add column w text;", 3, 4);
    assert!(matches!(result, Err(RecordStoreError::Db { .. })));
    assert_eq!(db.user_version()?, 3);

    Ok(())
}

#[test]
fn user_version_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open_in_memory()?;

    assert_eq!(db.user_version()?, 0);
    db.set_user_version(42)?;
    assert_eq!(db.user_version()?, 42);

    Ok(())
}
