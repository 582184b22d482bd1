use record_store::prelude::*;

const SCHEMA: &str = "
    create table local_storage (key text primary key, value text);
";

fn fresh_db() -> Database {
    let mut db = Database::open_in_memory().unwrap();
    db.unsafe_reset_database(SCHEMA, 1).unwrap();
    db
}

#[test]
fn missing_key_is_host_null() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db();
    assert!(db.get_local("nope")?.is_null());
    Ok(())
}

#[test]
fn utf8_values_round_trip_exactly() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = fresh_db();
    let value = "héllo, 世界 - ütf8 ✓";

    db.batch(&[BatchOperation::new(
        CacheBehavior::Ignore,
        "",
        "insert into local_storage (key, value) values (?, ?)",
        vec![vec![
            HostValue::Str("greeting".into()),
            HostValue::Str(value.into()),
        ]],
    )])?;

    assert_eq!(db.get_local("greeting")?.as_str(), Some(value));
    Ok(())
}

#[test]
fn null_value_reads_as_host_null() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = fresh_db();

    db.batch(&[BatchOperation::new(
        CacheBehavior::Ignore,
        "",
        "insert into local_storage (key, value) values (?, ?)",
        vec![vec![HostValue::Str("empty".into()), HostValue::Null]],
    )])?;

    assert!(db.get_local("empty")?.is_null());
    Ok(())
}

#[test]
fn overwrite_takes_the_last_value() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = fresh_db();

    db.batch(&[BatchOperation::new(
        CacheBehavior::Ignore,
        "",
        "insert or replace into local_storage (key, value) values (?, ?)",
        vec![
            vec![HostValue::Str("k".into()), HostValue::Str("one".into())],
            vec![HostValue::Str("k".into()), HostValue::Str("two".into())],
        ],
    )])?;

    assert_eq!(db.get_local("k")?.as_str(), Some("two"));
    Ok(())
}
