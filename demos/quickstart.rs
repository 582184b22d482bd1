// End-to-end tour: install a schema, write a batch, read it back in each of
// the result shapes.

use record_store::prelude::*;
use serde_json::Value as JsonValue;

fn main() -> Result<(), RecordStoreError> {
    let mut db = Database::open_in_memory()?;

    db.unsafe_reset_database(
        "create table posts (id text primary key, title text, likes real);
         create table local_storage (key text primary key, value text);",
        1,
    )?;

    db.batch(&[
        BatchOperation::new(
            CacheBehavior::Add,
            "posts",
            "insert into posts (id, title, likes) values (?, ?, ?)",
            vec![
                vec![
                    HostValue::Str("p1".into()),
                    HostValue::Str("first post".into()),
                    HostValue::Num(3.0),
                ],
                vec![
                    HostValue::Str("p2".into()),
                    HostValue::Str("second post".into()),
                    HostValue::Num(0.0),
                ],
            ],
        ),
        BatchOperation::new(
            CacheBehavior::Ignore,
            "",
            "insert into local_storage (key, value) values (?, ?)",
            vec![vec![
                HostValue::Str("last_sync".into()),
                HostValue::Str("never".into()),
            ]],
        ),
    ])?;

    // Both records were flagged as cached by the batch, so a query sends
    // back ids only.
    let cached = db.query("posts", "select * from posts order by id", &[])?;
    println!("already materialized: {}", JsonValue::from(cached));

    let total = db.count("select count(*) from posts", &[])?;
    println!("posts: {}", JsonValue::from(total));

    let last_sync = db.get_local("last_sync")?;
    println!("last sync: {}", JsonValue::from(last_sync));

    Ok(())
}
