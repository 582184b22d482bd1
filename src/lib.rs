/*!
 * record-store - SQLite storage core for a reactive data framework
 *
 * This crate is the embedded storage engine behind a client-side reactive
 * data framework. It wraps a single SQLite connection and layers on the
 * behaviors the framework needs to stay correct and fast:
 *
 * - a prepared-statement cache that amortizes parse cost across calls
 * - a per-table record identity cache tracking which records the host has
 *   already materialized, so repeated reads can return the record id alone
 * - transactional batch mutation with cache-coherent rollback
 * - schema installation and migration keyed off the SQLite user version
 * - query results shaped into the three forms the host consumes
 *   (dictionary-per-row, column+row arrays, id-only)
 *
 * The engine is synchronous and single-owner: the host serializes all calls
 * through one thread, and every operation runs to completion on the caller's
 * thread. Values cross the host boundary as [`HostValue`], never as driver
 * types.
 *
 * # Example
 *
 * ```rust,no_run
 * use record_store::prelude::*;
 *
 * fn run() -> Result<(), RecordStoreError> {
 *     let mut db = Database::open_in_memory()?;
 *     db.unsafe_reset_database(
 *         "create table posts (id text primary key, title text);
 *          create table local_storage (key text primary key, value text);",
 *         1,
 *     )?;
 *
 *     db.batch(&[BatchOperation::new(
 *         CacheBehavior::Add,
 *         "posts",
 *         "insert into posts (id, title) values (?, ?)",
 *         vec![vec![
 *             HostValue::Str("p1".into()),
 *             HostValue::Str("hello".into()),
 *         ]],
 *     )])?;
 *
 *     // "p1" was just written with a cache flag, so only the id comes back.
 *     let found = db.find("posts", "p1")?;
 *     assert_eq!(found.as_str(), Some("p1"));
 *     Ok(())
 * }
 * ```
 */

#![forbid(unsafe_code)]

// Core modules
pub mod error;
pub mod logging;
pub mod types;

// The SQLite engine itself
mod sqlite;

// Re-export everything that should be part of the public API
pub mod prelude {
    //! Convenient imports for common functionality.

    pub use crate::error::RecordStoreError;
    pub use crate::logging::{LogSink, TracingSink};
    pub use crate::types::HostValue;
    pub use crate::{BatchOperation, CacheBehavior, Database, StoreOptions, StoreOptionsBuilder};
}

pub use error::RecordStoreError;
pub use logging::{LogSink, TracingSink};
pub use sqlite::batch::{BatchOperation, CacheBehavior, decode_batch};
pub use sqlite::cache::{RecordCache, cache_key};
pub use sqlite::config::{StoreOptions, StoreOptionsBuilder};
pub use sqlite::connection::Database;
pub use types::HostValue;
