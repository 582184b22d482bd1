// SQLite engine - coordination layer between SQLite and the host runtime
//
// This module is split into several sub-modules for better organization:
// - config: open options and builder
// - connection: the Database handle, pragmas, teardown
// - executor: low-level prepare/bind/step primitives
// - params: host argument binding with strict type rules
// - rows: shaping a result row into host values
// - cache: per-table record identity cache
// - transaction: begin/commit/rollback discipline
// - batch: atomic compound mutations with deferred cache deltas
// - schema: install, reset, migrations
// - query: the public read operations

pub mod batch;
pub mod cache;
pub mod config;
pub mod connection;
mod executor;
mod params;
mod query;
mod rows;
mod schema;
mod transaction;
