use rusqlite::{CachedStatement, Connection, Statement, params_from_iter};

use crate::error::RecordStoreError;
use crate::sqlite::connection::Database;
use crate::sqlite::params::convert_args;
use crate::types::HostValue;

/// Fetch the prepared statement for `sql`, compiling it on first use.
///
/// Statements come out of the connection's cache and return to it when
/// dropped; the drop also resets them, so a statement whose bind or step
/// failed is clean before the error propagates.
pub(crate) fn prepare<'conn>(
    conn: &'conn Connection,
    sql: &str,
) -> Result<CachedStatement<'conn>, RecordStoreError> {
    conn.prepare_cached(sql)
        .map_err(RecordStoreError::db("Failed to prepare query statement"))
}

/// Column names, captured before the statement is positioned on a row.
pub(crate) fn column_names(stmt: &Statement<'_>) -> Vec<String> {
    stmt.column_names().into_iter().map(str::to_owned).collect()
}

impl Database {
    /// Run one parameterized statement that must not return rows.
    pub(crate) fn execute_update(
        &self,
        sql: &str,
        args: &[HostValue],
    ) -> Result<(), RecordStoreError> {
        let mut stmt = prepare(&self.conn, sql)?;
        let params = convert_args(&stmt, args)?;
        stmt.execute(params_from_iter(params))
            .map_err(RecordStoreError::db("Failed to execute db update"))?;
        Ok(())
    }

    /// Run a multi-statement SQL script, as used by schema installation and
    /// migrations.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if any statement in the script fails.
    pub fn execute_multiple(&self, sql: &str) -> Result<(), RecordStoreError> {
        self.conn
            .execute_batch(sql)
            .map_err(RecordStoreError::db("Failed to execute statements"))
    }
}
