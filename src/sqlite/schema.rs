use rusqlite::config::DbConfig;

use crate::error::RecordStoreError;
use crate::sqlite::connection::Database;
use crate::sqlite::executor::prepare;

impl Database {
    /// Current schema version, read from the SQLite user-version slot.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the pragma cannot be read.
    pub fn user_version(&self) -> Result<i64, RecordStoreError> {
        let result = self.read_user_version();
        self.surface(result)
    }

    fn read_user_version(&self) -> Result<i64, RecordStoreError> {
        let mut stmt = prepare(&self.conn, "pragma user_version")?;
        stmt.query_row([], |row| row.get(0))
            .map_err(RecordStoreError::db("Failed to get a row for query"))
    }

    /// Write the SQLite user-version slot.
    ///
    /// The pragma does not accept placeholders; the version is an integer
    /// and safe to inline.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the pragma cannot be written.
    pub fn set_user_version(&self, version: i64) -> Result<(), RecordStoreError> {
        let result = self.execute_update(&format!("pragma user_version = {version}"), &[]);
        self.surface(result)
    }

    /// Apply a migration script, moving the schema from `from_version` to
    /// `to_version` atomically.
    ///
    /// The current user version must equal `from_version`; anything else
    /// means the caller selected the wrong migration set.
    ///
    /// # Errors
    /// Returns `RecordStoreError::MigrationPrecondition` on a version
    /// mismatch, or another `RecordStoreError` if the script fails; either
    /// way the transaction is rolled back and the version is unchanged.
    pub fn migrate(
        &mut self,
        migration_sql: &str,
        from_version: i64,
        to_version: i64,
    ) -> Result<(), RecordStoreError> {
        let result = self.apply_migration(migration_sql, from_version, to_version);
        self.surface(result)
    }

    fn apply_migration(
        &mut self,
        migration_sql: &str,
        from_version: i64,
        to_version: i64,
    ) -> Result<(), RecordStoreError> {
        self.with_exclusive_tx(|db| {
            let current = db.read_user_version()?;
            if current != from_version {
                return Err(RecordStoreError::MigrationPrecondition {
                    expected: from_version,
                    actual: current,
                });
            }
            db.execute_multiple(migration_sql)?;
            db.execute_update(&format!("pragma user_version = {to_version}"), &[])
        })
    }

    /// Wipe the database and install a fresh schema at `schema_version`.
    ///
    /// Selecting tables out of `sqlite_master` and dropping them stopped
    /// working once platforms began shipping SQLite with defensive mode on;
    /// the reset-database config flag is the supported route. Vacuum cannot
    /// run inside a transaction, so the wipe happens before the schema
    /// install transaction opens. The record identity cache is cleared with
    /// the data, and the prepared-statement cache is flushed since every
    /// compiled statement refers to dropped schema.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if reset mode cannot be toggled, the
    /// vacuum fails, or the schema script fails (the install transaction is
    /// rolled back).
    pub fn unsafe_reset_database(
        &mut self,
        schema: &str,
        schema_version: i64,
    ) -> Result<(), RecordStoreError> {
        let result = self.reset_database(schema, schema_version);
        self.surface(result)
    }

    fn reset_database(&mut self, schema: &str, schema_version: i64) -> Result<(), RecordStoreError> {
        self.ensure_not_in_tx("reset database")?;

        self.conn
            .set_db_config(DbConfig::SQLITE_DBCONFIG_RESET_DATABASE, true)
            .map_err(RecordStoreError::db("Failed to enable reset database mode"))?;
        self.execute_multiple("vacuum")?;
        self.conn
            .set_db_config(DbConfig::SQLITE_DBCONFIG_RESET_DATABASE, false)
            .map_err(RecordStoreError::db("Failed to disable reset database mode"))?;

        self.conn.flush_prepared_statement_cache();

        self.with_exclusive_tx(|db| {
            db.records.clear();
            db.execute_multiple(schema)?;
            db.execute_update(&format!("pragma user_version = {schema_version}"), &[])
        })
    }
}
