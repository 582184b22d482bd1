use std::fmt;

use rusqlite::Connection;

use crate::error::RecordStoreError;
use crate::logging::{LogSink, TracingSink};
use crate::sqlite::cache::{RecordCache, cache_key};
use crate::sqlite::config::StoreOptions;

/// Single-owner handle to one SQLite database.
///
/// Owns the underlying connection, the prepared-statement cache, and the
/// record identity cache. The handle is not shared: the host serializes all
/// calls through one thread, and every operation runs to completion
/// synchronously on the caller's thread.
///
/// Dropping the handle finalizes every cached statement and closes the
/// connection.
pub struct Database {
    pub(crate) conn: Connection,
    pub(crate) records: RecordCache,
    pub(crate) log: Box<dyn LogSink>,
    pub(crate) in_transaction: bool,
}

impl Database {
    /// Open the database at `db_path` with default options, logging through
    /// the `tracing` facade. Use `:memory:` for an in-memory database.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the file cannot be opened or the initial
    /// pragmas fail.
    pub fn open(db_path: &str) -> Result<Self, RecordStoreError> {
        Self::open_with(StoreOptions::new(db_path), Box::new(TracingSink))
    }

    /// Open a fresh in-memory database with default options.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the initial pragmas fail.
    pub fn open_in_memory() -> Result<Self, RecordStoreError> {
        Self::open_with(StoreOptions::in_memory(), Box::new(TracingSink))
    }

    pub(crate) fn open_with(
        opts: StoreOptions,
        log: Box<dyn LogSink>,
    ) -> Result<Self, RecordStoreError> {
        let conn = Connection::open(&opts.db_path)
            .map_err(RecordStoreError::db("Failed to open database"))?;
        conn.set_prepared_statement_cache_capacity(opts.statement_cache_capacity);

        let db = Self {
            conn,
            records: RecordCache::default(),
            log,
            in_transaction: false,
        };

        // Android hosts may lack a usable temp directory for large batches;
        // the temp store has to live in memory there.
        if cfg!(target_os = "android") {
            db.execute_multiple("pragma temp_store = memory;")?;
        }

        db.execute_multiple("pragma journal_mode = WAL;")?;

        Ok(db)
    }

    /// Whether the host has already received a full materialization of
    /// `(table, id)`.
    #[must_use]
    pub fn is_cached(&self, table: &str, id: &str) -> bool {
        self.records.is_cached(&cache_key(table, id))
    }

    pub(crate) fn ensure_not_in_tx(&self, ctx: &'static str) -> Result<(), RecordStoreError> {
        if self.in_transaction {
            Err(RecordStoreError::Execution(format!(
                "transaction in progress; operation not permitted ({ctx})"
            )))
        } else {
            Ok(())
        }
    }

    /// Write `result`'s error to the host error sink before handing it back.
    pub(crate) fn surface<T>(
        &self,
        result: Result<T, RecordStoreError>,
    ) -> Result<T, RecordStoreError> {
        if let Err(error) = &result {
            self.log.error(&error.to_string());
        }
        result
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("conn", &self.conn)
            .field("records", &self.records)
            .field("in_transaction", &self.in_transaction)
            .finish_non_exhaustive()
    }
}
