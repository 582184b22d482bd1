use crate::error::RecordStoreError;
use crate::logging::{LogSink, TracingSink};
use crate::sqlite::connection::Database;

/// Default capacity of the prepared-statement cache. The working set is the
/// number of distinct SQL texts the host issues, which in practice stays far
/// below this.
pub const DEFAULT_STATEMENT_CACHE_CAPACITY: usize = 128;

/// Options for opening a record store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub db_path: String,
    pub statement_cache_capacity: usize,
}

impl StoreOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            statement_cache_capacity: DEFAULT_STATEMENT_CACHE_CAPACITY,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }
}

/// Fluent builder for opening a [`Database`].
pub struct StoreOptionsBuilder {
    opts: StoreOptions,
    logger: Box<dyn LogSink>,
}

impl StoreOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            opts: StoreOptions::new(db_path),
            logger: Box::new(TracingSink),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    #[must_use]
    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.opts.statement_cache_capacity = capacity;
        self
    }

    /// Replace the default `tracing`-backed sink with a host-supplied one.
    #[must_use]
    pub fn logger(mut self, logger: Box<dyn LogSink>) -> Self {
        self.logger = logger;
        self
    }

    /// Open the database with these options.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the file cannot be opened or the initial
    /// pragmas fail.
    pub fn open(self) -> Result<Database, RecordStoreError> {
        Database::open_with(self.opts, self.logger)
    }
}
