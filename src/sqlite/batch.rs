use crate::error::RecordStoreError;
use crate::sqlite::cache::cache_key;
use crate::sqlite::connection::Database;
use crate::types::HostValue;

/// How a mutation interacts with the record identity cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBehavior {
    /// No cache interaction.
    Ignore,
    /// Mark the record as cached once the batch commits.
    Add,
    /// Drop the record from the cache once the batch commits.
    Remove,
}

impl CacheBehavior {
    fn from_wire(raw: f64) -> Result<Self, RecordStoreError> {
        match raw as i64 {
            0 => Ok(Self::Ignore),
            1 => Ok(Self::Add),
            -1 => Ok(Self::Remove),
            other => Err(RecordStoreError::MalformedBatch(format!(
                "unknown cache behavior {other}"
            ))),
        }
    }
}

/// One parameterized mutation in a batch: the same SQL applied once per
/// argument list, with an optional identity-cache annotation.
#[derive(Debug, Clone)]
pub struct BatchOperation {
    pub cache_behavior: CacheBehavior,
    /// Table for cache-key construction. Ignored when `cache_behavior` is
    /// [`CacheBehavior::Ignore`].
    pub table: String,
    pub sql: String,
    pub args_batches: Vec<Vec<HostValue>>,
}

impl BatchOperation {
    #[must_use]
    pub fn new(
        cache_behavior: CacheBehavior,
        table: impl Into<String>,
        sql: impl Into<String>,
        args_batches: Vec<Vec<HostValue>>,
    ) -> Self {
        Self {
            cache_behavior,
            table: table.into(),
            sql: sql.into(),
            args_batches,
        }
    }

    /// Decode one `[cacheBehavior, table, sql, argsBatches]` quadruple from
    /// the host wire format.
    ///
    /// # Errors
    /// Returns `RecordStoreError::MalformedBatch` if the quadruple does not
    /// have the expected shape.
    pub fn from_host(value: &HostValue) -> Result<Self, RecordStoreError> {
        let malformed = |what: &str| RecordStoreError::MalformedBatch(what.to_string());

        let fields = value
            .as_arr()
            .ok_or_else(|| malformed("operation is not an array"))?;
        let [behavior, table, sql, args_batches] = fields else {
            return Err(malformed("operation must have exactly four elements"));
        };

        let cache_behavior = CacheBehavior::from_wire(
            behavior
                .as_num()
                .ok_or_else(|| malformed("cache behavior is not a number"))?,
        )?;
        // The table slot carries anything (usually null) when there is no
        // cache interaction.
        let table = if cache_behavior == CacheBehavior::Ignore {
            String::new()
        } else {
            table
                .as_str()
                .ok_or_else(|| malformed("table is not a string"))?
                .to_string()
        };
        let sql = sql
            .as_str()
            .ok_or_else(|| malformed("sql is not a string"))?
            .to_string();

        let args_batches = args_batches
            .as_arr()
            .ok_or_else(|| malformed("args batches is not an array"))?
            .iter()
            .map(|args| {
                args.as_arr()
                    .map(<[HostValue]>::to_vec)
                    .ok_or_else(|| malformed("args list is not an array"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            cache_behavior,
            table,
            sql,
            args_batches,
        })
    }
}

/// Decode the host wire format for a whole batch: an array of operation
/// quadruples.
///
/// # Errors
/// Returns `RecordStoreError::MalformedBatch` if any quadruple is malformed.
pub fn decode_batch(operations: &HostValue) -> Result<Vec<BatchOperation>, RecordStoreError> {
    operations
        .as_arr()
        .ok_or_else(|| RecordStoreError::MalformedBatch("batch is not an array".to_string()))?
        .iter()
        .map(BatchOperation::from_host)
        .collect()
}

impl Database {
    /// Execute a compound list of parameterized mutations atomically.
    ///
    /// Every statement must complete without returning rows; any failure
    /// rolls the whole batch back. Identity-cache deltas collected along the
    /// way are applied only after the commit returns, additions first, so
    /// observers never see a cache state reflecting an uncommitted mutation.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if preparing, binding, or stepping any
    /// statement fails; the transaction is rolled back and the cache is left
    /// untouched.
    pub fn batch(&mut self, operations: &[BatchOperation]) -> Result<(), RecordStoreError> {
        let result = self.run_batch(operations);
        self.surface(result)
    }

    /// Decode the host wire format, then [`batch`](Self::batch).
    ///
    /// # Errors
    /// Returns `RecordStoreError::MalformedBatch` before any SQL runs if the
    /// wire data is malformed, otherwise as [`batch`](Self::batch).
    pub fn batch_from_host(&mut self, operations: &HostValue) -> Result<(), RecordStoreError> {
        let decoded = self.surface(decode_batch(operations))?;
        self.batch(&decoded)
    }

    fn run_batch(&mut self, operations: &[BatchOperation]) -> Result<(), RecordStoreError> {
        let mut added = Vec::new();
        let mut removed = Vec::new();

        self.with_exclusive_tx(|db| {
            for op in operations {
                for args in &op.args_batches {
                    db.execute_update(&op.sql, args)?;

                    let deltas = match op.cache_behavior {
                        CacheBehavior::Ignore => continue,
                        CacheBehavior::Add => &mut added,
                        CacheBehavior::Remove => &mut removed,
                    };
                    let id = args.first().and_then(HostValue::as_str).ok_or_else(|| {
                        RecordStoreError::MalformedBatch(
                            "record id for a cache-flagged operation must be a string".to_string(),
                        )
                    })?;
                    deltas.push(cache_key(&op.table, id));
                }
            }
            Ok(())
        })?;

        // The database changes are durable now; only now may the cache see
        // them.
        for key in added {
            self.records.mark_as_cached(key);
        }
        for key in &removed {
            self.records.remove_from_cache(key);
        }

        Ok(())
    }
}
