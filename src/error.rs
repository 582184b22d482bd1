use thiserror::Error;

/// Errors surfaced by the storage engine.
///
/// Every failure a public operation can produce is one of these variants.
/// Errors raised inside an open transaction always roll it back before they
/// propagate, and every error is written to the connection's error sink
/// before it is returned so the cause survives even if a later failure
/// preempts it.
#[derive(Debug, Error)]
pub enum RecordStoreError {
    /// Underlying SQLite failure, tagged with the phase that failed.
    #[error("{context} - {source}")]
    Db {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("number of args passed to query doesn't match number of arg placeholders (expected {expected}, got {got})")]
    ArgMismatch { expected: usize, got: usize },

    #[error("invalid argument type ({kind}) for query")]
    InvalidArgType { kind: &'static str },

    #[error(
        "unable to fetch record from database - unsupported column type in `{column}` (blobs and custom sqlite types are not supported)"
    )]
    UnsupportedColumnType { column: String },

    #[error("failed to get ID of a record")]
    MissingId,

    #[error("incompatible migration set - expected database version {expected}, got {actual}")]
    MigrationPrecondition { expected: i64, actual: i64 },

    #[error("invalid table name: {0}")]
    InvalidTableName(String),

    #[error("malformed batch operation: {0}")]
    MalformedBatch(String),

    #[error("transaction state error: {0}")]
    TxState(&'static str),

    #[error("SQL execution error: {0}")]
    Execution(String),
}

impl RecordStoreError {
    /// Build a `map_err` adapter that tags a SQLite error with the failing phase.
    pub(crate) fn db(context: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::Db { context, source }
    }
}
