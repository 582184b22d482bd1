use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::RecordStoreError;
use crate::types::HostValue;

/// Convert one host argument to its SQLite binding.
///
/// The rules are strict: null binds NULL, strings bind TEXT (copied on
/// bind), numbers always bind REAL, booleans bind INTEGER 0/1. Arrays and
/// objects are not bindable.
fn host_value_to_sqlite(value: &HostValue) -> Result<Value, RecordStoreError> {
    match value {
        HostValue::Null => Ok(Value::Null),
        HostValue::Str(s) => Ok(Value::Text(s.clone())),
        HostValue::Num(n) => Ok(Value::Real(*n)),
        HostValue::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        HostValue::Arr(_) | HostValue::Obj(_) => {
            Err(RecordStoreError::InvalidArgType { kind: value.kind() })
        }
    }
}

/// Convert the host arguments for `stmt`, checking the placeholder count
/// first.
pub(crate) fn convert_args(
    stmt: &Statement<'_>,
    args: &[HostValue],
) -> Result<Vec<Value>, RecordStoreError> {
    let expected = stmt.parameter_count();
    if expected != args.len() {
        return Err(RecordStoreError::ArgMismatch {
            expected,
            got: args.len(),
        });
    }
    args.iter().map(host_value_to_sqlite).collect()
}
