use rusqlite::Row;
use rusqlite::types::ValueRef;

use crate::error::RecordStoreError;
use crate::types::HostValue;

/// Read one column of the current row as a host value.
///
/// INTEGER widens from 64-bit to double; values beyond 2^53 lose precision
/// without erroring. BLOB and custom column types are rejected.
fn column_host_value(
    row: &Row<'_>,
    idx: usize,
    column: &str,
) -> Result<HostValue, RecordStoreError> {
    let value = row
        .get_ref(idx)
        .map_err(RecordStoreError::db("Failed to read a column for query"))?;
    match value {
        ValueRef::Integer(i) => Ok(HostValue::Num(i as f64)),
        ValueRef::Real(f) => Ok(HostValue::Num(f)),
        ValueRef::Text(bytes) => Ok(HostValue::Str(String::from_utf8_lossy(bytes).into_owned())),
        ValueRef::Null => Ok(HostValue::Null),
        ValueRef::Blob(_) => Err(RecordStoreError::UnsupportedColumnType {
            column: column.to_string(),
        }),
    }
}

/// Dictionary shape: column name to value, in column order.
pub(crate) fn result_dictionary(
    row: &Row<'_>,
    columns: &[String],
) -> Result<HostValue, RecordStoreError> {
    let mut dictionary = Vec::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        dictionary.push((column.clone(), column_host_value(row, idx, column)?));
    }
    Ok(HostValue::Obj(dictionary))
}

/// Positional shape: values in column order.
pub(crate) fn result_array(
    row: &Row<'_>,
    columns: &[String],
) -> Result<HostValue, RecordStoreError> {
    let mut values = Vec::with_capacity(columns.len());
    for (idx, column) in columns.iter().enumerate() {
        values.push(column_host_value(row, idx, column)?);
    }
    Ok(HostValue::Arr(values))
}

/// Column header shape: the column names, in order.
pub(crate) fn result_columns(columns: &[String]) -> HostValue {
    HostValue::Arr(
        columns
            .iter()
            .map(|column| HostValue::Str(column.clone()))
            .collect(),
    )
}

/// The record id of the current row.
///
/// The first result column must be named exactly `id` and hold a non-null
/// string.
pub(crate) fn row_id(row: &Row<'_>, columns: &[String]) -> Result<String, RecordStoreError> {
    if columns.first().map(String::as_str) != Some("id") {
        return Err(RecordStoreError::MissingId);
    }
    let value = row
        .get_ref(0)
        .map_err(RecordStoreError::db("Failed to read a column for query"))?;
    match value {
        ValueRef::Text(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        _ => Err(RecordStoreError::MissingId),
    }
}
