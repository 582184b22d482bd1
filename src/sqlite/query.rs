use rusqlite::params_from_iter;

use crate::error::RecordStoreError;
use crate::sqlite::cache::cache_key;
use crate::sqlite::connection::Database;
use crate::sqlite::executor::{column_names, prepare};
use crate::sqlite::params::convert_args;
use crate::sqlite::rows::{result_array, result_columns, result_dictionary, row_id};
use crate::types::HostValue;

/// Table names originate in trusted schema metadata, but backticks and the
/// cache-key delimiter are rejected outright.
fn checked_table_name(table: &str) -> Result<&str, RecordStoreError> {
    if table.is_empty() || table.contains('`') || table.contains('$') {
        return Err(RecordStoreError::InvalidTableName(table.to_string()));
    }
    Ok(table)
}

impl Database {
    /// Fetch a single record by id.
    ///
    /// If the host has already materialized this record, only the id string
    /// comes back. Otherwise the full dictionary is returned (and the record
    /// marked as cached), or host null if there is no such row.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the table name is invalid or the query
    /// fails.
    pub fn find(&mut self, table: &str, id: &str) -> Result<HostValue, RecordStoreError> {
        let result = self.find_record(table, id);
        self.surface(result)
    }

    fn find_record(&mut self, table: &str, id: &str) -> Result<HostValue, RecordStoreError> {
        if self.records.is_cached(&cache_key(table, id)) {
            return Ok(HostValue::Str(id.to_string()));
        }

        let sql = format!(
            "select * from `{}` where id == ? limit 1",
            checked_table_name(table)?
        );
        let record = {
            let mut stmt = prepare(&self.conn, &sql)?;
            let params = convert_args(&stmt, &[HostValue::Str(id.to_string())])?;
            let columns = column_names(&stmt);
            let mut rows = stmt
                .query(params_from_iter(params))
                .map_err(RecordStoreError::db("Failed to get a row for query"))?;
            match rows
                .next()
                .map_err(RecordStoreError::db("Failed to get a row for query"))?
            {
                None => return Ok(HostValue::Null),
                Some(row) => result_dictionary(row, &columns)?,
            }
        };

        self.records.mark_as_cached(cache_key(table, id));
        Ok(record)
    }

    /// Run a record query over `table`.
    ///
    /// Each result row must carry the record id in a first column named
    /// `id`. Rows the host has already materialized come back as the id
    /// string alone; the rest come back as dictionaries and are marked as
    /// cached.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the query fails or a row lacks a
    /// non-null string id.
    pub fn query(
        &mut self,
        table: &str,
        sql: &str,
        args: &[HostValue],
    ) -> Result<HostValue, RecordStoreError> {
        let result = self.query_records(table, sql, args);
        self.surface(result)
    }

    fn query_records(
        &mut self,
        table: &str,
        sql: &str,
        args: &[HostValue],
    ) -> Result<HostValue, RecordStoreError> {
        let Self { conn, records, .. } = self;
        let mut stmt = prepare(conn, sql)?;
        let params = convert_args(&stmt, args)?;
        let columns = column_names(&stmt);
        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(RecordStoreError::db("Failed to get a row for query"))?;

        let mut result = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(RecordStoreError::db("Failed to get a row for query"))?
        {
            let id = row_id(row, &columns)?;
            let key = cache_key(table, &id);
            if records.is_cached(&key) {
                result.push(HostValue::Str(id));
            } else {
                let record = result_dictionary(row, &columns)?;
                records.mark_as_cached(key);
                result.push(record);
            }
        }
        Ok(HostValue::Arr(result))
    }

    /// Run a record query over `table`, shaping rows positionally.
    ///
    /// The first element of a non-empty result is the column header array;
    /// after it, each row is either the id string (already materialized) or
    /// a positional value array. An empty result is an empty array with no
    /// header.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the query fails or a row lacks a
    /// non-null string id.
    pub fn query_as_array(
        &mut self,
        table: &str,
        sql: &str,
        args: &[HostValue],
    ) -> Result<HostValue, RecordStoreError> {
        let result = self.query_records_as_array(table, sql, args);
        self.surface(result)
    }

    fn query_records_as_array(
        &mut self,
        table: &str,
        sql: &str,
        args: &[HostValue],
    ) -> Result<HostValue, RecordStoreError> {
        let Self { conn, records, .. } = self;
        let mut stmt = prepare(conn, sql)?;
        let params = convert_args(&stmt, args)?;
        let columns = column_names(&stmt);
        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(RecordStoreError::db("Failed to get a row for query"))?;

        let mut result = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(RecordStoreError::db("Failed to get a row for query"))?
        {
            if result.is_empty() {
                result.push(result_columns(&columns));
            }

            let id = row_id(row, &columns)?;
            let key = cache_key(table, &id);
            if records.is_cached(&key) {
                result.push(HostValue::Str(id));
            } else {
                let record = result_array(row, &columns)?;
                records.mark_as_cached(key);
                result.push(record);
            }
        }
        Ok(HostValue::Arr(result))
    }

    /// Run a query and return only the record ids.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the query fails or a row lacks a
    /// non-null string id.
    pub fn query_ids(&self, sql: &str, args: &[HostValue]) -> Result<HostValue, RecordStoreError> {
        let result = self.query_record_ids(sql, args);
        self.surface(result)
    }

    fn query_record_ids(
        &self,
        sql: &str,
        args: &[HostValue],
    ) -> Result<HostValue, RecordStoreError> {
        let mut stmt = prepare(&self.conn, sql)?;
        let params = convert_args(&stmt, args)?;
        let columns = column_names(&stmt);
        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(RecordStoreError::db("Failed to get a row for query"))?;

        let mut ids = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(RecordStoreError::db("Failed to get a row for query"))?
        {
            ids.push(HostValue::Str(row_id(row, &columns)?));
        }
        Ok(HostValue::Arr(ids))
    }

    /// Run an arbitrary query and return every row as a dictionary, with no
    /// identity-cache interaction. For diagnostics and ad-hoc reads.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the query fails or a row contains an
    /// unsupported column type.
    pub fn unsafe_query_raw(
        &self,
        sql: &str,
        args: &[HostValue],
    ) -> Result<HostValue, RecordStoreError> {
        let result = self.query_raw(sql, args);
        self.surface(result)
    }

    fn query_raw(&self, sql: &str, args: &[HostValue]) -> Result<HostValue, RecordStoreError> {
        let mut stmt = prepare(&self.conn, sql)?;
        let params = convert_args(&stmt, args)?;
        let columns = column_names(&stmt);
        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(RecordStoreError::db("Failed to get a row for query"))?;

        let mut result = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(RecordStoreError::db("Failed to get a row for query"))?
        {
            result.push(result_dictionary(row, &columns)?);
        }
        Ok(HostValue::Arr(result))
    }

    /// Run a counting query, which must yield exactly one row with one
    /// column. A query with no result row is an error, never a silent zero.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the query fails, yields no row, or does
    /// not have exactly one column.
    pub fn count(&self, sql: &str, args: &[HostValue]) -> Result<HostValue, RecordStoreError> {
        let result = self.count_rows(sql, args);
        self.surface(result)
    }

    fn count_rows(&self, sql: &str, args: &[HostValue]) -> Result<HostValue, RecordStoreError> {
        let mut stmt = prepare(&self.conn, sql)?;
        let params = convert_args(&stmt, args)?;
        if stmt.column_count() != 1 {
            return Err(RecordStoreError::Execution(
                "count query must return exactly one column".to_string(),
            ));
        }
        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(RecordStoreError::db("Failed to get a row for query"))?;
        let row = rows
            .next()
            .map_err(RecordStoreError::db("Failed to get a row for query"))?
            .ok_or_else(|| {
                RecordStoreError::db("Failed to get a row for query")(
                    rusqlite::Error::QueryReturnedNoRows,
                )
            })?;
        let count: i64 = row
            .get(0)
            .map_err(RecordStoreError::db("Failed to get a count for query"))?;
        Ok(HostValue::Num(count as f64))
    }

    /// Read one value from the `local_storage` table.
    ///
    /// Returns host null when the key is absent or its value is null.
    ///
    /// # Errors
    /// Returns `RecordStoreError` if the query fails.
    pub fn get_local(&self, key: &str) -> Result<HostValue, RecordStoreError> {
        let result = self.get_local_value(key);
        self.surface(result)
    }

    fn get_local_value(&self, key: &str) -> Result<HostValue, RecordStoreError> {
        use rusqlite::types::ValueRef;

        let mut stmt = prepare(&self.conn, "select value from local_storage where key = ?")?;
        let params = convert_args(&stmt, &[HostValue::Str(key.to_string())])?;
        let mut rows = stmt
            .query(params_from_iter(params))
            .map_err(RecordStoreError::db("Failed to get a row for query"))?;
        let Some(row) = rows
            .next()
            .map_err(RecordStoreError::db("Failed to get a row for query"))?
        else {
            return Ok(HostValue::Null);
        };

        let value = row
            .get_ref(0)
            .map_err(RecordStoreError::db("Failed to read a column for query"))?;
        match value {
            ValueRef::Text(bytes) => Ok(HostValue::Str(String::from_utf8_lossy(bytes).into_owned())),
            ValueRef::Null => Ok(HostValue::Null),
            _ => Err(RecordStoreError::UnsupportedColumnType {
                column: "value".to_string(),
            }),
        }
    }
}
