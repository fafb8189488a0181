// database.rs
//! Schema-level operations over the metadata store.
//!
//! Each operation takes the current metadata and returns an updated copy;
//! persisting the result is up to the caller.

use crate::error::{DbError, Result};
use crate::row::Row;
use crate::schema::{ColumnSchema, ColumnType, ID_COLUMN, Metadata, Schema};

/// Defines a new table. `ID:int` is always the first column; any supplied
/// column named `id` (any case) is dropped.
pub fn create_table(
    metadata: &Metadata,
    table_name: &str,
    columns: &[(String, String)],
) -> Result<Metadata> {
    validate_table_name(table_name)?;
    if metadata.contains_key(table_name) {
        return Err(DbError::AlreadyExists(table_name.to_string()));
    }

    let mut full_columns = vec![ColumnSchema::new(ID_COLUMN, ColumnType::Int)];
    for (name, col_type) in columns {
        if name.eq_ignore_ascii_case(ID_COLUMN) {
            continue;
        }
        let col_type: ColumnType = col_type.parse()?;
        if full_columns.iter().any(|c| &c.name == name) {
            return Err(DbError::DuplicateColumn(name.clone()));
        }
        full_columns.push(ColumnSchema::new(name.as_str(), col_type));
    }

    let mut updated = metadata.clone();
    updated.insert(
        table_name.to_string(),
        Schema {
            columns: full_columns,
        },
    );
    Ok(updated)
}

pub fn drop_table(metadata: &Metadata, table_name: &str) -> Result<Metadata> {
    let mut updated = metadata.clone();
    updated
        .shift_remove(table_name)
        .ok_or_else(|| DbError::NotFound(table_name.to_string()))?;
    Ok(updated)
}

/// Returns the schema registered for `table_name`.
pub fn table_schema<'a>(metadata: &'a Metadata, table_name: &str) -> Result<&'a Schema> {
    metadata
        .get(table_name)
        .ok_or_else(|| DbError::NotFound(table_name.to_string()))
}

/// Table names in creation order.
pub fn list_tables(metadata: &Metadata) -> Vec<&str> {
    metadata.keys().map(String::as_str).collect()
}

/// Summarises a table: name, `name:type` columns and row count.
pub fn describe_table(metadata: &Metadata, table_name: &str, rows: &[Row]) -> Result<String> {
    let schema = table_schema(metadata, table_name)?;
    Ok(format!(
        "Table: {}\nColumns: {}\nRows: {}",
        table_name,
        schema.column_list(),
        rows.len()
    ))
}

/// Table names are used as file names, so only a conservative alphabet is allowed.
fn validate_table_name(table_name: &str) -> Result<()> {
    let valid = !table_name.is_empty()
        && table_name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidName(table_name.to_string()))
    }
}
