// table.rs
//! Row-level operations for a single table.
//!
//! Rows come in as a borrowed slice and go out as a fresh vector, so a failed
//! call never leaves the caller's rows half-modified.

use crate::database::table_schema;
use crate::error::{DbError, Result};
use crate::query::{Predicate, matches};
use crate::row::{Row, Value};
use crate::schema::{ColumnSchema, ID_COLUMN, Metadata};

/// Appends a new row and returns the updated rows together with the new ID.
///
/// The ID is one past the largest ID still present. Gaps left by deletes are
/// never refilled, but deleting the row that holds the maximum lets its ID be
/// issued again.
pub fn insert_row(
    metadata: &Metadata,
    table_name: &str,
    values: Vec<Value>,
    rows: &[Row],
) -> Result<(Vec<Row>, i64)> {
    let schema = table_schema(metadata, table_name)?;
    let columns: Vec<&ColumnSchema> = schema.value_columns().collect();

    if values.len() != columns.len() {
        return Err(DbError::InvalidArity {
            expected: columns.len(),
            got: values.len(),
        });
    }
    for (col, value) in columns.iter().zip(&values) {
        check_type(col, value)?;
    }

    let new_id = next_id(table_name, rows)?;
    let mut row = Row::with_id(new_id);
    for (col, value) in columns.into_iter().zip(values) {
        row.set(col.name.as_str(), value);
    }

    let mut updated = rows.to_vec();
    updated.push(row);
    Ok((updated, new_id))
}

/// Returns the rows matching `filter`, or every row when there is none.
pub fn select_rows(rows: &[Row], filter: Option<&Predicate>) -> Vec<Row> {
    match filter {
        None => rows.to_vec(),
        Some(filter) => rows.iter().filter(|r| matches(r, filter)).cloned().collect(),
    }
}

/// Applies `set` to every row matching `filter`.
///
/// The SET clause is checked against the schema before any row is touched, so
/// the update either applies in full or not at all.
pub fn update_rows(
    metadata: &Metadata,
    table_name: &str,
    rows: &[Row],
    set: &Predicate,
    filter: &Predicate,
) -> Result<(Vec<Row>, Vec<i64>)> {
    let schema = table_schema(metadata, table_name)?;
    for (column, value) in set {
        if column == ID_COLUMN {
            return Err(DbError::ProtectedColumn(column.clone()));
        }
        let col = schema
            .column(column)
            .ok_or_else(|| DbError::UnknownColumn(column.clone()))?;
        check_type(col, value)?;
    }

    let mut updated = rows.to_vec();
    let mut updated_ids = Vec::new();
    for row in updated.iter_mut().filter(|r| matches(r, filter)) {
        for (column, value) in set {
            row.set(column.as_str(), value.clone());
        }
        updated_ids.extend(row.id());
    }
    Ok((updated, updated_ids))
}

/// Splits rows into survivors and deleted IDs, keeping relative order.
pub fn delete_rows(
    metadata: &Metadata,
    table_name: &str,
    rows: &[Row],
    filter: &Predicate,
) -> Result<(Vec<Row>, Vec<i64>)> {
    table_schema(metadata, table_name)?;

    let (deleted, surviving): (Vec<&Row>, Vec<&Row>) =
        rows.iter().partition(|r| matches(r, filter));
    let deleted_ids = deleted.into_iter().filter_map(Row::id).collect();
    Ok((surviving.into_iter().cloned().collect(), deleted_ids))
}

fn next_id(table_name: &str, rows: &[Row]) -> Result<i64> {
    rows.iter()
        .filter_map(Row::id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| DbError::IdsExhausted(table_name.to_string()))
}

fn check_type(col: &ColumnSchema, value: &Value) -> Result<()> {
    if col.col_type.accepts(value) {
        Ok(())
    } else {
        Err(DbError::TypeMismatch {
            column: col.name.clone(),
            value: value.to_string(),
            expected: col.col_type,
        })
    }
}
