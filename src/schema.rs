use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::DbError;
use crate::row::Value;

/// Name of the system-managed identifier column.
pub const ID_COLUMN: &str = "ID";

/// Represents the type of a column in a table schema.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Bool,
    Str,
}

impl ColumnType {
    /// Returns true when `value` may be stored in a column of this type.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnType::Int, Value::Int(_))
                | (ColumnType::Bool, Value::Bool(_))
                | (ColumnType::Str, Value::Str(_))
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Bool => "bool",
            ColumnType::Str => "str",
        }
    }
}

impl FromStr for ColumnType {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(ColumnType::Int),
            "bool" => Ok(ColumnType::Bool),
            "str" => Ok(ColumnType::Str),
            _ => Err(DbError::InvalidType(s.to_string())),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Represents a column in a schema (name and type).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub col_type: ColumnType,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, col_type: ColumnType) -> Self {
        ColumnSchema {
            name: name.into(),
            col_type,
        }
    }
}

/// Represents the schema of a table (list of columns). `ID` is always first.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub columns: Vec<ColumnSchema>,
}

impl Schema {
    /// Looks up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns the caller supplies values for on insert.
    pub fn value_columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.iter().filter(|c| c.name != ID_COLUMN)
    }

    /// `name:type` pairs in schema order, joined by `, `.
    pub fn column_list(&self) -> String {
        self.columns
            .iter()
            .map(|c| format!("{}:{}", c.name, c.col_type))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Table name to schema, in creation order.
pub type Metadata = IndexMap<String, Schema>;
