use thiserror::Error;

use crate::schema::ColumnType;

pub type Result<T> = std::result::Result<T, DbError>;

/// Errors signalled by the parser, the table engine and the storage layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// A table with this name is already defined.
    #[error("table \"{0}\" already exists")]
    AlreadyExists(String),

    /// The referenced table is not defined.
    #[error("table \"{0}\" not found")]
    NotFound(String),

    /// Table names double as file names.
    #[error("invalid table name: \"{0}\"")]
    InvalidName(String),

    /// Column type is not one of `int`, `bool`, `str`.
    #[error("invalid column type: {0}")]
    InvalidType(String),

    #[error("column \"{0}\" declared more than once")]
    DuplicateColumn(String),

    #[error("table \"{0}\" has no identifiers left")]
    IdsExhausted(String),

    /// Insert supplied the wrong number of values.
    #[error("expected {expected} values, got {got}")]
    InvalidArity { expected: usize, got: usize },

    #[error("invalid value {value} for column \"{column}\": expected {expected}")]
    TypeMismatch {
        column: String,
        value: String,
        expected: ColumnType,
    },

    /// SET referenced a column missing from the schema.
    #[error("column \"{0}\" not found")]
    UnknownColumn(String),

    #[error("column \"{0}\" is managed by the database and cannot be set")]
    ProtectedColumn(String),

    #[error("malformed column spec \"{0}\": expected name:type")]
    MalformedColumnSpec(String),

    #[error("malformed condition: expected 'field = value'")]
    MalformedCondition,

    #[error("syntax error: {0}")]
    SyntaxError(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
