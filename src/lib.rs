pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod format;
pub mod query;
pub mod row;
pub mod schema;
pub mod sql;
pub mod storage;
pub mod table;

// Re-export commonly used types for tests and consumers
pub use cache::*;
pub use config::*;
pub use database::*;
pub use error::DbError;
pub use executor::*;
pub use format::*;
pub use query::*;
pub use row::*;
pub use schema::*;
pub use sql::*;
pub use storage::*;
pub use table::*;
