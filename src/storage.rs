// storage.rs
//! JSON documents on disk: one metadata document plus one row document per table.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::Result;
use crate::row::Row;
use crate::schema::Metadata;

/// Loads and stores whole documents. Loads never fail: a missing or
/// unreadable document reads as empty.
pub trait StoreInterface {
    fn load_metadata(&self) -> Metadata;
    fn save_metadata(&self, metadata: &Metadata) -> Result<()>;
    fn load_table_rows(&self, table_name: &str) -> Vec<Row>;
    fn save_table_rows(&self, table_name: &str, rows: &[Row]) -> Result<()>;
    /// Removes the row document of a dropped table, if any.
    fn remove_table_rows(&self, table_name: &str) -> Result<()>;
}

/// File-backed store writing pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonStore {
    meta_path: PathBuf,
    data_dir: PathBuf,
}

impl JsonStore {
    pub fn new(meta_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        JsonStore {
            meta_path: meta_path.into(),
            data_dir: data_dir.into(),
        }
    }

    pub fn table_path(&self, table_name: &str) -> PathBuf {
        self.data_dir.join(format!("{table_name}.json"))
    }
}

impl StoreInterface for JsonStore {
    fn load_metadata(&self) -> Metadata {
        load_document(&self.meta_path)
    }

    fn save_metadata(&self, metadata: &Metadata) -> Result<()> {
        save_document(&self.meta_path, metadata)
    }

    fn load_table_rows(&self, table_name: &str) -> Vec<Row> {
        load_document(&self.table_path(table_name))
    }

    fn save_table_rows(&self, table_name: &str, rows: &[Row]) -> Result<()> {
        save_document(&self.table_path(table_name), rows)
    }

    fn remove_table_rows(&self, table_name: &str) -> Result<()> {
        match fs::remove_file(self.table_path(table_name)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

fn load_document<T: DeserializeOwned + Default>(path: &Path) -> T {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %path.display(), error = %e, "cannot read document, using empty");
            }
            return T::default();
        }
    };
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "malformed document, using empty");
        T::default()
    })
}

/// Overwrites `path` by writing a sibling temp file and renaming it into place.
fn save_document<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(data)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.write_all(b"\n")?;
    file.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = json.len(), "document saved");
    Ok(())
}
