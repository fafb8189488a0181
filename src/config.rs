//! Runtime configuration, read from command-line flags with environment fallbacks.
//!
//! | Flag            | Variable                 | Default        |
//! |-----------------|--------------------------|----------------|
//! | `--data-dir`    | `PRIMITIVE_DB_DATA_DIR`  | `data`         |
//! | `--meta-file`   | `PRIMITIVE_DB_META_FILE` | `db_meta.json` |
//! | `--log-level`   | `PRIMITIVE_DB_LOG`       | `warn`         |

use std::path::PathBuf;

use clap::Parser;

use crate::cache::SelectCache;
use crate::storage::JsonStore;

#[derive(Parser, Debug, Clone)]
#[command(name = "primitive-db", version, about = "A primitive file-backed table store")]
pub struct Config {
    /// Directory holding one JSON document per table.
    #[arg(long, env = "PRIMITIVE_DB_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// JSON document describing table schemas.
    #[arg(long, env = "PRIMITIVE_DB_META_FILE", default_value = "db_meta.json")]
    pub meta_file: PathBuf,

    /// Tracing filter string, e.g. `primitive_db=debug`.
    #[arg(long, env = "PRIMITIVE_DB_LOG", default_value = "warn")]
    pub log_level: String,

    /// Answer yes to every confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Disable the SELECT result cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Run a command and exit instead of starting the shell. May be repeated.
    #[arg(short = 'c', long = "command", value_name = "COMMAND")]
    pub commands: Vec<String>,
}

impl Config {
    pub fn open_store(&self) -> JsonStore {
        JsonStore::new(&self.meta_file, &self.data_dir)
    }

    pub fn select_cache(&self) -> Option<SelectCache> {
        (!self.no_cache).then(SelectCache::new)
    }
}
