// executor.rs
//! Routes command lines to the parser, the table engine and the store, and
//! renders the outcome as text. Errors are rendered, never propagated, so the
//! shell keeps running after a bad command.

use std::time::Instant;

use tracing::{debug, info};

use crate::cache::SelectCache;
use crate::database;
use crate::error::{DbError, Result};
use crate::format::render_table;
use crate::query::unquote;
use crate::sql;
use crate::storage::StoreInterface;
use crate::table;

pub const HELP: &str = "\
Tables:
  create_table <table> <column1:type> ..      create a table (types: int, bool, str)
  list_tables                                 list all tables
  drop_table <table>                          drop a table
  info <table>                                show columns and row count

Rows:
  insert into <table> values (<value1>, ..)   add a row
  select from <table>                         show all rows
  select from <table> where <column> = <value>
  update <table> set <column> = <value> where <column> = <value>
  delete from <table> where <column> = <value>

General:
  help                                        show this text
  exit                                        leave the shell";

/// Asks the user before a destructive command runs.
pub trait Confirm {
    fn confirm(&mut self, action: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, action: &str) -> bool {
        self(action)
    }
}

/// Answers every confirmation with the same value.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _action: &str) -> bool {
        self.0
    }
}

/// What the shell should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Output(String),
    Silent,
    Exit,
}

pub struct Executor<S: StoreInterface> {
    store: S,
    cache: Option<SelectCache>,
}

impl<S: StoreInterface> Executor<S> {
    pub fn new(store: S, cache: Option<SelectCache>) -> Self {
        Executor { store, cache }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs one command line. Failures come back as an `Error: ...` output.
    pub fn execute(&mut self, line: &str, confirm: &mut dyn Confirm) -> Response {
        match self.dispatch(line.trim(), confirm) {
            Ok(response) => response,
            Err(e) => {
                debug!(command = line, error = %e, "command failed");
                Response::Output(format!("Error: {e}"))
            }
        }
    }

    fn dispatch(&mut self, line: &str, confirm: &mut dyn Confirm) -> Result<Response> {
        let tokens = sql::tokenize(line)?;
        let Some(verb) = tokens.first() else {
            return Ok(Response::Silent);
        };

        let output = match verb.to_ascii_lowercase().as_str() {
            "exit" => return Ok(Response::Exit),
            "help" => HELP.to_string(),
            "create_table" => self.create_table(&tokens)?,
            "list_tables" => self.list_tables(),
            "drop_table" => match self.drop_table(&tokens, confirm)? {
                Some(output) => output,
                None => return Ok(cancelled()),
            },
            "info" => self.info(&tokens)?,
            "insert" => timed("insert", || self.insert(line))?,
            "select" => timed("select", || self.select(line))?,
            "update" => timed("update", || self.update(line))?,
            "delete" => match self.delete(line, confirm)? {
                Some(output) => output,
                None => return Ok(cancelled()),
            },
            _ => return Err(DbError::SyntaxError(format!("unknown command \"{verb}\""))),
        };
        Ok(Response::Output(output))
    }

    fn create_table(&mut self, tokens: &[String]) -> Result<String> {
        if tokens.len() < 3 {
            return Err(DbError::SyntaxError(
                "use: create_table <table> <column1:type> ..".into(),
            ));
        }
        let table_name = unquote(&tokens[1]);
        let columns = sql::parse_column_specs(&tokens[2..])?;

        let metadata = database::create_table(&self.store.load_metadata(), table_name, &columns)?;
        // A stale row document from an earlier table of the same name must not leak in.
        self.store.remove_table_rows(table_name)?;
        self.store.save_metadata(&metadata)?;
        self.invalidate(table_name);

        let schema = database::table_schema(&metadata, table_name)?;
        info!(table = table_name, "table created");
        Ok(format!(
            "Table \"{}\" created with columns: {}",
            table_name,
            schema.column_list()
        ))
    }

    fn list_tables(&self) -> String {
        let metadata = self.store.load_metadata();
        let names = database::list_tables(&metadata);
        if names.is_empty() {
            return "No tables yet.".to_string();
        }
        names
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns `None` when the user declines.
    fn drop_table(
        &mut self,
        tokens: &[String],
        confirm: &mut dyn Confirm,
    ) -> Result<Option<String>> {
        let [_, table_name] = tokens else {
            return Err(DbError::SyntaxError("use: drop_table <table>".into()));
        };
        let table_name = unquote(table_name);

        let metadata = database::drop_table(&self.store.load_metadata(), table_name)?;
        if !confirm.confirm("drop table") {
            return Ok(None);
        }
        self.store.save_metadata(&metadata)?;
        self.store.remove_table_rows(table_name)?;
        self.invalidate(table_name);

        info!(table = table_name, "table dropped");
        Ok(Some(format!("Table \"{table_name}\" dropped.")))
    }

    fn info(&self, tokens: &[String]) -> Result<String> {
        let [_, table_name] = tokens else {
            return Err(DbError::SyntaxError("use: info <table>".into()));
        };
        let table_name = unquote(table_name);
        let metadata = self.store.load_metadata();
        let rows = self.store.load_table_rows(table_name);
        database::describe_table(&metadata, table_name, &rows)
    }

    fn insert(&mut self, line: &str) -> Result<String> {
        let cmd = sql::parse_insert_command(line)?;
        let metadata = self.store.load_metadata();
        let rows = self.store.load_table_rows(&cmd.table);

        let (rows, new_id) = table::insert_row(&metadata, &cmd.table, cmd.values, &rows)?;
        self.store.save_table_rows(&cmd.table, &rows)?;
        self.invalidate(&cmd.table);

        Ok(format!(
            "Row with ID={} added to table \"{}\".",
            new_id, cmd.table
        ))
    }

    fn select(&mut self, line: &str) -> Result<String> {
        let cmd = sql::parse_select_command(line)?;
        let metadata = self.store.load_metadata();
        database::table_schema(&metadata, &cmd.table)?;

        let cached = self
            .cache
            .as_ref()
            .and_then(|cache| cache.get(&cmd.table, line))
            .map(|rows| rows.to_vec());
        let rows = match cached {
            Some(rows) => {
                debug!(table = %cmd.table, "select served from cache");
                rows
            }
            None => {
                let rows = table::select_rows(
                    &self.store.load_table_rows(&cmd.table),
                    cmd.filter.as_ref(),
                );
                if let Some(cache) = self.cache.as_mut() {
                    cache.insert(&cmd.table, line, rows.clone());
                }
                rows
            }
        };

        if rows.is_empty() {
            return Ok("No records found.".to_string());
        }
        Ok(render_table(&rows))
    }

    fn update(&mut self, line: &str) -> Result<String> {
        let cmd = sql::parse_update_command(line)?;
        let metadata = self.store.load_metadata();
        let rows = self.store.load_table_rows(&cmd.table);

        let (rows, updated_ids) =
            table::update_rows(&metadata, &cmd.table, &rows, &cmd.set, &cmd.filter)?;
        if updated_ids.is_empty() {
            return Ok("No records matched.".to_string());
        }
        self.store.save_table_rows(&cmd.table, &rows)?;
        self.invalidate(&cmd.table);

        Ok(format!(
            "Row with ID={} in table \"{}\" updated.",
            join_ids(&updated_ids),
            cmd.table
        ))
    }

    /// Returns `None` when the user declines.
    fn delete(&mut self, line: &str, confirm: &mut dyn Confirm) -> Result<Option<String>> {
        let cmd = sql::parse_delete_command(line)?;
        let metadata = self.store.load_metadata();
        database::table_schema(&metadata, &cmd.table)?;
        if !confirm.confirm("delete rows") {
            return Ok(None);
        }

        let rows = self.store.load_table_rows(&cmd.table);
        let (rows, deleted_ids) = timed("delete", || {
            table::delete_rows(&metadata, &cmd.table, &rows, &cmd.filter)
        })?;
        if deleted_ids.is_empty() {
            return Ok(Some("No records matched.".to_string()));
        }
        self.store.save_table_rows(&cmd.table, &rows)?;
        self.invalidate(&cmd.table);

        Ok(Some(format!(
            "Row with ID={} deleted from table \"{}\".",
            join_ids(&deleted_ids),
            cmd.table
        )))
    }

    fn invalidate(&mut self, table_name: &str) {
        if let Some(cache) = self.cache.as_mut() {
            cache.invalidate(table_name);
        }
    }
}

fn cancelled() -> Response {
    Response::Output("Operation cancelled.".to_string())
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Runs `f` and logs how long it took.
fn timed<T>(command: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    info!(
        command,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "command finished"
    );
    result
}
