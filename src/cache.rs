use std::collections::HashMap;

use crate::row::Row;

/// SELECT results keyed by table, then by the raw command text.
///
/// Every write to a table must call [`SelectCache::invalidate`] for that table.
#[derive(Debug, Default)]
pub struct SelectCache {
    tables: HashMap<String, HashMap<String, Vec<Row>>>,
}

impl SelectCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, table: &str, command: &str) -> Option<&[Row]> {
        self.tables
            .get(table)
            .and_then(|entries| entries.get(command))
            .map(Vec::as_slice)
    }

    pub fn insert(&mut self, table: &str, command: &str, rows: Vec<Row>) {
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert(command.to_string(), rows);
    }

    /// Drops all cached results for `table`.
    pub fn invalidate(&mut self, table: &str) {
        self.tables.remove(table);
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalidate_only_touches_one_table() {
        let mut cache = SelectCache::new();
        cache.insert("users", "select from users", vec![Row::with_id(1)]);
        cache.insert("pets", "select from pets", vec![]);
        assert_eq!(cache.len(), 2);

        cache.invalidate("users");
        assert!(cache.get("users", "select from users").is_none());
        assert_eq!(cache.get("pets", "select from pets"), Some(&[][..]));
        assert_eq!(cache.len(), 1);
    }
}
