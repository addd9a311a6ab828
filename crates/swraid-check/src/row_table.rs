//! Row storage keyed by table index.
//!
//! [`RowTable`] never creates a row implicitly. Rows come into existence
//! only through the explicit `insert()` or `get_or_create()` calls.

use std::collections::HashMap;

use crate::value::Value;

/// Aggregated record for one table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Table index, unique within a run.
    pub index: i64,
    /// Values in arrival order.
    pub values: Vec<Value>,
    /// Set only by a status-column observation.
    pub healthy: bool,
}

impl Row {
    /// Creates an empty, unhealthy row.
    pub fn new(index: i64) -> Self {
        Self {
            index,
            values: Vec::new(),
            healthy: false,
        }
    }

    /// Returns the rendered values in arrival order.
    pub fn rendered_values(&self) -> Vec<String> {
        self.values.iter().map(ToString::to_string).collect()
    }
}

/// Map from table index to row.
#[derive(Debug, Clone, Default)]
pub struct RowTable {
    inner: HashMap<i64, Row>,
}

impl RowTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `row`, replacing any row with the same index.
    ///
    /// Returns the replaced row.
    pub fn insert(&mut self, row: Row) -> Option<Row> {
        self.inner.insert(row.index, row)
    }

    /// Returns the row for `index`, creating an empty unhealthy row first
    /// if none exists. The boolean is true when the row was created.
    pub fn get_or_create(&mut self, index: i64) -> (&mut Row, bool) {
        let created = !self.inner.contains_key(&index);
        let row = self.inner.entry(index).or_insert_with(|| Row::new(index));
        (row, created)
    }

    /// Iterates over all rows in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.inner.values()
    }

    /// Returns all rows sorted ascending by index.
    ///
    /// The order is re-derived on every call; insertion order of rows is
    /// never observable.
    pub fn sorted(&self) -> Vec<&Row> {
        let mut rows: Vec<&Row> = self.iter().collect();
        rows.sort_by_key(|row| row.index);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swraid_common::SnmpValue;

    #[test]
    fn test_new_table_is_empty() {
        let table = RowTable::new();
        assert!(table.sorted().is_empty());
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_insert_overwrites() {
        let mut table = RowTable::new();
        let mut row = Row::new(3);
        row.healthy = true;
        row.values.push(Value::new(".1.3", SnmpValue::Integer(2)));
        assert!(table.insert(row).is_none());

        let replaced = table.insert(Row::new(3));
        assert!(replaced.is_some_and(|old| old.healthy));
        assert_eq!(table.sorted(), vec![&Row::new(3)]);
    }

    #[test]
    fn test_get_or_create() {
        let mut table = RowTable::new();

        let (row, created) = table.get_or_create(5);
        assert!(created);
        assert!(!row.healthy);
        row.healthy = true;

        let (row, created) = table.get_or_create(5);
        assert!(!created);
        assert!(row.healthy);
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn test_sorted_by_index() {
        let mut table = RowTable::new();
        for index in [10, -1, 3, 2] {
            table.insert(Row::new(index));
        }

        let indices: Vec<i64> = table.sorted().iter().map(|row| row.index).collect();
        assert_eq!(indices, vec![-1, 2, 3, 10]);
    }

    #[test]
    fn test_rendered_values() {
        let mut row = Row::new(1);
        row.values.push(Value::new(".1.2.1", SnmpValue::octet_string("md0")));
        row.values.push(Value::new(".1.5.1", SnmpValue::Integer(2)));
        assert_eq!(row.rendered_values(), vec!["md0", "2"]);
    }
}
