//! Row sets returned by read statements.
//!
//! A [`RowSet`] is a scrollable cursor over rows the driver has already
//! materialized. The cursor starts before the first row; [`RowSet::next`]
//! advances it. Counting rows with [`RowSet::last`] and rewinding with
//! [`RowSet::before_first`] leaves the rows untouched, so a counted row set
//! reads exactly like an uncounted one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of cells, in column order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Cell at a 0-based column index.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Cursor position. Rows are addressed 0-based internally; positions
/// reported to callers are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    BeforeFirst,
    At(usize),
    AfterLast,
}

/// Scrollable cursor over the rows of a read statement.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    columns: Vec<String>,
    rows: Vec<Row>,
    cursor: Cursor,
}

impl RowSet {
    /// Create a row set positioned before the first row.
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            cursor: Cursor::BeforeFirst,
        }
    }

    /// A row set with no columns and no rows.
    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 0-based index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Number of rows, independent of the cursor.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, independent of the cursor.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Advance to the next row and return it, or `None` past the end.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&Row> {
        let next = match self.cursor {
            Cursor::BeforeFirst => 0,
            Cursor::At(i) => i + 1,
            Cursor::AfterLast => return None,
        };
        if next < self.rows.len() {
            self.cursor = Cursor::At(next);
            self.rows.get(next)
        } else {
            self.cursor = Cursor::AfterLast;
            None
        }
    }

    /// The row under the cursor.
    pub fn current(&self) -> Option<&Row> {
        match self.cursor {
            Cursor::At(i) => self.rows.get(i),
            _ => None,
        }
    }

    /// Cell of the current row by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.current()?.get(index)
    }

    /// Move to the last row. Returns `false` (cursor unchanged) when empty.
    pub fn last(&mut self) -> bool {
        match self.rows.len() {
            0 => false,
            n => {
                self.cursor = Cursor::At(n - 1);
                true
            }
        }
    }

    /// Rewind to before the first row.
    pub fn before_first(&mut self) {
        self.cursor = Cursor::BeforeFirst;
    }

    /// 1-based position of the cursor; 0 when not on a row.
    pub fn position(&self) -> usize {
        match self.cursor {
            Cursor::At(i) => i + 1,
            _ => 0,
        }
    }

    /// Count rows by seeking to the last row and rewinding.
    ///
    /// The cursor always ends up before the first row.
    pub fn count_rows(&mut self) -> usize {
        let count = if self.last() { self.position() } else { 0 };
        self.before_first();
        count
    }

    /// Release the row set. Rows cloned out of it stay valid.
    pub fn close(self) {}

    /// Consume the row set into its rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> RowSet {
        RowSet::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                Row::new(vec![json!(1), json!("apple")]),
                Row::new(vec![json!(2), json!("pear")]),
                Row::new(vec![json!(3), json!("plum")]),
            ],
        )
    }

    fn read_all(rows: &mut RowSet) -> Vec<Row> {
        let mut out = Vec::new();
        while let Some(row) = rows.next() {
            out.push(row.clone());
        }
        out
    }

    #[test]
    fn test_starts_before_first() {
        let rows = sample();
        assert_eq!(rows.position(), 0);
        assert!(rows.current().is_none());
    }

    #[test]
    fn test_next_walks_rows() {
        let mut rows = sample();
        assert_eq!(rows.next().unwrap().get(0), Some(&json!(1)));
        assert_eq!(rows.get("name"), Some(&json!("apple")));
        assert_eq!(rows.position(), 1);
        rows.next();
        rows.next();
        assert_eq!(rows.get("name"), Some(&json!("plum")));
        assert!(rows.next().is_none());
        assert!(rows.next().is_none());
        assert_eq!(rows.position(), 0);
    }

    #[test]
    fn test_count_rows_is_non_destructive() {
        let mut uncounted = sample();
        let mut counted = sample();

        assert_eq!(counted.count_rows(), 3);
        assert_eq!(counted.position(), 0);
        assert_eq!(read_all(&mut counted), read_all(&mut uncounted));
    }

    #[test]
    fn test_count_rows_empty() {
        let mut rows = RowSet::empty();
        assert!(!rows.last());
        assert_eq!(rows.count_rows(), 0);
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_last_and_position() {
        let mut rows = sample();
        assert!(rows.last());
        assert_eq!(rows.position(), 3);
        assert_eq!(rows.get("id"), Some(&json!(3)));
        rows.before_first();
        assert_eq!(rows.next().unwrap().get(1), Some(&json!("apple")));
    }

    #[test]
    fn test_unknown_column() {
        let mut rows = sample();
        rows.next();
        assert!(rows.get("missing").is_none());
    }

    #[test]
    fn test_rows_survive_close() {
        let mut rows = sample();
        let first = rows.next().cloned().unwrap();
        rows.close();
        assert_eq!(first.get(1), Some(&json!("apple")));
    }
}
