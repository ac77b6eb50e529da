//! Row representation for query results.

use crate::value::SqlValue;

/// A row from a query result: an ordered mapping of column name to value.
///
/// Column order is the order the driver reported; lookups by name are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Create a new row from parallel column and value vectors.
    ///
    /// Extra entries on either side are truncated to the shorter length.
    #[must_use]
    pub fn new(mut columns: Vec<String>, mut values: Vec<SqlValue>) -> Self {
        let len = columns.len().min(values.len());
        columns.truncate(len);
        values.truncate(len);
        Self { columns, values }
    }

    /// Create a row from `(column, value)` pairs.
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<SqlValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let (columns, values) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self { columns, values }
    }

    /// Get a value by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.position(name).map(|i| &self.values[i])
    }

    /// Get a value by column index.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    /// Get the column names, in result order.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Get the values, in result order.
    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Get the number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(column, value)` pairs in result order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }
}

impl IntoIterator for Row {
    type Item = (String, SqlValue);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<String>, std::vec::IntoIter<SqlValue>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter().zip(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_by_name_case_insensitive() {
        let row = Row::from_pairs([("Id", 1i64), ("Count", 2i64)]);
        assert_eq!(row.get("id"), Some(&SqlValue::Int(1)));
        assert_eq!(row.get("COUNT"), Some(&SqlValue::Int(2)));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn test_order_preserved() {
        let row = Row::from_pairs([("b", 2i64), ("a", 1i64)]);
        let names: Vec<_> = row.iter().map(|(c, _)| c.to_owned()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(row.get_index(0), Some(&SqlValue::Int(2)));
    }

    #[test]
    fn test_new_truncates_mismatched_lengths() {
        let row = Row::new(
            vec!["a".into(), "b".into()],
            vec![SqlValue::Int(1)],
        );
        assert_eq!(row.len(), 1);
        assert_eq!(row.columns(), ["a".to_owned()]);
    }
}
