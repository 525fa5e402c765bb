/// A joined row: the foreign key that was followed and whatever records the
/// join produced for it.
///
/// Joins are always treated as a bounded list. A to-one relation yields zero
/// or one member, but callers never guess the shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Related<T> {
    pub key: String,
    pub related: Vec<T>,
}

impl<T> Related<T> {
    pub fn new(key: impl Into<String>, related: Vec<T>) -> Self {
        Self {
            key: key.into(),
            related,
        }
    }

    pub fn from_optional(key: impl Into<String>, related: Option<T>) -> Self {
        Self::new(key, related.into_iter().collect())
    }
}

/// Normalizes joined rows where one related record is expected: the first
/// member of each row is kept, rows with no member are dropped, and row
/// order is preserved.
pub fn first_related<T>(rows: Vec<Related<T>>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| row.related.into_iter().next())
        .collect()
}
