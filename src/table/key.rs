//! Row identity.
//!
//! Every record shown in a table gets a [`RowKey`]. Keys are derived, in
//! order, from an explicit extraction function, a named field, a `key` or
//! `id` property, and finally the row's position in the data sequence.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field names tried when no key spec is configured.
const AUTO_KEY_FIELDS: [&str; 2] = ["key", "id"];

/// Stable identifier for a record within one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowKey {
    /// Integer key, also used for the positional fallback.
    Int(i64),
    /// String key.
    Str(String),
}

impl RowKey {
    /// Convert a field value into a key.
    ///
    /// Strings and integers map directly. Other scalars use their JSON
    /// rendering. `null`, arrays and objects yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(RowKey::Str(s.clone())),
            Value::Number(n) => Some(match n.as_i64() {
                Some(i) => RowKey::Int(i),
                None => RowKey::Str(n.to_string()),
            }),
            Value::Bool(b) => Some(RowKey::Str(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Int(i) => write!(f, "{}", i),
            RowKey::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RowKey {
    fn from(s: &str) -> Self {
        RowKey::Str(s.to_string())
    }
}

impl From<String> for RowKey {
    fn from(s: String) -> Self {
        RowKey::Str(s)
    }
}

impl From<i64> for RowKey {
    fn from(i: i64) -> Self {
        RowKey::Int(i)
    }
}

impl From<i32> for RowKey {
    fn from(i: i32) -> Self {
        RowKey::Int(i64::from(i))
    }
}

impl From<usize> for RowKey {
    fn from(index: usize) -> Self {
        RowKey::Int(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

/// A value that can be displayed as a table row.
///
/// The table only looks inside a record through [`Record::field`]. Types
/// that identify rows with [`RowKeySpec::Extract`] and render every column
/// themselves can rely on the default implementation.
pub trait Record {
    /// Look up a named field. Absent and `null` fields return `None`.
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl Record for Value {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).filter(|v| !v.is_null()).cloned()
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> Option<Value> {
        self.get(name).filter(|v| !v.is_null()).cloned()
    }
}

/// Key extraction function.
pub type KeyFn<T> = Arc<dyn Fn(&T) -> RowKey>;

/// How a table derives row keys.
pub enum RowKeySpec<T> {
    /// Try `key`, then `id`, then fall back to the row index.
    Auto,
    /// Read the named field, falling back to [`RowKeySpec::Auto`] when absent.
    Field(String),
    /// Call the function.
    Extract(KeyFn<T>),
}

impl<T> RowKeySpec<T> {
    /// Derive keys from a named field.
    pub fn field(name: impl Into<String>) -> Self {
        RowKeySpec::Field(name.into())
    }

    /// Derive keys with a function.
    pub fn extract(f: impl Fn(&T) -> RowKey + 'static) -> Self {
        RowKeySpec::Extract(Arc::new(f))
    }
}

impl<T> Default for RowKeySpec<T> {
    fn default() -> Self {
        RowKeySpec::Auto
    }
}

impl<T> Clone for RowKeySpec<T> {
    fn clone(&self) -> Self {
        match self {
            RowKeySpec::Auto => RowKeySpec::Auto,
            RowKeySpec::Field(name) => RowKeySpec::Field(name.clone()),
            RowKeySpec::Extract(f) => RowKeySpec::Extract(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for RowKeySpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKeySpec::Auto => f.write_str("Auto"),
            RowKeySpec::Field(name) => f.debug_tuple("Field").field(name).finish(),
            RowKeySpec::Extract(_) => f.write_str("Extract(..)"),
        }
    }
}

/// Resolve the key of `record` at position `index`.
pub fn resolve_key<T: Record>(record: &T, index: usize, spec: &RowKeySpec<T>) -> RowKey {
    match spec {
        RowKeySpec::Extract(f) => f(record),
        RowKeySpec::Field(name) => record
            .field(name)
            .as_ref()
            .and_then(RowKey::from_value)
            .unwrap_or_else(|| auto_key(record, index)),
        RowKeySpec::Auto => auto_key(record, index),
    }
}

fn auto_key<T: Record>(record: &T, index: usize) -> RowKey {
    AUTO_KEY_FIELDS
        .iter()
        .find_map(|name| record.field(name).as_ref().and_then(RowKey::from_value))
        .unwrap_or_else(|| RowKey::from(index))
}

/// A data sequence paired with the spec that identifies its rows.
///
/// This is a borrowed view: it is rebuilt from the caller's data for every
/// operation and never outlives it.
pub struct KeyedRows<'a, T> {
    data: &'a [T],
    spec: &'a RowKeySpec<T>,
}

impl<T> Clone for KeyedRows<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for KeyedRows<'_, T> {}

impl<'a, T: Record> KeyedRows<'a, T> {
    /// Create a view over `data`.
    pub fn new(data: &'a [T], spec: &'a RowKeySpec<T>) -> Self {
        Self { data, spec }
    }

    /// The underlying records.
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// The key spec in use.
    pub fn spec(&self) -> &'a RowKeySpec<T> {
        self.spec
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Key of the row at `index`.
    pub fn key_at(&self, index: usize) -> Option<RowKey> {
        self.data
            .get(index)
            .map(|record| resolve_key(record, index, self.spec))
    }

    /// Resolve the key of an arbitrary record as if it sat at `index`.
    pub fn key_of(&self, record: &T, index: usize) -> RowKey {
        resolve_key(record, index, self.spec)
    }

    /// All keys in data order.
    pub fn keys(&self) -> Vec<RowKey> {
        self.data
            .iter()
            .enumerate()
            .map(|(index, record)| resolve_key(record, index, self.spec))
            .collect()
    }

    /// Index of the first row whose key equals `key`.
    pub fn position(&self, key: &RowKey) -> Option<usize> {
        self.data
            .iter()
            .enumerate()
            .position(|(index, record)| resolve_key(record, index, self.spec) == *key)
    }

    /// Rows whose key is in `keys`, in data order.
    pub fn rows_with_keys(&self, keys: &[RowKey]) -> Vec<&'a T> {
        self.data
            .iter()
            .enumerate()
            .filter(|(index, record)| keys.contains(&resolve_key(*record, *index, self.spec)))
            .map(|(_, record)| record)
            .collect()
    }

    /// Keys that resolve for more than one row, in order of first repeat.
    pub fn duplicate_keys(&self) -> Vec<RowKey> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for key in self.keys() {
            if !seen.insert(key.clone()) && !duplicates.contains(&key) {
                duplicates.push(key);
            }
        }
        duplicates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_field_used_without_spec() {
        let record = json!({"id": "42", "name": "Alpha"});
        assert_eq!(resolve_key(&record, 7, &RowKeySpec::Auto), RowKey::from("42"));
    }

    #[test]
    fn test_key_field_preferred_over_id() {
        let record = json!({"id": 1, "key": "k-1"});
        assert_eq!(resolve_key(&record, 0, &RowKeySpec::Auto), RowKey::from("k-1"));
    }

    #[test]
    fn test_integer_id() {
        let record = json!({"id": 3, "title": "Todo 1"});
        assert_eq!(resolve_key(&record, 0, &RowKeySpec::Auto), RowKey::Int(3));
    }

    #[test]
    fn test_index_fallback() {
        let records = [json!({"name": "a"}), json!({"name": "b"}), json!("scalar")];
        for (index, record) in records.iter().enumerate() {
            assert_eq!(
                resolve_key(record, index, &RowKeySpec::Auto),
                RowKey::from(index)
            );
        }
    }

    #[test]
    fn test_null_id_falls_back_to_index() {
        let record = json!({"id": null});
        assert_eq!(resolve_key(&record, 4, &RowKeySpec::Auto), RowKey::Int(4));
    }

    #[test]
    fn test_named_field() {
        let record = json!({"id": 1, "sku": "X-9"});
        let spec = RowKeySpec::field("sku");
        assert_eq!(resolve_key(&record, 0, &spec), RowKey::from("X-9"));
    }

    #[test]
    fn test_missing_named_field_falls_through() {
        let record = json!({"id": 1});
        let spec = RowKeySpec::field("sku");
        assert_eq!(resolve_key(&record, 0, &spec), RowKey::Int(1));

        let bare = json!({"name": "n"});
        assert_eq!(resolve_key(&bare, 5, &spec), RowKey::Int(5));
    }

    #[test]
    fn test_extract_function_wins() {
        let record = json!({"id": 1, "name": "Alpha"});
        let spec = RowKeySpec::extract(|r: &Value| {
            RowKey::from(format!("row-{}", r["name"].as_str().unwrap_or_default()))
        });
        assert_eq!(resolve_key(&record, 0, &spec), RowKey::from("row-Alpha"));
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(RowKey::from_value(&json!(1.5)), Some(RowKey::from("1.5")));
        assert_eq!(RowKey::from_value(&json!(true)), Some(RowKey::from("true")));
        assert_eq!(RowKey::from_value(&json!([1])), None);
        assert_eq!(RowKey::from_value(&json!({"a": 1})), None);
    }

    #[test]
    fn test_record_without_fields() {
        #[derive(Clone)]
        struct Opaque(u8);
        impl Record for Opaque {}

        let spec = RowKeySpec::extract(|o: &Opaque| RowKey::from(i64::from(o.0)));
        assert_eq!(resolve_key(&Opaque(9), 0, &spec), RowKey::Int(9));
        assert_eq!(resolve_key(&Opaque(9), 2, &RowKeySpec::Auto), RowKey::Int(2));
    }

    #[test]
    fn test_keyed_rows_lookup() {
        let data = vec![json!({"id": "a"}), json!({"id": "b"}), json!({"id": "c"})];
        let spec = RowKeySpec::Auto;
        let rows = KeyedRows::new(&data, &spec);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.key_at(1), Some(RowKey::from("b")));
        assert_eq!(rows.key_at(3), None);
        assert_eq!(rows.position(&RowKey::from("c")), Some(2));
        assert_eq!(rows.position(&RowKey::from("z")), None);

        let picked = rows.rows_with_keys(&[RowKey::from("c"), RowKey::from("a")]);
        assert_eq!(picked, vec![&data[0], &data[2]]);
    }

    #[test]
    fn test_duplicate_keys_reported_once() {
        let data = vec![
            json!({"id": 1}),
            json!({"id": 1}),
            json!({"id": 2}),
            json!({"id": 1}),
        ];
        let spec = RowKeySpec::Auto;
        let rows = KeyedRows::new(&data, &spec);
        assert_eq!(rows.duplicate_keys(), vec![RowKey::Int(1)]);
        assert_eq!(rows.position(&RowKey::Int(1)), Some(0));
    }

    #[test]
    fn test_row_key_display_and_serde() {
        assert_eq!(RowKey::Int(7).to_string(), "7");
        assert_eq!(RowKey::from("abc").to_string(), "abc");

        let keys: Vec<RowKey> = serde_json::from_str(r#"[1, "two"]"#).unwrap();
        assert_eq!(keys, vec![RowKey::Int(1), RowKey::from("two")]);
    }
}
