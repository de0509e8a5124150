//! Data sources for the demo table.
//!
//! Records are JSON objects, either read from a file or taken from the
//! built-in sample set. Column declarations can be inferred from the first
//! record when the data carries no schema of its own.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::table::{
    resolve_key, Alignment, Breakpoint, ColumnConfig, OrderUpdate, Record, RowKey, RowKeySpec,
};

/// Field used to persist row order.
pub const ORDER_FIELD: &str = "order";

/// Errors that can occur while loading records.
#[derive(Debug, Error)]
pub enum DataError {
    /// The data file could not be read.
    #[error("Failed to read data file: {0}")]
    Read(#[from] std::io::Error),

    /// The data file is not valid JSON.
    #[error("Failed to parse data file: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value is not an array.
    #[error("Data file must contain a JSON array of records")]
    NotAnArray,

    /// An element of the array is not an object.
    #[error("Record {index} is not a JSON object")]
    NotAnObject { index: usize },
}

/// Load records from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not JSON, or is not an
/// array of objects.
pub fn load_records(path: &Path) -> Result<Vec<Value>, DataError> {
    let contents = fs::read_to_string(path)?;
    let records = parse_records(&contents)?;
    info!(path = %path.display(), count = records.len(), "Records loaded");
    Ok(records)
}

/// Parse a JSON array of objects.
pub fn parse_records(contents: &str) -> Result<Vec<Value>, DataError> {
    let Value::Array(records) = serde_json::from_str::<Value>(contents)? else {
        return Err(DataError::NotAnArray);
    };
    if let Some(index) = records.iter().position(|r| !r.is_object()) {
        return Err(DataError::NotAnObject { index });
    }
    Ok(records)
}

/// The built-in sample records, sorted by their `order` field.
pub fn sample_records() -> Vec<Value> {
    let mut records = vec![
        json!({
            "id": "3",
            "name": "Payment gateway",
            "status": "inactive",
            "priority": "high",
            "order": 3,
            "createdAt": "2024-01-13",
            "description": "Integrate a third-party payment API",
        }),
        json!({
            "id": "1",
            "name": "User management",
            "status": "active",
            "priority": "high",
            "order": 1,
            "createdAt": "2024-01-15",
            "description": "Manage user permissions and role assignment",
        }),
        json!({
            "id": "5",
            "name": "File upload",
            "status": "pending",
            "priority": "medium",
            "order": 5,
            "createdAt": "2024-01-11",
            "description": "Upload and preview files in many formats",
        }),
        json!({
            "id": "2",
            "name": "Data analysis",
            "status": "pending",
            "priority": "medium",
            "order": 2,
            "createdAt": "2024-01-14",
            "description": "Business statistics and visualisation",
        }),
        json!({
            "id": "4",
            "name": "Notification service",
            "status": "active",
            "priority": "low",
            "order": 4,
            "createdAt": "2024-01-12",
            "description": "Send email and SMS notifications",
        }),
    ];
    sort_by_order(&mut records);
    records
}

/// Columns for the sample records.
pub fn sample_columns() -> Vec<ColumnConfig<Value>> {
    vec![
        ColumnConfig::new("name", "Name").data_index("name").min_width(12),
        ColumnConfig::new("status", "Status")
            .data_index("status")
            .fixed(10)
            .render(|value, _, _| status_label(value.and_then(Value::as_str))),
        ColumnConfig::new("priority", "Priority")
            .data_index("priority")
            .fixed(9)
            .responsive([Breakpoint::Md]),
        ColumnConfig::new("order", "Order")
            .data_index(ORDER_FIELD)
            .fixed(6)
            .align(Alignment::Right)
            .responsive([Breakpoint::Lg]),
        ColumnConfig::new("createdAt", "Created")
            .data_index("createdAt")
            .fixed(11)
            .responsive([Breakpoint::Lg]),
        ColumnConfig::new("description", "Description")
            .data_index("description")
            .ellipsis()
            .responsive([Breakpoint::Xl]),
    ]
}

fn status_label(status: Option<&str>) -> String {
    match status {
        Some("active") => "● active".to_string(),
        Some("pending") => "◐ pending".to_string(),
        Some("inactive") => "○ inactive".to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Infer columns from the fields of the first record.
///
/// The first two fields are always shown; each further field needs one more
/// breakpoint of width, up to `xl`.
pub fn infer_columns(records: &[Value]) -> Vec<ColumnConfig<Value>> {
    let Some(Value::Object(first)) = records.first() else {
        return Vec::new();
    };
    first
        .keys()
        .enumerate()
        .map(|(position, field)| {
            let column =
                ColumnConfig::new(field.clone(), title_case(field)).data_index(field.clone());
            match position {
                0 | 1 => column,
                2 => column.responsive([Breakpoint::Md]),
                3 => column.responsive([Breakpoint::Lg]),
                _ => column.responsive([Breakpoint::Xl]),
            }
        })
        .collect()
}

fn title_case(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Sort records by their `order` field. Records without one go last, in
/// their original relative order.
pub fn sort_by_order(records: &mut [Value]) {
    records.sort_by_key(|r| {
        r.field(ORDER_FIELD)
            .and_then(|v| v.as_i64())
            .unwrap_or(i64::MAX)
    });
}

/// Write order updates back into the records and re-sort them.
///
/// Updates whose key matches no record are ignored.
pub fn apply_order_updates(
    records: &mut [Value],
    updates: &[OrderUpdate],
    spec: &RowKeySpec<Value>,
) {
    let keys: Vec<RowKey> = records
        .iter()
        .enumerate()
        .map(|(index, record)| resolve_key(record, index, spec))
        .collect();

    for update in updates {
        let Some(index) = keys.iter().position(|k| *k == update.key) else {
            debug!(key = %update.key, "Order update for unknown record");
            continue;
        };
        if let Some(object) = records[index].as_object_mut() {
            object.insert(ORDER_FIELD.to_string(), json!(update.order));
        }
    }
    sort_by_order(records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::visible_columns;
    use tempfile::NamedTempFile;

    fn ids(records: &[Value]) -> Vec<&str> {
        records.iter().filter_map(|r| r["id"].as_str()).collect()
    }

    #[test]
    fn test_sample_records_sorted() {
        let records = sample_records();
        assert_eq!(ids(&records), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_sample_columns_by_breakpoint() {
        let columns = sample_columns();
        let keys = |bp| {
            visible_columns(&columns, bp)
                .iter()
                .map(|c| c.key.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(keys(Breakpoint::Sm), vec!["name", "status"]);
        assert_eq!(keys(Breakpoint::Md), vec!["name", "status", "priority"]);
        assert_eq!(keys(Breakpoint::Xl).len(), 6);
    }

    #[test]
    fn test_status_render() {
        let columns = sample_columns();
        let record = json!({"status": "pending"});
        assert_eq!(columns[1].cell_text(&record, 0), "◐ pending");
    }

    #[test]
    fn test_parse_records() {
        let records = parse_records(r#"[{"id": 1}, {"id": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);

        assert!(matches!(parse_records(r#"{"id": 1}"#), Err(DataError::NotAnArray)));
        assert!(matches!(
            parse_records(r#"[{"id": 1}, 2]"#),
            Err(DataError::NotAnObject { index: 1 })
        ));
        assert!(matches!(parse_records("[1,"), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_load_records_from_file() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), r#"[{"id": 3, "title": "Todo 1"}, {"id": 2}]"#).unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(records[0]["title"], "Todo 1");

        let missing = file.path().with_extension("missing");
        assert!(matches!(load_records(&missing), Err(DataError::Read(_))));
    }

    #[test]
    fn test_infer_columns() {
        let records = vec![json!({"id": 1, "title": "a", "owner": "x", "due": "y", "notes": "z"})];
        let columns = infer_columns(&records);
        let titles: Vec<_> = columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Id", "Title", "Owner", "Due", "Notes"]);
        assert_eq!(columns[0].min_breakpoint(), None);
        assert_eq!(columns[2].min_breakpoint(), Some(Breakpoint::Md));
        assert_eq!(columns[4].min_breakpoint(), Some(Breakpoint::Xl));
        assert!(infer_columns(&[]).is_empty());
    }

    #[test]
    fn test_apply_order_updates() {
        let mut records = sample_records();
        let updates = vec![
            OrderUpdate {
                key: RowKey::from("3"),
                order: 1,
            },
            OrderUpdate {
                key: RowKey::from("1"),
                order: 2,
            },
            OrderUpdate {
                key: RowKey::from("2"),
                order: 3,
            },
            OrderUpdate {
                key: RowKey::from("missing"),
                order: 9,
            },
        ];
        apply_order_updates(&mut records, &updates, &RowKeySpec::Auto);
        assert_eq!(ids(&records), vec!["3", "1", "2", "4", "5"]);
        assert_eq!(records[0]["order"], 1);
    }
}
