//! Conversion of sqlx MySQL rows into driver-neutral row sets.
//!
//! Cells become `serde_json::Value`s: integers and floats stay numeric,
//! temporal types become strings, binary types become base64, and anything
//! else is read as text.

use base64::Engine;
use serde_json::Value;
use sqltrail_runtime::{Row, RowSet};
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// Build a row set from fetched rows. Column names come from the first row,
/// so an empty result has no columns.
pub fn row_set(rows: &[MySqlRow]) -> RowSet {
    let columns = rows
        .first()
        .map(|r| r.columns().iter().map(|c| c.name().to_string()).collect())
        .unwrap_or_default();

    RowSet::new(columns, rows.iter().map(row).collect())
}

pub fn row(row: &MySqlRow) -> Row {
    Row::new((0..row.len()).map(|i| cell(row, i)).collect())
}

fn cell(row: &MySqlRow, index: usize) -> Value {
    let type_name = match row.try_get_raw(index) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_ascii_uppercase(),
        Err(_) => return Value::Null,
    };

    let decoded = match type_name.as_str() {
        "BOOLEAN" => row.try_get_unchecked::<bool, _>(index).map(Value::from),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            row.try_get_unchecked::<i64, _>(index).map(Value::from)
        }
        t if t.ends_with("UNSIGNED") => row.try_get_unchecked::<u64, _>(index).map(Value::from),
        "FLOAT" | "DOUBLE" => row.try_get_unchecked::<f64, _>(index).map(Value::from),
        "JSON" => row.try_get_unchecked::<Value, _>(index),
        "DATE" => row
            .try_get_unchecked::<chrono::NaiveDate, _>(index)
            .map(|d| Value::from(d.to_string())),
        "TIME" => row
            .try_get_unchecked::<chrono::NaiveTime, _>(index)
            .map(|t| Value::from(t.to_string())),
        "DATETIME" => row
            .try_get_unchecked::<chrono::NaiveDateTime, _>(index)
            .map(|t| Value::from(t.format("%Y-%m-%d %H:%M:%S").to_string())),
        "TIMESTAMP" => row
            .try_get_unchecked::<chrono::DateTime<chrono::Utc>, _>(index)
            .map(|t| Value::from(t.to_rfc3339())),
        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => row
            .try_get_unchecked::<Vec<u8>, _>(index)
            .map(|b| Value::from(base64::engine::general_purpose::STANDARD.encode(b))),
        _ => row.try_get_unchecked::<String, _>(index).map(Value::from),
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(
            column = index,
            type_name = %type_name,
            error = %e,
            "Falling back to text decode"
        );
        row.try_get_unchecked::<String, _>(index)
            .map(Value::from)
            .unwrap_or(Value::Null)
    })
}
