//! CSV export of loaded records with user-chosen columns.

use std::path::{Path, PathBuf};

use csv::Writer;
use thiserror::Error;
use time::Date;

use crate::buckets::{BucketBoard, BucketSpec, Capacity, Redrop, Selection};
use crate::format::iso_date;
use crate::model::{Metric, Segment};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// One exportable column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportField {
    pub key: &'static str,
    pub label: &'static str,
}

const fn field(key: &'static str, label: &'static str) -> ExportField {
    ExportField { key, label }
}

/// A record type that can be written as CSV rows.
pub trait ExportRecord {
    /// Every column the record can produce, in catalog order.
    fn catalog() -> &'static [ExportField];
    /// Cell text for `key`; unknown keys and missing values are empty.
    fn field_value(&self, key: &str) -> String;
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Select at least one column to export")]
    NoColumns,
    #[error("Unknown export column {0}")]
    UnknownColumn(String),
    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Column picker: one unlimited bucket where re-dropping moves a column last.
pub fn column_board<R: ExportRecord>() -> BucketBoard<Selection, &'static str> {
    BucketBoard::new(
        R::catalog().iter().map(|field| field.key).collect(),
        vec![
            BucketSpec::new(Selection::Selected, "Columns", Capacity::Unlimited)
                .with_redrop(Redrop::MoveToEnd),
        ],
    )
}

pub fn label_for<R: ExportRecord>(key: &str) -> Option<&'static str> {
    R::catalog()
        .iter()
        .find(|field| field.key == key)
        .map(|field| field.label)
}

/// Encode `records` as BOM-prefixed CSV with the given column order.
pub fn to_csv_bytes<R: ExportRecord>(
    records: &[R],
    columns: &[&str],
) -> Result<Vec<u8>, ExportError> {
    if columns.is_empty() {
        return Err(ExportError::NoColumns);
    }
    let labels = columns
        .iter()
        .map(|key| label_for::<R>(key).ok_or_else(|| ExportError::UnknownColumn(key.to_string())))
        .collect::<Result<Vec<_>, _>>()?;

    let mut writer = Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(&labels)?;
    for record in records {
        writer.write_record(columns.iter().map(|key| record.field_value(key)))?;
    }
    writer
        .into_inner()
        .map_err(|err| ExportError::Csv(csv::Error::from(err.into_error())))
}

/// Write the CSV to `path`.
pub fn save_csv<R: ExportRecord>(
    path: &Path,
    records: &[R],
    columns: &[&str],
) -> Result<(), ExportError> {
    let bytes = to_csv_bytes(records, columns)?;
    std::fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        "Exported {} rows x {} columns to {}",
        records.len(),
        columns.len(),
        path.display()
    );
    Ok(())
}

/// `<name>_export_<YYYY-MM-DD>.csv` with path separators stripped from `name`.
pub fn export_file_name(name: &str, date: Date) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect();
    let stem = if cleaned.is_empty() { "datahub" } else { &cleaned };
    format!("{stem}_export_{}.csv", iso_date(date))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

const METRIC_FIELDS: &[ExportField] = &[
    field("id", "ID"),
    field("name", "Name"),
    field("description", "Description"),
    field("category", "Category"),
    field("priority", "Priority"),
    field("status", "Status"),
    field("value", "Value"),
    field("unit", "Unit"),
    field("calculation_logic", "Calculation logic"),
    field("data_source", "Data source"),
    field("aggregation_period", "Aggregation period"),
    field("metric_owner", "Owner"),
    field("version", "Version"),
    field("updated_at", "Updated at"),
];

impl ExportRecord for Metric {
    fn catalog() -> &'static [ExportField] {
        METRIC_FIELDS
    }

    fn field_value(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "description" => text(&self.description),
            "category" => text(&self.category),
            "priority" => number(self.priority.map(|p| p.as_str())),
            "status" => text(&self.status),
            "value" => number(self.value),
            "unit" => text(&self.unit),
            "calculation_logic" => text(&self.calculation_logic),
            "data_source" => text(&self.data_source),
            "aggregation_period" => text(&self.aggregation_period),
            "metric_owner" => text(&self.metric_owner),
            "version" => text(&self.version),
            "updated_at" => text(&self.updated_at),
            _ => String::new(),
        }
    }
}

const SEGMENT_FIELDS: &[ExportField] = &[
    field("id", "ID"),
    field("name", "Name"),
    field("description", "Description"),
    field("category", "Category"),
    field("tags", "Tags"),
    field("customer_count", "Customers"),
    field("refresh_period", "Refresh period"),
    field("segment_owner", "Owner"),
    field("metrics", "Metrics"),
    field("last_touch_channel", "Last touch channel"),
    field("last_touch_date", "Last touch date"),
    field("query", "Query"),
];

impl ExportRecord for Segment {
    fn catalog() -> &'static [ExportField] {
        SEGMENT_FIELDS
    }

    fn field_value(&self, key: &str) -> String {
        match key {
            "id" => self.id.to_string(),
            "name" => self.name.clone(),
            "description" => text(&self.description),
            "category" => text(&self.category),
            "tags" => text(&self.tags),
            "customer_count" => number(self.customer_count),
            "refresh_period" => text(&self.refresh_period),
            "segment_owner" => text(&self.segment_owner),
            "metrics" => self
                .metric_slots()
                .iter()
                .map(|(label, _)| *label)
                .collect::<Vec<_>>()
                .join("; "),
            "last_touch_channel" => text(&self.last_touch_channel),
            "last_touch_date" => text(&self.last_touch_date),
            "query" => text(&self.query),
            _ => String::new(),
        }
    }
}
