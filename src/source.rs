//! Loading the order line-item table from disk.
//!
//! The CSV is read with every column as a string, then the columns the
//! dashboard computes on are typed: `order_purchase_timestamp` becomes a
//! microsecond `Datetime`, `price` becomes `Float64`. The result is sorted by
//! purchase time.

use std::path::Path;

use polars::datatypes::TimeUnit;
use polars::prelude::*;

use crate::error::{DashboardError, Result};
use crate::schema::order;

/// Options controlling how the order table is parsed.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// strftime format of `order_purchase_timestamp`. `None` accepts any of
    /// [`order::TIMESTAMP_FORMATS`].
    pub timestamp_format: Option<String>,
}

impl SourceOptions {
    pub fn with_timestamp_format(format: impl Into<String>) -> Self {
        Self {
            timestamp_format: Some(format.into()),
        }
    }

    fn candidate_formats(&self) -> Vec<&str> {
        match &self.timestamp_format {
            Some(format) => vec![format.as_str()],
            None => order::TIMESTAMP_FORMATS.to_vec(),
        }
    }
}

/// Load the order table with default options.
pub fn load(path: impl AsRef<Path>) -> Result<DataFrame> {
    load_with(path, &SourceOptions::default())
}

/// Load the order table from a CSV file.
///
/// Required columns: order_id, order_purchase_timestamp, price,
/// product_category_name, seller_id. All other columns are preserved as
/// strings. A single unparseable timestamp fails the whole load.
pub fn load_with(path: impl AsRef<Path>, options: &SourceOptions) -> Result<DataFrame> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "reading order table");

    let raw = read_csv_as_strings(path)?;
    let df = prepare_orders(raw, options)?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        "loaded order table"
    );
    Ok(df)
}

/// Type and sort an all-string order table.
pub fn prepare_orders(raw: DataFrame, options: &SourceOptions) -> Result<DataFrame> {
    require_columns(&raw, &order::REQUIRED)?;

    let df = parse_timestamps(raw, &options.candidate_formats())?;

    let missing = df.column(order::ORDER_PURCHASE_TIMESTAMP)?.null_count();
    if missing > 0 {
        return Err(DashboardError::InvalidData(format!(
            "Column '{}' has {} missing values",
            order::ORDER_PURCHASE_TIMESTAMP,
            missing
        )));
    }

    let df = df
        .lazy()
        .with_columns([col(order::PRICE)
            .str()
            .strip_chars(lit(" \t\r\n"))
            .cast(DataType::Float64)])
        .sort(
            [order::ORDER_PURCHASE_TIMESTAMP],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    Ok(df)
}

/// Read a CSV file with all columns as String dtype.
/// Trims whitespace from column names.
fn read_csv_as_strings(path: &Path) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

fn require_columns(df: &DataFrame, required: &[&str]) -> Result<()> {
    for &col_name in required {
        if df.column(col_name).is_err() {
            return Err(DashboardError::MissingColumn(col_name.to_string()));
        }
    }
    Ok(())
}

/// Parse the purchase column with the first format every row matches.
fn parse_timestamps(raw: DataFrame, formats: &[&str]) -> Result<DataFrame> {
    let mut last_err = None;
    for &format in formats {
        match parse_datetime_column(raw.clone(), order::ORDER_PURCHASE_TIMESTAMP, format) {
            Ok(df) => {
                tracing::debug!(format, "parsed purchase timestamps");
                return Ok(df);
            }
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        DashboardError::InvalidData("no timestamp format configured".to_string())
    }))
}

/// Parse a string column to Datetime, failing on the first bad value.
fn parse_datetime_column(df: DataFrame, column: &str, format: &str) -> Result<DataFrame> {
    df.lazy()
        .with_columns([col(column)
            .str()
            .strip_chars(lit(" \t\r\n"))
            .str()
            .to_datetime(
                Some(TimeUnit::Microseconds),
                None,
                StrptimeOptions {
                    format: Some(format.into()),
                    strict: true,
                    ..Default::default()
                },
                lit("raise"),
            )])
        .collect()
        .map_err(|e| {
            DashboardError::InvalidData(format!(
                "Column '{column}' does not match timestamp format '{format}': {e}"
            ))
        })
}

/// Microsecond timestamps of the purchase column.
pub(crate) fn timestamp_micros(df: &DataFrame) -> Result<Int64Chunked> {
    let series = df
        .column(order::ORDER_PURCHASE_TIMESTAMP)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    Ok(series.i64()?.clone())
}
