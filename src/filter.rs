use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};
use crate::schema::order;
use crate::source::timestamp_micros;

pub(crate) const MICROS_PER_DAY: i64 = 86_400_000_000;

/// Inclusive calendar-date range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Limit the range to `bounds`, the way a bounded date picker would.
    ///
    /// Inverted ranges stay inverted.
    pub fn clamp_to(self, bounds: DateRange) -> Self {
        Self {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }

    /// Number of calendar days covered, zero when inverted.
    pub fn days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| DashboardError::InvalidDate(s.to_string()))
}

/// Rows whose purchase date lies in `range`, both ends inclusive.
///
/// Compares against whole days: a row stamped at any time on `range.end`
/// is kept. Never validates `start <= end`; an inverted range selects
/// nothing.
pub fn filter(table: &DataFrame, range: DateRange) -> Result<DataFrame> {
    let lower = day_start_micros(range.start);
    let upper = range
        .end
        .succ_opt()
        .map(day_start_micros)
        .unwrap_or(i64::MAX);

    let micros = col(order::ORDER_PURCHASE_TIMESTAMP).cast(DataType::Int64);
    let df = table
        .clone()
        .lazy()
        .filter(micros.clone().gt_eq(lit(lower)).and(micros.lt(lit(upper))))
        .collect()?;

    tracing::debug!(%range, rows = df.height(), "filtered order table");
    Ok(df)
}

/// First and last purchase date in `table`, `None` when it has no rows.
pub fn date_bounds(table: &DataFrame) -> Result<Option<DateRange>> {
    let micros = timestamp_micros(table)?;
    let (Some(min), Some(max)) = (micros.min(), micros.max()) else {
        return Ok(None);
    };
    Ok(Some(DateRange::new(date_of_micros(min)?, date_of_micros(max)?)))
}

pub(crate) fn day_start_micros(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_micros()
}

pub(crate) fn day_key(micros: i64) -> i64 {
    micros.div_euclid(MICROS_PER_DAY)
}

pub(crate) fn date_of_micros(micros: i64) -> Result<NaiveDate> {
    DateTime::from_timestamp_micros(micros)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| DashboardError::InvalidData(format!("timestamp out of range: {micros}")))
}
