//! Typed rows extracted from the summary DataFrames, and the scalar metrics
//! shown above the charts.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

use crate::aggregation::Summaries;
use crate::error::{DashboardError, Result};
use crate::filter::date_of_micros;
use crate::schema::{daily_orders, product_performance, seller_performance};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOrderRow {
    pub date: NaiveDate,
    pub order_count: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub product_category_name: String,
    pub product_category_ordered: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SellerRow {
    pub seller_id: String,
    pub product_category_name: String,
    pub seller_total_order: i64,
    pub seller_revenue: f64,
}

/// All three summaries as plain rows, in summary order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryRows {
    pub daily_orders: Vec<DailyOrderRow>,
    pub product_performance: Vec<ProductRow>,
    pub seller_performance: Vec<SellerRow>,
}

impl SummaryRows {
    pub fn from_summaries(summaries: &Summaries) -> Result<Self> {
        Ok(Self {
            daily_orders: daily_order_rows(&summaries.daily_orders)?,
            product_performance: product_rows(&summaries.product_performance)?,
            seller_performance: seller_rows(&summaries.seller_performance)?,
        })
    }
}

// ── Row extraction ──────────────────────────────────────────────────────────

fn i64_column(df: &DataFrame, name: &str) -> Result<Int64Chunked> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int64)?;
    Ok(series.i64()?.clone())
}

fn f64_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.clone())
}

fn str_at(values: &StringChunked, i: usize, name: &str) -> Result<String> {
    values
        .get(i)
        .map(str::to_string)
        .ok_or_else(|| DashboardError::InvalidData(format!("Null {name} at row {i}")))
}

pub fn daily_order_rows(df: &DataFrame) -> Result<Vec<DailyOrderRow>> {
    let days = i64_column(df, daily_orders::DAY)?;
    let counts = i64_column(df, daily_orders::ORDER_COUNT)?;
    let revenue = f64_column(df, daily_orders::REVENUE)?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let micros = days.get(i).ok_or_else(|| {
            DashboardError::InvalidData(format!("Null {} at row {i}", daily_orders::DAY))
        })?;
        rows.push(DailyOrderRow {
            date: date_of_micros(micros)?,
            order_count: counts.get(i).unwrap_or(0),
            revenue: revenue.get(i).unwrap_or(0.0),
        });
    }
    Ok(rows)
}

pub fn product_rows(df: &DataFrame) -> Result<Vec<ProductRow>> {
    let names = df.column(product_performance::PRODUCT_CATEGORY_NAME)?.str()?;
    let ordered = i64_column(df, product_performance::PRODUCT_CATEGORY_ORDERED)?;

    (0..df.height())
        .map(|i| {
            Ok(ProductRow {
                product_category_name: str_at(
                    names,
                    i,
                    product_performance::PRODUCT_CATEGORY_NAME,
                )?,
                product_category_ordered: ordered.get(i).unwrap_or(0),
            })
        })
        .collect()
}

pub fn seller_rows(df: &DataFrame) -> Result<Vec<SellerRow>> {
    let sellers = df.column(seller_performance::SELLER_ID)?.str()?;
    let categories = df.column(seller_performance::PRODUCT_CATEGORY_NAME)?.str()?;
    let orders = i64_column(df, seller_performance::SELLER_TOTAL_ORDER)?;
    let revenue = f64_column(df, seller_performance::SELLER_REVENUE)?;

    (0..df.height())
        .map(|i| {
            Ok(SellerRow {
                seller_id: str_at(sellers, i, seller_performance::SELLER_ID)?,
                product_category_name: str_at(
                    categories,
                    i,
                    seller_performance::PRODUCT_CATEGORY_NAME,
                )?,
                seller_total_order: orders.get(i).unwrap_or(0),
                seller_revenue: revenue.get(i).unwrap_or(0.0),
            })
        })
        .collect()
}

// ── Scalar metrics ──────────────────────────────────────────────────────────

/// Headline numbers. An empty selection gives all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    pub total_orders: i64,
    pub total_revenue: f64,
    pub average_seller_revenue: f64,
    /// Mean orders per seller/category pair, rounded half to even.
    pub average_seller_order_count: i64,
}

impl Metrics {
    pub fn compute(daily: &[DailyOrderRow], sellers: &[SellerRow]) -> Self {
        let total_orders = daily.iter().map(|d| d.order_count).sum();
        let total_revenue = daily.iter().map(|d| d.revenue).sum();

        let average_seller_revenue = mean(sellers.iter().map(|s| s.seller_revenue));
        let average_seller_order_count =
            mean(sellers.iter().map(|s| s.seller_total_order as f64)).round_ties_even() as i64;

        Self {
            total_orders,
            total_revenue,
            average_seller_revenue,
            average_seller_order_count,
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fixtures;

    fn seller(id: &str, orders: i64, revenue: f64) -> SellerRow {
        SellerRow {
            seller_id: id.to_string(),
            product_category_name: "toys".to_string(),
            seller_total_order: orders,
            seller_revenue: revenue,
        }
    }

    #[test]
    fn toys_scenario_rows_and_metrics() {
        let summaries = Summaries::from_orders(&fixtures::toys_scenario()).unwrap();
        let rows = SummaryRows::from_summaries(&summaries).unwrap();

        assert_eq!(rows.daily_orders.len(), 3);
        assert_eq!(
            rows.daily_orders[1],
            DailyOrderRow {
                date: NaiveDate::from_ymd_opt(2018, 1, 2).unwrap(),
                order_count: 0,
                revenue: 0.0,
            }
        );
        assert_eq!(
            rows.product_performance,
            vec![ProductRow {
                product_category_name: "toys".to_string(),
                product_category_ordered: 4,
            }]
        );
        assert_eq!(rows.seller_performance, vec![seller("S1", 4, 65.0)]);

        let metrics = Metrics::compute(&rows.daily_orders, &rows.seller_performance);
        assert_eq!(metrics.total_orders, 4);
        assert_eq!(metrics.total_revenue, 65.0);
        assert_eq!(metrics.average_seller_revenue, 65.0);
        assert_eq!(metrics.average_seller_order_count, 4);
    }

    #[test]
    fn empty_selection_gives_zero_metrics() {
        assert_eq!(Metrics::compute(&[], &[]), Metrics::default());
    }

    #[test]
    fn average_order_count_rounds_half_to_even() {
        let sellers = vec![seller("a", 2, 10.0), seller("b", 3, 20.0)];
        let metrics = Metrics::compute(&[], &sellers);
        assert_eq!(metrics.average_seller_revenue, 15.0);
        assert_eq!(metrics.average_seller_order_count, 2);

        let sellers = vec![seller("a", 3, 0.0), seller("b", 4, 0.0)];
        assert_eq!(Metrics::compute(&[], &sellers).average_seller_order_count, 4);

        let sellers = vec![seller("a", 1, 0.0), seller("b", 1, 0.0), seller("c", 2, 0.0)];
        assert_eq!(Metrics::compute(&[], &sellers).average_seller_order_count, 1);
    }
}
