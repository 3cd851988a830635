//! Summary tables derived from a (filtered) order table.
//!
//! Every function here is pure: it reads the table it is given and returns a
//! fresh DataFrame. Empty input yields an empty summary with the full output
//! schema.

use polars::datatypes::TimeUnit;
use polars::prelude::*;

use crate::error::Result;
use crate::filter::{day_key, MICROS_PER_DAY};
use crate::schema::{daily_orders, internal, order, product_performance, seller_performance};
use crate::source::timestamp_micros;

/// The three summaries the dashboard renders.
#[derive(Debug, Clone)]
pub struct Summaries {
    pub daily_orders: DataFrame,
    pub product_performance: DataFrame,
    pub seller_performance: DataFrame,
}

impl Summaries {
    pub fn from_orders(table: &DataFrame) -> Result<Self> {
        Ok(Self {
            daily_orders: daily_orders(table)?,
            product_performance: product_performance(table)?,
            seller_performance: seller_performance(table)?,
        })
    }
}

/// Distinct non-null order ids in the current group.
fn distinct_orders() -> Expr {
    col(order::ORDER_ID)
        .drop_nulls()
        .n_unique()
        .cast(DataType::Int64)
}

fn descending_stable() -> SortMultipleOptions {
    SortMultipleOptions::default()
        .with_order_descending(true)
        .with_maintain_order(true)
}

/// Orders and revenue per calendar day, gap-filled.
///
/// Output columns: order_purchase_timestamp (midnight), order_count, revenue.
/// Every day between the first and last purchase gets a row; days without
/// purchases carry zeros.
pub fn daily_orders(table: &DataFrame) -> Result<DataFrame> {
    let keys: Vec<i64> = timestamp_micros(table)?
        .into_iter()
        .map(|us| us.map(day_key).unwrap_or_default())
        .collect();

    let span: Vec<i64> = match (keys.iter().min(), keys.iter().max()) {
        (Some(&first), Some(&last)) => (first..=last).collect(),
        _ => Vec::new(),
    };

    let mut keyed = table.select([order::ORDER_ID, order::PRICE])?;
    keyed.with_column(Column::new(internal::DAY_KEY.into(), &keys))?;

    let per_day = keyed
        .lazy()
        .group_by([col(internal::DAY_KEY)])
        .agg([
            distinct_orders().alias(daily_orders::ORDER_COUNT),
            col(order::PRICE).sum().alias(daily_orders::REVENUE),
        ]);

    let calendar = DataFrame::new(vec![Column::new(internal::DAY_KEY.into(), &span)])?;

    let df = calendar
        .lazy()
        .join(
            per_day,
            [col(internal::DAY_KEY)],
            [col(internal::DAY_KEY)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([internal::DAY_KEY], SortMultipleOptions::default())
        .select([
            (col(internal::DAY_KEY) * lit(MICROS_PER_DAY))
                .cast(DataType::Datetime(TimeUnit::Microseconds, None))
                .alias(daily_orders::DAY),
            col(daily_orders::ORDER_COUNT).fill_null(lit(0i64)),
            col(daily_orders::REVENUE).fill_null(lit(0.0)),
        ])
        .collect()?;

    Ok(df)
}

/// Distinct orders per product category, most ordered first.
///
/// Rows without a category are not counted. Ties keep the order in which the
/// categories first appear in `table`.
pub fn product_performance(table: &DataFrame) -> Result<DataFrame> {
    let df = table
        .clone()
        .lazy()
        .filter(col(order::PRODUCT_CATEGORY_NAME).is_not_null())
        .group_by_stable([col(order::PRODUCT_CATEGORY_NAME)])
        .agg([distinct_orders().alias(product_performance::PRODUCT_CATEGORY_ORDERED)])
        .sort(
            [product_performance::PRODUCT_CATEGORY_ORDERED],
            descending_stable(),
        )
        .collect()?;

    Ok(df)
}

/// Distinct orders and revenue per (seller, category), highest revenue first.
pub fn seller_performance(table: &DataFrame) -> Result<DataFrame> {
    let df = table
        .clone()
        .lazy()
        .filter(
            col(order::SELLER_ID)
                .is_not_null()
                .and(col(order::PRODUCT_CATEGORY_NAME).is_not_null()),
        )
        .group_by_stable([col(order::SELLER_ID), col(order::PRODUCT_CATEGORY_NAME)])
        .agg([
            distinct_orders().alias(seller_performance::SELLER_TOTAL_ORDER),
            col(order::PRICE)
                .sum()
                .alias(seller_performance::SELLER_REVENUE),
        ])
        .sort([seller_performance::SELLER_REVENUE], descending_stable())
        .collect()?;

    Ok(df)
}
