//! The filter → aggregate → present pipeline over one loaded order table.

use std::path::Path;

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::aggregation::Summaries;
use crate::currency::CurrencyFormat;
use crate::error::Result;
use crate::filter::{date_bounds, filter, DateRange};
use crate::metrics::{Metrics, SummaryRows};
use crate::source::{load_with, SourceOptions};
use crate::visualization::{render_page, PageConfig};

/// Everything the page shows for one date selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    /// Date span of the whole dataset; `None` when it has no rows.
    pub bounds: Option<DateRange>,
    /// The applied selection.
    pub range: Option<DateRange>,
    pub metrics: Metrics,
    pub total_revenue: String,
    pub average_seller_revenue: String,
    pub rows: SummaryRows,
}

/// Immutable order table plus presentation settings.
///
/// Every call recomputes from the table; nothing is cached between
/// selections.
#[derive(Debug, Clone)]
pub struct Dashboard {
    orders: DataFrame,
    bounds: Option<DateRange>,
    currency: CurrencyFormat,
    page: PageConfig,
}

impl Dashboard {
    pub fn new(orders: DataFrame) -> Result<Self> {
        let bounds = date_bounds(&orders)?;
        Ok(Self {
            orders,
            bounds,
            currency: CurrencyFormat::default(),
            page: PageConfig::default(),
        })
    }

    pub fn open(path: impl AsRef<Path>, options: &SourceOptions) -> Result<Self> {
        let dashboard = Self::new(load_with(path, options)?)?;
        match dashboard.bounds {
            Some(bounds) => tracing::info!(%bounds, "dataset date span"),
            None => tracing::warn!("order table is empty"),
        }
        Ok(dashboard)
    }

    pub fn with_currency(mut self, currency: CurrencyFormat) -> Self {
        self.currency = currency;
        self
    }

    pub fn with_page(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    pub fn orders(&self) -> &DataFrame {
        &self.orders
    }

    pub fn bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    /// Resolve a picker selection: missing ends default to the dataset
    /// bounds, and both ends are kept inside them.
    pub fn selection(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateRange> {
        let bounds = self.bounds?;
        let range = DateRange::new(start.unwrap_or(bounds.start), end.unwrap_or(bounds.end));
        Some(range.clamp_to(bounds))
    }

    /// Rows of the order table inside `range`.
    pub fn filtered(&self, range: DateRange) -> Result<DataFrame> {
        filter(&self.orders, range)
    }

    pub fn summarize(&self, range: DateRange) -> Result<Summaries> {
        Summaries::from_orders(&self.filtered(range)?)
    }

    /// Run the whole pipeline for `range`. `None` renders an empty view.
    pub fn view(&self, range: Option<DateRange>) -> Result<DashboardView> {
        let rows = match range {
            Some(range) => SummaryRows::from_summaries(&self.summarize(range)?)?,
            None => SummaryRows::default(),
        };
        let metrics = Metrics::compute(&rows.daily_orders, &rows.seller_performance);

        tracing::debug!(
            range = ?range,
            days = rows.daily_orders.len(),
            categories = rows.product_performance.len(),
            sellers = rows.seller_performance.len(),
            total_orders = metrics.total_orders,
            "computed dashboard view"
        );

        Ok(DashboardView {
            bounds: self.bounds,
            range,
            metrics,
            total_revenue: self.currency.format(metrics.total_revenue),
            average_seller_revenue: self.currency.format(metrics.average_seller_revenue),
            rows,
        })
    }

    /// Lay out an already computed view with this dashboard's page settings.
    pub fn render_view(&self, view: &DashboardView) -> String {
        render_page(view, &self.page)
    }

    pub fn render_html(&self, range: Option<DateRange>) -> Result<String> {
        Ok(self.render_view(&self.view(range)?))
    }
}
