//! Olist e-commerce dashboard.
//!
//! Loads the order line-item table, filters it to a date range, derives the
//! daily / product / seller summaries and renders them as an HTML page.
//!
//! # Features
//!
//! - `python`: PyO3 bindings exposing the pipeline as a Python module

pub mod aggregation;
pub mod currency;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod metrics;
#[cfg(feature = "python")]
mod python;
pub mod schema;
pub mod server;
pub mod source;
pub mod visualization;

pub use aggregation::{daily_orders, product_performance, seller_performance, Summaries};
pub use dashboard::{Dashboard, DashboardView};
pub use error::{DashboardError, Result};
pub use filter::{date_bounds, filter, DateRange};
pub use source::{load, load_with, SourceOptions};
