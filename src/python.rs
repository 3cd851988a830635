//! Python bindings (feature `python`).
//!
//! Exposes the pipeline to notebooks: summaries come back as polars
//! DataFrames, the page as an HTML string for `IPython.display.HTML`.

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::aggregation;
use crate::currency::{format_currency, CurrencyFormat};
use crate::dashboard::Dashboard;
use crate::error::DashboardError;
use crate::schema;
use crate::source::SourceOptions;

#[pyclass(name = "Dashboard")]
pub struct PyDashboard {
    inner: Dashboard,
}

#[pymethods]
impl PyDashboard {
    /// Load the order CSV.
    ///
    /// Required columns: order_id, order_purchase_timestamp, price,
    /// product_category_name, seller_id.
    #[new]
    #[pyo3(signature = (path, timestamp_format=None, currency="BRL", locale="es_CO"))]
    fn new(
        path: &str,
        timestamp_format: Option<String>,
        currency: &str,
        locale: &str,
    ) -> PyResult<Self> {
        let options = SourceOptions { timestamp_format };
        let inner = Dashboard::open(path, &options)?
            .with_currency(CurrencyFormat::new(currency, locale));
        Ok(Self { inner })
    }

    // ── Properties ──────────────────────────────────────────────────────────

    #[getter]
    fn orders_df(&self) -> PyDataFrame {
        PyDataFrame(self.inner.orders().clone())
    }

    #[getter]
    fn min_date(&self) -> Option<NaiveDate> {
        self.inner.bounds().map(|b| b.start)
    }

    #[getter]
    fn max_date(&self) -> Option<NaiveDate> {
        self.inner.bounds().map(|b| b.end)
    }

    // ── Pipeline ────────────────────────────────────────────────────────────

    /// Orders inside `[start, end]`; missing ends default to the dataset bounds.
    #[pyo3(signature = (start=None, end=None))]
    fn filter(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PyResult<PyDataFrame> {
        Ok(PyDataFrame(self.selected(start, end)?))
    }

    #[pyo3(signature = (start=None, end=None))]
    fn daily_orders(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> PyResult<PyDataFrame> {
        let df = aggregation::daily_orders(&self.selected(start, end)?)?;
        Ok(PyDataFrame(df))
    }

    #[pyo3(signature = (start=None, end=None))]
    fn product_performance(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> PyResult<PyDataFrame> {
        let df = aggregation::product_performance(&self.selected(start, end)?)?;
        Ok(PyDataFrame(df))
    }

    #[pyo3(signature = (start=None, end=None))]
    fn seller_performance(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> PyResult<PyDataFrame> {
        let df = aggregation::seller_performance(&self.selected(start, end)?)?;
        Ok(PyDataFrame(df))
    }

    /// Metrics and summary rows as a JSON document.
    #[pyo3(signature = (start=None, end=None))]
    fn summary_json(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PyResult<String> {
        let view = self.inner.view(self.inner.selection(start, end))?;
        serde_json::to_string(&view)
            .map_err(|e| DashboardError::General(e.to_string()).into())
    }

    /// The full dashboard page.
    ///
    /// Use with `IPython.display.HTML(dashboard.render_html())` in Jupyter.
    #[pyo3(signature = (start=None, end=None))]
    fn render_html(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> PyResult<String> {
        Ok(self.inner.render_html(self.inner.selection(start, end))?)
    }
}

impl PyDashboard {
    fn selected(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DataFrame, DashboardError> {
        match self.inner.selection(start, end) {
            Some(range) => self.inner.filtered(range),
            None => Ok(self.inner.orders().clone()),
        }
    }
}

#[pyfunction]
#[pyo3(name = "format_currency", signature = (amount, currency="BRL", locale="es_CO"))]
fn py_format_currency(amount: f64, currency: &str, locale: &str) -> String {
    format_currency(amount, currency, locale)
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let order = PyModule::new(m.py(), "order")?;
    order.add("ORDER_ID", schema::order::ORDER_ID)?;
    order.add(
        "ORDER_PURCHASE_TIMESTAMP",
        schema::order::ORDER_PURCHASE_TIMESTAMP,
    )?;
    order.add("PRICE", schema::order::PRICE)?;
    order.add("PRODUCT_CATEGORY_NAME", schema::order::PRODUCT_CATEGORY_NAME)?;
    order.add("SELLER_ID", schema::order::SELLER_ID)?;
    m.add_submodule(&order)?;

    let daily = PyModule::new(m.py(), "daily_orders")?;
    daily.add("DAY", schema::daily_orders::DAY)?;
    daily.add("ORDER_COUNT", schema::daily_orders::ORDER_COUNT)?;
    daily.add("REVENUE", schema::daily_orders::REVENUE)?;
    m.add_submodule(&daily)?;

    let products = PyModule::new(m.py(), "product_performance")?;
    products.add(
        "PRODUCT_CATEGORY_NAME",
        schema::product_performance::PRODUCT_CATEGORY_NAME,
    )?;
    products.add(
        "PRODUCT_CATEGORY_ORDERED",
        schema::product_performance::PRODUCT_CATEGORY_ORDERED,
    )?;
    m.add_submodule(&products)?;

    let sellers = PyModule::new(m.py(), "seller_performance")?;
    sellers.add("SELLER_ID", schema::seller_performance::SELLER_ID)?;
    sellers.add(
        "PRODUCT_CATEGORY_NAME",
        schema::seller_performance::PRODUCT_CATEGORY_NAME,
    )?;
    sellers.add(
        "SELLER_TOTAL_ORDER",
        schema::seller_performance::SELLER_TOTAL_ORDER,
    )?;
    sellers.add("SELLER_REVENUE", schema::seller_performance::SELLER_REVENUE)?;
    m.add_submodule(&sellers)?;

    Ok(())
}

#[pymodule]
fn olist_dashboard(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDashboard>()?;
    m.add_function(wrap_pyfunction!(py_format_currency, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
