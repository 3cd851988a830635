//! End-to-end tests: CSV on disk through filter, aggregation and metrics.

use std::collections::HashSet;
use std::io::Write;

use chrono::NaiveDate;
use olist_dashboard::filter::parse_date;
use olist_dashboard::metrics::{Metrics, SummaryRows};
use olist_dashboard::schema::order;
use olist_dashboard::{filter, load, Dashboard, DateRange, Summaries};

const HEADER: &str =
    "order_id,customer_id,order_purchase_timestamp,price,product_category_name,seller_id\n";

fn write_csv(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(HEADER.as_bytes()).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

fn date(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

/// Unsorted on disk; a few multi-line orders; one day without sales.
fn sample_csv() -> tempfile::NamedTempFile {
    write_csv(
        "o7,c7,2017-03-04 18:00:00,12.5,toys,S2\n\
         o1,c1,2017-03-01 08:00:00,100,bed_bath,S1\n\
         o1,c1,2017-03-01 08:00:00,40,bed_bath,S1\n\
         o2,c2,2017-03-01 09:30:00,25,toys,S2\n\
         o3,c3,2017-03-02 10:00:00,60,health,S3\n\
         o4,c4,2017-03-02 23:59:59,15,toys,S2\n\
         o5,c5,2017-03-04 00:00:00,80,health,S1\n\
         o6,c6,2017-03-04 12:00:00,5,garden,S4\n",
    )
}

#[test]
fn toys_scenario_end_to_end() {
    let file = write_csv(
        "o4,c4,2018-01-03 08:15:00,5,toys,S1\n\
         o1,c1,2018-01-01 09:00:00,10,toys,S1\n\
         o2,c2,2018-01-01 12:30:00,20,toys,S1\n\
         o3,c3,2018-01-01 23:59:59,30,toys,S1\n",
    );
    let dashboard = Dashboard::open(file.path(), &Default::default()).unwrap();
    let full = dashboard.bounds().unwrap();
    assert_eq!(full, DateRange::new(date("2018-01-01"), date("2018-01-03")));

    let rows = SummaryRows::from_summaries(&dashboard.summarize(full).unwrap()).unwrap();
    let daily: Vec<(String, i64, f64)> = rows
        .daily_orders
        .iter()
        .map(|d| (d.date.to_string(), d.order_count, d.revenue))
        .collect();
    assert_eq!(
        daily,
        vec![
            ("2018-01-01".to_string(), 3, 60.0),
            ("2018-01-02".to_string(), 0, 0.0),
            ("2018-01-03".to_string(), 1, 5.0),
        ]
    );
    assert_eq!(rows.product_performance.len(), 1);
    assert_eq!(rows.product_performance[0].product_category_name, "toys");
    assert_eq!(rows.product_performance[0].product_category_ordered, 4);
    assert_eq!(rows.seller_performance.len(), 1);
    assert_eq!(rows.seller_performance[0].seller_id, "S1");
    assert_eq!(rows.seller_performance[0].seller_total_order, 4);
    assert_eq!(rows.seller_performance[0].seller_revenue, 65.0);

    let metrics = Metrics::compute(&rows.daily_orders, &rows.seller_performance);
    assert_eq!(metrics.total_orders, 4);
    assert_eq!(metrics.total_revenue, 65.0);
}

#[test]
fn daily_series_is_gap_free_and_counts_distinct_orders() {
    let file = sample_csv();
    let table = load(file.path()).unwrap();

    for (start, end) in [
        ("2017-03-01", "2017-03-04"),
        ("2017-03-02", "2017-03-04"),
        ("2017-03-01", "2017-03-02"),
        ("2017-03-04", "2017-03-04"),
    ] {
        let main = filter(&table, DateRange::new(date(start), date(end))).unwrap();
        let summaries = Summaries::from_orders(&main).unwrap();
        let rows = SummaryRows::from_summaries(&summaries).unwrap();

        let span = olist_dashboard::date_bounds(&main).unwrap().unwrap();
        assert_eq!(rows.daily_orders.len() as i64, span.days());
        assert!(rows
            .daily_orders
            .windows(2)
            .all(|w| w[1].date == w[0].date.succ_opt().unwrap()));

        let distinct: HashSet<String> = main
            .column(order::ORDER_ID)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect();
        let total: i64 = rows.daily_orders.iter().map(|d| d.order_count).sum();
        assert_eq!(total, distinct.len() as i64, "range {start}..{end}");
    }
}

#[test]
fn summaries_are_sorted_descending() {
    let file = sample_csv();
    let table = load(file.path()).unwrap();
    let rows = SummaryRows::from_summaries(&Summaries::from_orders(&table).unwrap()).unwrap();

    assert!(rows
        .product_performance
        .windows(2)
        .all(|w| w[0].product_category_ordered >= w[1].product_category_ordered));
    assert!(rows
        .seller_performance
        .windows(2)
        .all(|w| w[0].seller_revenue >= w[1].seller_revenue));

    let categories: Vec<&str> = rows
        .product_performance
        .iter()
        .map(|p| p.product_category_name.as_str())
        .collect();
    assert_eq!(categories, vec!["toys", "health", "bed_bath", "garden"]);
}

#[test]
fn filter_is_idempotent_and_deterministic() {
    let file = sample_csv();
    let table = load(file.path()).unwrap();
    let range = DateRange::new(date("2017-03-02"), date("2017-03-04"));

    let once = filter(&table, range).unwrap();
    let twice = filter(&once, range).unwrap();
    assert!(once.equals_missing(&twice));

    let a = Summaries::from_orders(&once).unwrap();
    let b = Summaries::from_orders(&filter(&table, range).unwrap()).unwrap();
    assert!(a.daily_orders.equals_missing(&b.daily_orders));
    assert!(a.product_performance.equals_missing(&b.product_performance));
    assert!(a.seller_performance.equals_missing(&b.seller_performance));
}

#[test]
fn empty_range_gives_empty_summaries_and_zero_metrics() {
    let file = sample_csv();
    let dashboard = Dashboard::open(file.path(), &Default::default()).unwrap();
    let view = dashboard
        .view(Some(DateRange::new(date("2017-03-03"), date("2017-03-03"))))
        .unwrap();

    assert!(view.rows.daily_orders.is_empty());
    assert!(view.rows.product_performance.is_empty());
    assert!(view.rows.seller_performance.is_empty());
    assert_eq!(view.metrics, Metrics::default());

    let html = dashboard
        .render_html(Some(DateRange::new(date("2017-03-03"), date("2017-03-03"))))
        .unwrap();
    assert!(html.contains("No data in the selected range"));
}

#[test]
fn bad_timestamp_aborts_load() {
    let file = write_csv(
        "o1,c1,2017-03-01 08:00:00,100,bed_bath,S1\n\
         o2,c2,2017/03/01,25,toys,S2\n",
    );
    assert!(load(file.path()).is_err());
    assert!(Dashboard::open(file.path(), &Default::default()).is_err());
}
