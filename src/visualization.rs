/// Visualization module: inline-SVG charts and the dashboard page.
///
/// Produces self-contained HTML with no client-side rendering:
/// - a line chart of daily order counts
/// - horizontal bar charts for best/worst product categories
/// - vertical bar charts for the top sellers
///
/// Chart builders take the typed summary rows, pick the rows to show, and
/// decide bar colours. The `to_svg` methods only lay out what they are given.
use std::fmt::Write as FmtWrite;

use chrono::NaiveDate;

use crate::dashboard::DashboardView;
use crate::metrics::{DailyOrderRow, ProductRow, SellerRow};

pub const HIGHLIGHT: &str = "#90CAF9";
pub const NEUTRAL: &str = "#D3D3D3";

const TOP_N: usize = 5;
const SELLER_LABEL_CHARS: usize = 8;

// ── Config ──────────────────────────────────────────────────────────────────

/// Static page decoration.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub title: String,
    /// Decorative sidebar image URL
    pub header_image: String,
    pub caption: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Brazilian E-Commerce Dashboard by Olist".to_string(),
            header_image: "https://s3-us-west-2.amazonaws.com/cbi-image-service-prd/original/4b74afb1-5a08-411d-a791-5cee8af6be67.png".to_string(),
            caption: "Brazilian E-Commerce Public Dataset by Olist".to_string(),
        }
    }
}

// ── Chart models ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Shown on hover
    pub tooltip: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Category labels on the y axis. `mirrored` puts zero on the right.
    Horizontal { mirrored: bool },
    /// Category labels on the x axis, rotated.
    Vertical,
}

#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub value_label: String,
    pub category_label: Option<String>,
    pub orientation: Orientation,
    pub integer_values: bool,
    pub bars: Vec<Bar>,
}

#[derive(Debug, Clone)]
pub struct LineChart {
    pub points: Vec<(NaiveDate, f64)>,
    pub color: &'static str,
}

/// Value axis with evenly spaced ticks from zero.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Axis {
    max: f64,
    step: f64,
}

const AXIS_TICKS: usize = 4;

impl Axis {
    fn for_max(max: f64, integer: bool) -> Self {
        let raw = (max / AXIS_TICKS as f64).max(0.0);
        let mut step = nice_step(raw);
        if integer {
            step = step.max(1.0).ceil();
        }
        Self {
            max: step * AXIS_TICKS as f64,
            step,
        }
    }

    fn ticks(&self) -> impl Iterator<Item = f64> + '_ {
        (0..=AXIS_TICKS).map(move |k| self.step * k as f64)
    }

    fn fraction(&self, value: f64) -> f64 {
        if self.max <= 0.0 {
            0.0
        } else {
            (value / self.max).clamp(0.0, 1.0)
        }
    }
}

fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 2.5 {
        2.5
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

// ── Chart builders ──────────────────────────────────────────────────────────

/// Daily order count over time.
pub fn daily_orders_chart(rows: &[DailyOrderRow]) -> LineChart {
    LineChart {
        points: rows
            .iter()
            .map(|r| (r.date, r.order_count as f64))
            .collect(),
        color: HIGHLIGHT,
    }
}

fn ranked_colors(n: usize, highlight_first: bool) -> impl Iterator<Item = &'static str> {
    (0..n).map(move |i| {
        if highlight_first && i == 0 {
            HIGHLIGHT
        } else {
            NEUTRAL
        }
    })
}

/// Top categories by distinct orders, best first and highlighted.
///
/// `rows` must already be sorted by count descending.
pub fn best_products_chart(rows: &[ProductRow]) -> BarChart {
    let top = &rows[..rows.len().min(TOP_N)];
    BarChart {
        title: "Best Performing Product".to_string(),
        value_label: "Number of Sales".to_string(),
        category_label: None,
        orientation: Orientation::Horizontal { mirrored: false },
        integer_values: true,
        bars: top
            .iter()
            .zip(ranked_colors(top.len(), true))
            .map(|(r, color)| product_bar(r, color))
            .collect(),
    }
}

/// The lowest-selling categories, lowest first, on a mirrored axis.
pub fn worst_products_chart(rows: &[ProductRow]) -> BarChart {
    let mut ascending: Vec<&ProductRow> = rows.iter().collect();
    ascending.sort_by_key(|r| r.product_category_ordered);
    ascending.truncate(TOP_N);

    BarChart {
        title: "Worst Performing Product".to_string(),
        value_label: "Number of Sales".to_string(),
        category_label: None,
        orientation: Orientation::Horizontal { mirrored: true },
        integer_values: true,
        bars: ascending
            .into_iter()
            .map(|r| product_bar(r, NEUTRAL))
            .collect(),
    }
}

fn product_bar(row: &ProductRow, color: &'static str) -> Bar {
    Bar {
        label: row.product_category_name.clone(),
        value: row.product_category_ordered as f64,
        tooltip: format!(
            "{}: {} orders",
            row.product_category_name, row.product_category_ordered
        ),
        color,
    }
}

/// Top sellers by summed revenue.
pub fn sellers_by_revenue_chart(rows: &[SellerRow]) -> BarChart {
    let mut ranked: Vec<&SellerRow> = rows.iter().collect();
    ranked.sort_by(|a, b| b.seller_revenue.total_cmp(&a.seller_revenue));
    ranked.truncate(TOP_N);

    BarChart {
        title: "By Revenue".to_string(),
        value_label: "Revenue".to_string(),
        category_label: Some("seller_id".to_string()),
        orientation: Orientation::Vertical,
        integer_values: false,
        bars: ranked
            .into_iter()
            .map(|r| seller_bar(r, r.seller_revenue))
            .collect(),
    }
}

/// Top sellers by distinct orders.
pub fn sellers_by_orders_chart(rows: &[SellerRow]) -> BarChart {
    let mut ranked: Vec<&SellerRow> = rows.iter().collect();
    ranked.sort_by(|a, b| b.seller_total_order.cmp(&a.seller_total_order));
    ranked.truncate(TOP_N);

    BarChart {
        title: "By Frequency".to_string(),
        value_label: "Orders".to_string(),
        category_label: Some("seller_id".to_string()),
        orientation: Orientation::Vertical,
        integer_values: true,
        bars: ranked
            .into_iter()
            .map(|r| seller_bar(r, r.seller_total_order as f64))
            .collect(),
    }
}

fn seller_bar(row: &SellerRow, value: f64) -> Bar {
    Bar {
        label: short_id(&row.seller_id),
        value,
        tooltip: format!(
            "{} ({}): {} orders, revenue {:.2}",
            row.seller_id, row.product_category_name, row.seller_total_order, row.seller_revenue
        ),
        color: NEUTRAL,
    }
}

fn short_id(id: &str) -> String {
    if id.chars().count() > SELLER_LABEL_CHARS {
        let head: String = id.chars().take(SELLER_LABEL_CHARS).collect();
        format!("{head}…")
    } else {
        id.to_string()
    }
}

// ── SVG rendering ───────────────────────────────────────────────────────────

const EMPTY_CHART: &str = r#"<div class="empty-chart">No data in the selected range</div>"#;

impl BarChart {
    pub fn to_svg(&self) -> String {
        if self.bars.is_empty() {
            return format!(
                r#"<figure class="chart"><figcaption>{}</figcaption>{}</figure>"#,
                escape_html(&self.title),
                EMPTY_CHART
            );
        }
        let max = self.bars.iter().map(|b| b.value).fold(0.0, f64::max);
        let axis = Axis::for_max(max, self.integer_values);
        let svg = match self.orientation {
            Orientation::Horizontal { mirrored } => self.horizontal_svg(&axis, mirrored),
            Orientation::Vertical => self.vertical_svg(&axis),
        };
        format!(
            r#"<figure class="chart"><figcaption>{}</figcaption>{}</figure>"#,
            escape_html(&self.title),
            svg
        )
    }

    fn horizontal_svg(&self, axis: &Axis, mirrored: bool) -> String {
        const WIDTH: f64 = 560.0;
        const LABEL_W: f64 = 180.0;
        const EDGE: f64 = 30.0;
        const TOP: f64 = 10.0;
        const BAND: f64 = 36.0;
        const BAR_H: f64 = 24.0;
        const BOTTOM: f64 = 50.0;

        let plot_w = WIDTH - LABEL_W - EDGE;
        let plot_h = BAND * self.bars.len() as f64;
        let height = TOP + plot_h + BOTTOM;
        let (plot_x, label_x, label_anchor) = if mirrored {
            (EDGE, EDGE + plot_w + 8.0, "start")
        } else {
            (LABEL_W, LABEL_W - 8.0, "end")
        };
        // value -> x on the plot, zero at the left (or right when mirrored)
        let x_of = |v: f64| {
            let offset = axis.fraction(v) * plot_w;
            if mirrored {
                plot_x + plot_w - offset
            } else {
                plot_x + offset
            }
        };

        let mut s = String::new();
        write!(
            s,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {height}" class="bar-chart">"#
        )
        .unwrap();

        for tick in axis.ticks() {
            let x = x_of(tick);
            write!(
                s,
                r#"<line class="grid" x1="{x:.1}" y1="{TOP}" x2="{x:.1}" y2="{y2:.1}"/><text class="tick" x="{x:.1}" y="{ty:.1}" text-anchor="middle">{label}</text>"#,
                y2 = TOP + plot_h,
                ty = TOP + plot_h + 16.0,
                label = format_tick(tick),
            )
            .unwrap();
        }

        for (i, bar) in self.bars.iter().enumerate() {
            let y = TOP + i as f64 * BAND + (BAND - BAR_H) / 2.0;
            let end = x_of(bar.value);
            let zero = x_of(0.0);
            let (x, w) = if end < zero { (end, zero - end) } else { (zero, end - zero) };
            write!(
                s,
                r#"<rect class="bar" x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{BAR_H}" fill="{color}"><title>{tooltip}</title></rect><text class="label" x="{label_x:.1}" y="{ly:.1}" text-anchor="{label_anchor}">{label}</text>"#,
                color = bar.color,
                tooltip = escape_html(&bar.tooltip),
                ly = y + BAR_H / 2.0 + 4.0,
                label = escape_html(&bar.label),
            )
            .unwrap();
        }

        write!(
            s,
            r#"<text class="axis-label" x="{x:.1}" y="{y:.1}" text-anchor="middle">{label}</text></svg>"#,
            x = plot_x + plot_w / 2.0,
            y = height - 8.0,
            label = escape_html(&self.value_label),
        )
        .unwrap();
        s
    }

    fn vertical_svg(&self, axis: &Axis) -> String {
        const WIDTH: f64 = 560.0;
        const HEIGHT: f64 = 360.0;
        const LEFT: f64 = 70.0;
        const RIGHT: f64 = 20.0;
        const TOP: f64 = 10.0;
        const BOTTOM: f64 = 100.0;

        let plot_w = WIDTH - LEFT - RIGHT;
        let plot_h = HEIGHT - TOP - BOTTOM;
        let band = plot_w / self.bars.len() as f64;
        let bar_w = band * 0.7;
        let y_of = |v: f64| TOP + plot_h - axis.fraction(v) * plot_h;

        let mut s = String::new();
        write!(
            s,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" class="bar-chart">"#
        )
        .unwrap();

        for tick in axis.ticks() {
            let y = y_of(tick);
            write!(
                s,
                r#"<line class="grid" x1="{LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}"/><text class="tick" x="{tx:.1}" y="{ty:.1}" text-anchor="end">{label}</text>"#,
                x2 = LEFT + plot_w,
                tx = LEFT - 6.0,
                ty = y + 4.0,
                label = format_tick(tick),
            )
            .unwrap();
        }

        for (i, bar) in self.bars.iter().enumerate() {
            let x = LEFT + i as f64 * band + (band - bar_w) / 2.0;
            let y = y_of(bar.value);
            let h = TOP + plot_h - y;
            let cx = x + bar_w / 2.0;
            let ly = TOP + plot_h + 14.0;
            write!(
                s,
                r#"<rect class="bar" x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{color}"><title>{tooltip}</title></rect><text class="label" x="{cx:.1}" y="{ly:.1}" text-anchor="end" transform="rotate(-45 {cx:.1} {ly:.1})">{label}</text>"#,
                color = bar.color,
                tooltip = escape_html(&bar.tooltip),
                label = escape_html(&bar.label),
            )
            .unwrap();
        }

        if let Some(category_label) = &self.category_label {
            write!(
                s,
                r#"<text class="axis-label" x="{x:.1}" y="{y:.1}" text-anchor="middle">{label}</text>"#,
                x = LEFT + plot_w / 2.0,
                y = HEIGHT - 8.0,
                label = escape_html(category_label),
            )
            .unwrap();
        }
        s.push_str("</svg>");
        s
    }
}

impl LineChart {
    pub fn to_svg(&self) -> String {
        const WIDTH: f64 = 960.0;
        const HEIGHT: f64 = 380.0;
        const LEFT: f64 = 60.0;
        const RIGHT: f64 = 20.0;
        const TOP: f64 = 20.0;
        const BOTTOM: f64 = 60.0;
        const MAX_DATE_LABELS: usize = 8;

        if self.points.is_empty() {
            return format!(r#"<figure class="chart wide">{EMPTY_CHART}</figure>"#);
        }

        let plot_w = WIDTH - LEFT - RIGHT;
        let plot_h = HEIGHT - TOP - BOTTOM;
        let max = self.points.iter().map(|p| p.1).fold(0.0, f64::max);
        let axis = Axis::for_max(max, true);
        let n = self.points.len();
        let x_of = |i: usize| {
            if n == 1 {
                LEFT + plot_w / 2.0
            } else {
                LEFT + plot_w * i as f64 / (n - 1) as f64
            }
        };
        let y_of = |v: f64| TOP + plot_h - axis.fraction(v) * plot_h;

        let mut s = String::new();
        write!(
            s,
            r#"<figure class="chart wide"><svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" class="line-chart">"#
        )
        .unwrap();

        for tick in axis.ticks() {
            let y = y_of(tick);
            write!(
                s,
                r#"<line class="grid" x1="{LEFT}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}"/><text class="tick" x="{tx:.1}" y="{ty:.1}" text-anchor="end">{label}</text>"#,
                x2 = LEFT + plot_w,
                tx = LEFT - 6.0,
                ty = y + 4.0,
                label = format_tick(tick),
            )
            .unwrap();
        }

        let label_every = n.div_ceil(MAX_DATE_LABELS).max(1);
        for (i, (date, _)) in self.points.iter().enumerate() {
            if i % label_every == 0 {
                write!(
                    s,
                    r#"<text class="tick" x="{x:.1}" y="{y:.1}" text-anchor="middle">{date}</text>"#,
                    x = x_of(i),
                    y = TOP + plot_h + 20.0,
                )
                .unwrap();
            }
        }

        let points: Vec<String> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| format!("{:.1},{:.1}", x_of(i), y_of(*v)))
            .collect();
        write!(
            s,
            r#"<polyline fill="none" stroke="{color}" stroke-width="2" points="{points}"/>"#,
            color = self.color,
            points = points.join(" "),
        )
        .unwrap();

        for (i, (date, value)) in self.points.iter().enumerate() {
            write!(
                s,
                r#"<circle class="marker" cx="{x:.1}" cy="{y:.1}" r="3" fill="{color}"><title>{date}: {value}</title></circle>"#,
                x = x_of(i),
                y = y_of(*value),
                color = self.color,
            )
            .unwrap();
        }

        s.push_str("</svg></figure>");
        s
    }
}

fn format_tick(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ── HTML page ───────────────────────────────────────────────────────────────

const PAGE_CSS: &str = r#"
body { margin: 0; font-family: "Source Sans Pro", system-ui, sans-serif; color: #31333f; display: flex; }
aside { width: 260px; min-height: 100vh; background: #f0f2f6; padding: 24px; box-sizing: border-box; }
aside img { width: 100%; margin-bottom: 16px; }
aside label { display: block; font-size: 14px; margin: 8px 0 4px; }
aside input { width: 100%; padding: 6px; box-sizing: border-box; }
aside button { margin-top: 12px; padding: 6px 12px; cursor: pointer; }
main { flex: 1; padding: 24px 48px; max-width: 1200px; }
.metrics { display: flex; gap: 48px; margin: 12px 0 20px; }
.metric .name { font-size: 14px; color: #555; }
.metric .value { font-size: 32px; }
.row { display: flex; gap: 24px; }
.chart { flex: 1; margin: 0; }
.chart figcaption { text-align: center; font-size: 20px; font-weight: 600; margin-bottom: 8px; }
.chart svg { width: 100%; height: auto; }
.grid { stroke: #e6e6e6; stroke-width: 1; }
.tick { font-size: 11px; fill: #666; }
.label { font-size: 13px; fill: #31333f; }
.axis-label { font-size: 13px; fill: #31333f; }
.empty-chart { padding: 48px; text-align: center; color: #888; border: 1px dashed #ccc; }
.caption { font-size: 13px; color: #888; margin-top: 32px; }
"#;

fn metric_html(name: &str, value: &str) -> String {
    format!(
        r#"<div class="metric"><div class="name">{}</div><div class="value">{}</div></div>"#,
        escape_html(name),
        escape_html(value)
    )
}

fn sidebar_html(view: &DashboardView, config: &PageConfig) -> String {
    let mut s = String::new();
    write!(
        s,
        r#"<aside><img src="{}" alt="">"#,
        escape_html(&config.header_image)
    )
    .unwrap();

    match (view.bounds, view.range) {
        (Some(bounds), Some(range)) => {
            write!(
                s,
                r#"<form method="get" action="/"><label for="start">Start date</label><input type="date" id="start" name="start" min="{min}" max="{max}" value="{start}" onchange="this.form.submit()"><label for="end">End date</label><input type="date" id="end" name="end" min="{min}" max="{max}" value="{end}" onchange="this.form.submit()"><button type="submit">Apply</button></form>"#,
                min = bounds.start,
                max = bounds.end,
                start = range.start,
                end = range.end,
            )
            .unwrap();
        }
        _ => s.push_str("<p>No orders loaded.</p>"),
    }
    s.push_str("</aside>");
    s
}

/// Render the full dashboard page for one selection.
pub fn render_page(view: &DashboardView, config: &PageConfig) -> String {
    let rows = &view.rows;
    let daily = daily_orders_chart(&rows.daily_orders);
    let best = best_products_chart(&rows.product_performance);
    let worst = worst_products_chart(&rows.product_performance);
    let by_revenue = sellers_by_revenue_chart(&rows.seller_performance);
    let by_orders = sellers_by_orders_chart(&rows.seller_performance);

    let title = escape_html(&config.title);
    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
{sidebar}
<main>
<h1>{title}</h1>
<h2>Daily Orders</h2>
<div class="metrics">{total_orders}{total_revenue}</div>
{daily}
<h2>Best &amp; Worst Performing Product</h2>
<div class="row">{best}{worst}</div>
<h2>Best Performing Seller</h2>
<div class="metrics">{avg_revenue}{avg_orders}</div>
<div class="row">{by_revenue}{by_orders}</div>
<p class="caption">{caption}</p>
</main>
</body>
</html>
"##,
        css = PAGE_CSS,
        sidebar = sidebar_html(view, config),
        total_orders = metric_html("Total orders", &view.metrics.total_orders.to_string()),
        total_revenue = metric_html("Total Revenue", &view.total_revenue),
        daily = daily.to_svg(),
        best = best.to_svg(),
        worst = worst.to_svg(),
        avg_revenue = metric_html("Average Revenue", &view.average_seller_revenue),
        avg_orders = metric_html(
            "Average order",
            &view.metrics.average_seller_order_count.to_string()
        ),
        by_revenue = by_revenue.to_svg(),
        by_orders = by_orders.to_svg(),
        caption = escape_html(&config.caption),
    )
}

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, ordered: i64) -> ProductRow {
        ProductRow {
            product_category_name: name.to_string(),
            product_category_ordered: ordered,
        }
    }

    fn seller(id: &str, orders: i64, revenue: f64) -> SellerRow {
        SellerRow {
            seller_id: id.to_string(),
            product_category_name: "toys".to_string(),
            seller_total_order: orders,
            seller_revenue: revenue,
        }
    }

    fn ranked_products() -> Vec<ProductRow> {
        vec![
            product("bed_bath", 90),
            product("health", 80),
            product("sports", 70),
            product("furniture", 60),
            product("computers", 50),
            product("toys", 40),
            product("garden", 3),
            product("music", 1),
        ]
    }

    #[test]
    fn best_products_highlight_only_the_leader() {
        let chart = best_products_chart(&ranked_products());
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["bed_bath", "health", "sports", "furniture", "computers"]
        );
        assert_eq!(chart.bars[0].color, HIGHLIGHT);
        assert!(chart.bars[1..].iter().all(|b| b.color == NEUTRAL));
    }

    #[test]
    fn worst_products_are_lowest_ascending_and_neutral() {
        let chart = worst_products_chart(&ranked_products());
        let values: Vec<f64> = chart.bars.iter().map(|b| b.value).collect();
        assert_eq!(values, vec![1.0, 3.0, 40.0, 50.0, 60.0]);
        assert!(chart.bars.iter().all(|b| b.color == NEUTRAL));
        assert_eq!(chart.orientation, Orientation::Horizontal { mirrored: true });
    }

    #[test]
    fn worst_products_keep_encounter_order_on_ties() {
        let rows = vec![product("a", 5), product("b", 2), product("c", 2)];
        let chart = worst_products_chart(&rows);
        let labels: Vec<&str> = chart.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
    }

    #[test]
    fn seller_charts_rank_by_their_own_measure() {
        let rows = vec![
            seller("3442f8959a84dea7ee197c632cb2df15", 1, 500.0),
            seller("s2", 9, 100.0),
            seller("s3", 4, 300.0),
        ];
        let by_revenue = sellers_by_revenue_chart(&rows);
        let by_orders = sellers_by_orders_chart(&rows);

        assert_eq!(by_revenue.bars[0].label, "3442f895…");
        assert!(by_revenue.bars[0]
            .tooltip
            .starts_with("3442f8959a84dea7ee197c632cb2df15"));
        let order_labels: Vec<&str> = by_orders.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(order_labels, vec!["s2", "s3", "3442f895…"]);
        assert!(by_orders.bars.iter().all(|b| b.color == NEUTRAL));
    }

    #[test]
    fn svg_has_one_rect_per_bar() {
        let svg = best_products_chart(&ranked_products()).to_svg();
        assert_eq!(svg.matches(r#"<rect class="bar""#).count(), 5);
        assert!(svg.contains(HIGHLIGHT));
        assert!(svg.contains("Number of Sales"));
    }

    #[test]
    fn mirrored_bars_grow_from_the_right() {
        let chart = worst_products_chart(&[product("only", 4)]);
        let svg = chart.to_svg();
        // full-length bar on a 0..4 axis spans the plot starting at its left edge
        assert!(svg.contains(r#"x="30.0""#));
        assert!(svg.contains(r#"text-anchor="start">only</text>"#));
    }

    #[test]
    fn empty_charts_render_placeholder() {
        assert!(best_products_chart(&[]).to_svg().contains("No data in the selected range"));
        assert!(daily_orders_chart(&[]).to_svg().contains("No data in the selected range"));
    }

    #[test]
    fn line_chart_marks_every_day() {
        let rows: Vec<DailyOrderRow> = (1..=3)
            .map(|d| DailyOrderRow {
                date: NaiveDate::from_ymd_opt(2018, 1, d).unwrap(),
                order_count: d as i64,
                revenue: 0.0,
            })
            .collect();
        let svg = daily_orders_chart(&rows).to_svg();
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains("2018-01-01"));
        assert!(svg.contains(r##"stroke="#90CAF9""##));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = best_products_chart(&[product("<script>", 1)]).to_svg();
        assert!(svg.contains("&lt;script&gt;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn axis_uses_round_steps() {
        assert_eq!(Axis::for_max(90.0, true), Axis { max: 100.0, step: 25.0 });
        assert_eq!(Axis::for_max(3.0, true), Axis { max: 4.0, step: 1.0 });
        assert_eq!(Axis::for_max(0.0, true), Axis { max: 4.0, step: 1.0 });
        let fractional = Axis::for_max(1.0, false);
        assert!((fractional.step - 0.25).abs() < 1e-9);
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(100.0), "100");
    }
}
