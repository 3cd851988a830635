/// Column-name constants for the order table and the derived summaries.
/// Single source of truth - exported to Python via PyO3 when enabled.

// ── Order line-item columns ─────────────────────────────────────────────────
pub mod order {
    pub const ORDER_ID: &str = "order_id";
    pub const ORDER_PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
    pub const PRICE: &str = "price";
    pub const PRODUCT_CATEGORY_NAME: &str = "product_category_name";
    pub const SELLER_ID: &str = "seller_id";

    pub const REQUIRED: [&str; 5] = [
        ORDER_ID,
        ORDER_PURCHASE_TIMESTAMP,
        PRICE,
        PRODUCT_CATEGORY_NAME,
        SELLER_ID,
    ];

    /// Format of `order_purchase_timestamp` in the Olist export.
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// ISO-8601 variants tried in order when no format is configured.
    pub const TIMESTAMP_FORMATS: [&str; 7] = [
        TIMESTAMP_FORMAT,
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d",
    ];
}

// ── Daily orders summary ────────────────────────────────────────────────────
pub mod daily_orders {
    /// Midnight of the calendar day.
    pub const DAY: &str = super::order::ORDER_PURCHASE_TIMESTAMP;
    pub const ORDER_COUNT: &str = "order_count";
    pub const REVENUE: &str = "revenue";
}

// ── Product performance summary ─────────────────────────────────────────────
pub mod product_performance {
    pub const PRODUCT_CATEGORY_NAME: &str = super::order::PRODUCT_CATEGORY_NAME;
    pub const PRODUCT_CATEGORY_ORDERED: &str = "product_category_ordered";
}

// ── Seller performance summary ──────────────────────────────────────────────
pub mod seller_performance {
    pub const SELLER_ID: &str = super::order::SELLER_ID;
    pub const PRODUCT_CATEGORY_NAME: &str = super::order::PRODUCT_CATEGORY_NAME;
    pub const SELLER_TOTAL_ORDER: &str = "seller_total_order";
    pub const SELLER_REVENUE: &str = "seller_revenue";
}

// ── Internal helper columns ─────────────────────────────────────────────────
pub(crate) mod internal {
    /// Days since the Unix epoch, used as the daily group key.
    pub const DAY_KEY: &str = "_day_key";
}
