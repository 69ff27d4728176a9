//! Core data types for the product-research engine.

use serde::{Deserialize, Serialize};

/// Asin reserved for the synthetic summary row.
pub const SUMMARY_ASIN: &str = "Summary";

/// A raw input row, keyed by CSV column header or API field name.
///
/// Values are heterogeneous and untyped at this boundary.
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// A single normalized product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecord {
    /// Amazon Standard Identification Number.
    pub asin: String,
    /// Product title.
    pub title: String,
    /// Brand name.
    pub brand: String,
    /// Unit price in currency units.
    pub price: f64,
    /// Number of reviews.
    pub reviews: u64,
    /// Average star rating (0-5).
    pub rating: f64,
    /// Units sold.
    pub sales: u64,
    /// Revenue in currency units.
    pub revenue: f64,
    /// Seller country or region.
    pub seller_country: String,
    /// Product category.
    pub category: String,
    /// ISO date (`YYYY-MM-DD`) or empty.
    pub date_first_available: String,
    /// Product image URL.
    pub image_url: String,
    /// Product page URL.
    pub amazon_url: String,
}

impl ProductRecord {
    /// Whether this row is a synthetic summary row rather than a product.
    #[inline]
    pub fn is_summary(&self) -> bool {
        self.asin == SUMMARY_ASIN
    }
}

/// Numeric totals behind a [`SummaryRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    /// Number of records summarized.
    pub count: usize,
    /// Sum of units sold.
    pub sales: u64,
    /// Sum of revenue.
    pub revenue: f64,
    /// Sum of prices (for the average).
    pub price: f64,
    /// Sum of review counts.
    pub reviews: u64,
    /// Sum of ratings (for the average).
    pub rating: f64,
}

/// Synthetic aggregate row over a working set.
///
/// Shares the product schema for table display, with the scalar fields
/// rendered as display strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    /// Always [`SUMMARY_ASIN`].
    pub asin: String,
    pub title: String,
    pub brand: String,
    /// Average price, e.g. `"$9.50"`.
    pub price: String,
    /// Rounded average review count, grouped.
    pub reviews: String,
    /// Average rating with one decimal.
    pub rating: String,
    /// Total units sold, grouped.
    pub sales: String,
    /// Total revenue, e.g. `"$260.00"`.
    pub revenue: String,
    pub seller_country: String,
    pub category: String,
    pub date_first_available: String,
    pub image_url: String,
    pub amazon_url: String,
    /// Always `"100%"`.
    pub percent_of_total_sales: String,
    /// Always `"100%"`.
    pub percent_of_total_revenue: String,
    /// Number of products summarized.
    pub product_count: usize,
    /// Unformatted totals.
    pub totals: SummaryTotals,
}

/// A contiguous price bucket `(lower_bound, upper_bound]` with aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSegment {
    /// Label such as `"$5 - $10"`.
    pub title: String,
    /// Exclusive lower bound.
    pub lower_bound: f64,
    /// Inclusive upper bound.
    pub upper_bound: f64,
    /// Products in this bucket, in input order.
    pub items: Vec<ProductRecord>,
    /// Average price of the items, e.g. `"$7.00"`.
    pub price: String,
    /// Sum of review counts.
    pub reviews: u64,
    /// Sum of units sold.
    pub sales: u64,
    /// Sum of revenue, e.g. `"$140.00"`.
    pub revenue: String,
    /// Share of the summary's total sales, e.g. `"66.67%"`.
    pub percent_of_total_sales: String,
    /// Share of the summary's total revenue.
    pub percent_of_total_revenue: String,
    /// Number of items.
    pub product_count: usize,
}

impl PriceSegment {
    /// Check whether a price falls in this bucket.
    #[inline]
    pub fn contains(&self, price: f64) -> bool {
        price > self.lower_bound && price <= self.upper_bound
    }
}

/// One row of the product table: a product or the trailing summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableRow {
    Product(ProductRecord),
    Summary(SummaryRecord),
}

impl TableRow {
    /// Asin of the row.
    pub fn asin(&self) -> &str {
        match self {
            TableRow::Product(p) => &p.asin,
            TableRow::Summary(s) => &s.asin,
        }
    }
}
