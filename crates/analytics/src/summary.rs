//! Summary record computation.
//!
//! Totals and averages over a working set, rendered in the product-table
//! schema so the summary can sit as the last row of the table.

use research_core::format::{currency, grouped};
use research_core::{ProductRecord, SummaryRecord, SummaryTotals, SUMMARY_ASIN};
use tracing::debug;

/// Percentage shown for the summary row; it is the whole of itself.
const FULL_SHARE: &str = "100%";

/// Compute the summary over `records`.
///
/// No rows are filtered here. Callers strip earlier summary rows first, as
/// [`crate::WorkingSet`] does, to avoid double counting.
pub fn summarize(records: &[ProductRecord]) -> SummaryRecord {
    let mut totals = SummaryTotals {
        count: records.len(),
        ..Default::default()
    };

    for record in records {
        totals.sales = totals.sales.saturating_add(record.sales);
        totals.revenue += record.revenue;
        totals.price += record.price;
        totals.reviews = totals.reviews.saturating_add(record.reviews);
        totals.rating += record.rating;
    }

    let (avg_price, avg_reviews, avg_rating) = if totals.count > 0 {
        let n = totals.count as f64;
        (
            totals.price / n,
            (totals.reviews as f64 / n).round() as u64,
            totals.rating / n,
        )
    } else {
        (0.0, 0, 0.0)
    };

    debug!(
        count = totals.count,
        sales = totals.sales,
        revenue = totals.revenue,
        "computed summary"
    );

    SummaryRecord {
        asin: SUMMARY_ASIN.to_string(),
        title: SUMMARY_ASIN.to_string(),
        brand: String::new(),
        price: currency(avg_price),
        reviews: grouped(avg_reviews),
        rating: format!("{:.1}", (avg_rating * 10.0).round() / 10.0),
        sales: grouped(totals.sales),
        revenue: currency(totals.revenue),
        seller_country: String::new(),
        category: String::new(),
        date_first_available: String::new(),
        image_url: String::new(),
        amazon_url: String::new(),
        percent_of_total_sales: FULL_SHARE.to_string(),
        percent_of_total_revenue: FULL_SHARE.to_string(),
        product_count: totals.count,
        totals,
    }
}
