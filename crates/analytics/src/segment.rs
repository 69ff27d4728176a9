//! Fixed-width price segmentation.
//!
//! Bucket `k` covers prices in `(k * width, (k + 1) * width]`. The lower bound
//! is exclusive, so a price of exactly `0` lands in no bucket. Empty buckets
//! are dropped and the rest come back in ascending bucket order.

use ordered_float::OrderedFloat;
use research_core::config::SegmentConfig;
use research_core::format::{bound, currency, percent};
use research_core::{Error, PriceSegment, ProductRecord, Result, SummaryRecord};
use std::collections::BTreeMap;
use tracing::debug;

/// Share rendered when there is no total to divide by.
const NO_SHARE: &str = "0%";

/// Largest bucket index; bounds past 2^53 are no longer exact in `f64`.
const MAX_BUCKET_INDEX: f64 = 9_007_199_254_740_992.0;

/// Partition `records` into price buckets of `increment_width`.
///
/// Percentages are taken against the totals of `summary`; with no summary, or
/// a zero total, they render as `"0%"`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] unless `increment_width` is a finite
/// positive number, or when it is so small against the highest price that
/// bucket indices would exceed 2^53.
pub fn segment(
    records: &[ProductRecord],
    increment_width: f64,
    summary: Option<&SummaryRecord>,
) -> Result<Vec<PriceSegment>> {
    if !increment_width.is_finite() || increment_width <= 0.0 {
        return Err(Error::invalid_argument(format!(
            "increment width must be a positive number, got {}",
            increment_width
        )));
    }

    let max_price = records
        .iter()
        .filter(|r| r.price.is_finite())
        .map(|r| OrderedFloat(r.price))
        .max()
        .map_or(0.0, |p| p.0);

    if max_price / increment_width > MAX_BUCKET_INDEX {
        return Err(Error::invalid_argument(format!(
            "increment width {} is too small for prices up to {}",
            increment_width, max_price
        )));
    }

    let mut buckets: BTreeMap<u64, Vec<&ProductRecord>> = BTreeMap::new();
    for record in records {
        if let Some(index) = bucket_index(record.price, increment_width) {
            buckets.entry(index).or_default().push(record);
        }
    }

    let total_sales = summary.map(|s| s.totals.sales as f64);
    let total_revenue = summary.map(|s| s.totals.revenue);

    let segments: Vec<PriceSegment> = buckets
        .into_iter()
        .map(|(index, items)| build_segment(index, increment_width, items, total_sales, total_revenue))
        .collect();

    debug_assert!(segments.last().map_or(true, |s| s.lower_bound < max_price));

    debug!(
        records = records.len(),
        segments = segments.len(),
        increment_width,
        max_price,
        "computed price segments"
    );

    Ok(segments)
}

/// Segment using the configured increment width.
pub fn segment_with_config(
    records: &[ProductRecord],
    config: &SegmentConfig,
    summary: Option<&SummaryRecord>,
) -> Result<Vec<PriceSegment>> {
    segment(records, config.increment_width, summary)
}

/// Index of the bucket holding `price`, or `None` for non-positive prices
/// and prices whose index would pass [`MAX_BUCKET_INDEX`].
fn bucket_index(price: f64, width: f64) -> Option<u64> {
    if !(price > 0.0 && price.is_finite()) {
        return None;
    }
    let estimate = (price / width).ceil() - 1.0;
    if !(estimate <= MAX_BUCKET_INDEX) {
        return None;
    }

    // Start from the arithmetic estimate, then settle on the bucket whose
    // computed bounds actually contain the price.
    let mut index = estimate.max(0.0) as u64;
    while index > 0 && price <= index as f64 * width {
        index -= 1;
    }
    while price > (index + 1) as f64 * width {
        index = index.checked_add(1)?;
    }
    Some(index)
}

fn build_segment(
    index: u64,
    width: f64,
    items: Vec<&ProductRecord>,
    total_sales: Option<f64>,
    total_revenue: Option<f64>,
) -> PriceSegment {
    let lower_bound = index as f64 * width;
    let upper_bound = (index + 1) as f64 * width;

    let count = items.len();
    let price_sum: f64 = items.iter().map(|r| r.price).sum();
    let reviews = items.iter().fold(0u64, |acc, r| acc.saturating_add(r.reviews));
    let sales = items.iter().fold(0u64, |acc, r| acc.saturating_add(r.sales));
    let revenue: f64 = items.iter().map(|r| r.revenue).sum();

    PriceSegment {
        title: format!("${} - ${}", bound(lower_bound), bound(upper_bound)),
        lower_bound,
        upper_bound,
        items: items.into_iter().cloned().collect(),
        price: currency(price_sum / count as f64),
        reviews,
        sales,
        revenue: currency(revenue),
        percent_of_total_sales: share(sales as f64, total_sales),
        percent_of_total_revenue: share(revenue, total_revenue),
        product_count: count,
    }
}

/// Format `part` as a percentage of `total`.
fn share(part: f64, total: Option<f64>) -> String {
    match total {
        Some(total) if total > 0.0 => percent(part / total * 100.0),
        _ => NO_SHARE.to_string(),
    }
}
