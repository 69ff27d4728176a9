//! The record list a view works on, paired with its summary.
//!
//! Every change produces a new [`WorkingSet`]; the summary is always
//! recomputed from scratch over the new records.

use crate::segment::segment;
use crate::summary::summarize;
use research_core::{PriceSegment, ProductRecord, Result, SummaryRecord, TableRow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Products and the summary computed over them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingSet {
    /// Products, without any summary rows.
    pub records: Vec<ProductRecord>,
    /// Summary over `records`.
    pub summary: SummaryRecord,
}

impl WorkingSet {
    /// Build a working set, dropping any synthetic summary rows from the input.
    pub fn new(records: Vec<ProductRecord>) -> Self {
        let records: Vec<ProductRecord> = records.into_iter().filter(|r| !r.is_summary()).collect();
        let summary = summarize(&records);
        Self { records, summary }
    }

    /// A new working set without the product `asin`.
    pub fn remove(&self, asin: &str) -> Self {
        remove_and_resummarize(&self.records, asin)
    }

    /// Price segments over this set, with shares against its summary.
    pub fn segments(&self, increment_width: f64) -> Result<Vec<PriceSegment>> {
        segment(&self.records, increment_width, Some(&self.summary))
    }

    /// Table rows: every product followed by the summary row.
    pub fn rows_with_summary(&self) -> Vec<TableRow> {
        self.records
            .iter()
            .cloned()
            .map(TableRow::Product)
            .chain(std::iter::once(TableRow::Summary(self.summary.clone())))
            .collect()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if there are no products.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for WorkingSet {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Drop the product `asin_to_remove` and recompute the summary.
///
/// Removing an asin that is not present is a no-op. Summary rows in the input
/// are dropped as well so they never feed the new summary.
pub fn remove_and_resummarize(records: &[ProductRecord], asin_to_remove: &str) -> WorkingSet {
    let remaining: Vec<ProductRecord> = records
        .iter()
        .filter(|r| r.asin != asin_to_remove && !r.is_summary())
        .cloned()
        .collect();

    if remaining.len() == records.len() {
        debug!(asin = asin_to_remove, "asin not in working set, nothing removed");
    } else {
        debug!(
            asin = asin_to_remove,
            removed = records.len() - remaining.len(),
            "removed rows and recomputed summary"
        );
    }

    let summary = summarize(&remaining);
    WorkingSet {
        records: remaining,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::SUMMARY_ASIN;
    use research_ingestion::normalize;
    use serde_json::json;

    fn make_record(asin: &str, price: f64, sales: u64, revenue: f64, reviews: u64) -> ProductRecord {
        ProductRecord {
            asin: asin.to_string(),
            price,
            sales,
            revenue,
            reviews,
            ..Default::default()
        }
    }

    fn sample() -> Vec<ProductRecord> {
        vec![
            make_record("A", 12.0, 10, 120.0, 5),
            make_record("B", 7.0, 20, 140.0, 3),
            make_record("C", 31.0, 4, 124.0, 40),
        ]
    }

    #[test]
    fn test_remove() {
        let set = remove_and_resummarize(&sample(), "C");

        assert_eq!(set.len(), 2);
        assert_eq!(set.summary.sales, "30");
        assert_eq!(set.summary.revenue, "$260.00");
        assert_eq!(set.summary.price, "$9.50");
        assert_eq!(set.summary.reviews, "4");
    }

    #[test]
    fn test_remove_missing_asin_is_noop() {
        let records = sample();
        let set = remove_and_resummarize(&records, "ZZZ");

        assert_eq!(set.records, records);
        assert_eq!(set.summary, summarize(&records));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let once = remove_and_resummarize(&sample(), "B");
        let twice = remove_and_resummarize(&once.records, "B");
        assert_eq!(once, twice);

        let via_method = WorkingSet::new(sample()).remove("B").remove("B");
        assert_eq!(via_method, once);
    }

    #[test]
    fn test_remove_last_product() {
        let set = remove_and_resummarize(&[make_record("A", 12.0, 10, 120.0, 5)], "A");
        assert!(set.is_empty());
        assert_eq!(set.summary.price, "$0.00");
        assert_eq!(set.summary.sales, "0");
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = sample();
        let _ = remove_and_resummarize(&records, "A");
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_new_drops_summary_rows() {
        let mut records = sample();
        records.push(make_record(SUMMARY_ASIN, 999.0, 1000, 9990.0, 0));
        let set = WorkingSet::new(records);

        assert_eq!(set.len(), 3);
        assert_eq!(set.summary.totals.sales, 34);
    }

    #[test]
    fn test_rows_with_summary() {
        let set = WorkingSet::new(sample());
        let rows = set.rows_with_summary();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].asin(), "A");
        assert_eq!(rows[3].asin(), SUMMARY_ASIN);
        assert!(matches!(rows[3], TableRow::Summary(_)));
    }

    #[test]
    fn test_segments_use_own_summary() {
        let set = WorkingSet::new(sample()).remove("C");
        let segments = set.segments(5.0).unwrap();

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].percent_of_total_sales, "66.67%");
        assert!(set.segments(0.0).is_err());
    }

    #[test]
    fn test_default_is_empty() {
        let set = WorkingSet::default();
        assert!(set.is_empty());
        assert_eq!(set.summary.product_count, 0);
    }

    #[test]
    fn test_raw_rows_end_to_end() {
        let rows = vec![
            json!({"ASIN": "A", "Price  $": "12", "Sales": "10", "Revenue": "120", "Review Count": "5"}),
            json!({"ASIN": "B", "Price  $": "7", "Sales": "20", "Revenue": "140", "Review Count": "3"}),
            json!({"ASIN": "Z", "Price  $": "free", "Sales": "1,000", "Revenue": "0"}),
        ];
        let records: Vec<ProductRecord> = rows
            .iter()
            .map(|v| normalize(v.as_object().unwrap()))
            .collect();

        let set = WorkingSet::new(records).remove("Z");
        assert_eq!(set.summary.sales, "30");
        assert_eq!(set.summary.revenue, "$260.00");

        let segments = set.segments(5.0).unwrap();
        let titles: Vec<&str> = segments.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["$5 - $10", "$10 - $15"]);
    }

    #[test]
    fn test_oversized_sales_cell_does_not_fail_batch() {
        let rows = vec![
            json!({"ASIN": "HUGE", "Price  $": "9", "Sales": "99999999999999999999"}),
            json!({"ASIN": "SMALL", "Price  $": "4", "Sales": "5"}),
        ];
        let records: Vec<ProductRecord> = rows
            .iter()
            .map(|v| normalize(v.as_object().unwrap()))
            .collect();

        let set = WorkingSet::new(records);
        assert_eq!(set.len(), 2);
        assert_eq!(set.summary.totals.sales, u64::MAX);

        let segments = set.segments(5.0).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1].sales, u64::MAX);
    }

    #[test]
    fn test_summary_row_has_every_product_column() {
        let set = WorkingSet::new(sample());
        let rows = serde_json::to_value(set.rows_with_summary()).unwrap();
        let product = rows[0].as_object().unwrap();
        let summary = rows[3].as_object().unwrap();

        for key in product.keys() {
            assert!(summary.contains_key(key), "summary row lacks {}", key);
        }
        assert_eq!(summary["sellerCountry"], "");
        assert_eq!(summary["amazonUrl"], "");
    }

    #[test]
    fn test_serializes_camel_case() {
        let set = WorkingSet::new(sample());
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["summary"]["percentOfTotalSales"], "100%");
        assert_eq!(json["summary"]["productCount"], 3);
    }
}
