//! Raw row normalization.
//!
//! Turns a heterogeneous row (uploaded CSV export or keyword-search API
//! result) into a [`ProductRecord`]. Missing or malformed fields never fail a
//! row: numbers default to `0` and strings to `""`, so one bad row cannot
//! reject a whole batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use research_core::config::NormalizeConfig;
use research_core::format::round2;
use research_core::{ProductRecord, RawRow};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace};

// Aliases are matched against canonical keys (lowercase ASCII alphanumerics),
// so "Price  $" matches "price" and "Review Count" matches "reviewcount".
const ASIN: &[&str] = &["asin"];
const TITLE: &[&str] = &["title", "productdetails", "productname", "name"];
const BRAND: &[&str] = &["brand"];
const PRICE: &[&str] = &["price"];
const REVIEWS: &[&str] = &["reviews", "reviewcount", "reviewscount"];
const RATING: &[&str] = &["rating", "ratings", "stars"];
const SALES: &[&str] = &["sales", "monthlysales", "unitssold"];
const REVENUE: &[&str] = &["revenue", "monthlyrevenue"];
const SELLER_COUNTRY: &[&str] = &["sellercountryregion", "sellercountry", "country"];
const CATEGORY: &[&str] = &["category"];
const DATE_FIRST_AVAILABLE: &[&str] = &["datefirstavailable", "creationdate", "firstavailable"];
const IMAGE_URL: &[&str] = &["imageurl", "image", "imgurl"];
const AMAZON_URL: &[&str] = &["amazonurl", "url", "producturl", "link"];

/// Date layouts accepted for `dateFirstAvailable`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%b %d, %Y", "%d %b %Y"];

/// Maximum star rating.
const MAX_RATING: f64 = 5.0;

/// Converts raw rows into product records.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

impl Normalizer {
    /// Create a new normalizer.
    pub fn new(config: NormalizeConfig) -> Self {
        Self { config }
    }

    /// Normalize a single raw row. Never fails.
    pub fn normalize(&self, row: &RawRow) -> ProductRecord {
        let fields = FieldLookup::new(row);
        let asin = fields.text(ASIN);

        let price = fields.float(PRICE, &asin, "price");
        let sales = fields.integer(SALES, &asin, "sales");
        let revenue = match fields.get(REVENUE) {
            Some(_) => fields.float(REVENUE, &asin, "revenue"),
            None if self.config.derive_missing_revenue => round2(price * sales as f64),
            None => 0.0,
        };

        ProductRecord {
            title: fields.text(TITLE),
            brand: fields.text(BRAND),
            price,
            reviews: fields.integer(REVIEWS, &asin, "reviews"),
            rating: fields.float(RATING, &asin, "rating").min(MAX_RATING),
            sales,
            revenue,
            seller_country: fields.text(SELLER_COUNTRY),
            category: fields.text(CATEGORY),
            date_first_available: parse_date(&fields.text(DATE_FIRST_AVAILABLE)),
            image_url: fields.text(IMAGE_URL),
            amazon_url: fields.text(AMAZON_URL),
            asin,
        }
    }

    /// Normalize a batch of rows, preserving order.
    pub fn normalize_rows(&self, rows: &[RawRow]) -> Vec<ProductRecord> {
        let records: Vec<ProductRecord> = rows.iter().map(|row| self.normalize(row)).collect();
        debug!(rows = records.len(), "normalized raw rows");
        records
    }
}

/// Normalize a raw row with the default configuration.
pub fn normalize(row: &RawRow) -> ProductRecord {
    Normalizer::default().normalize(row)
}

/// Canonical form of a column or field name.
fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Row fields indexed by canonical key.
struct FieldLookup<'a> {
    fields: HashMap<String, &'a Value>,
}

impl<'a> FieldLookup<'a> {
    fn new(row: &'a RawRow) -> Self {
        let mut fields = HashMap::with_capacity(row.len());
        for (key, value) in row {
            fields.entry(canonical_key(key)).or_insert(value);
        }
        Self { fields }
    }

    /// First non-null value under any of the aliases.
    fn get(&self, aliases: &[&str]) -> Option<&'a Value> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias).copied())
            .find(|value| !value.is_null())
    }

    fn text(&self, aliases: &[&str]) -> String {
        match self.get(aliases) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    fn float(&self, aliases: &[&str], asin: &str, field: &'static str) -> f64 {
        let Some(value) = self.get(aliases) else {
            return 0.0;
        };
        match value_to_float(value) {
            Some(v) => v,
            None => {
                trace!(asin, field, raw = %value, "defaulted malformed numeric field to 0");
                0.0
            }
        }
    }

    fn integer(&self, aliases: &[&str], asin: &str, field: &'static str) -> u64 {
        let Some(value) = self.get(aliases) else {
            return 0;
        };
        match value_to_integer(value) {
            Some(v) => v,
            None => {
                trace!(asin, field, raw = %value, "defaulted malformed integer field to 0");
                0
            }
        }
    }
}

/// Interpret a value as a non-negative finite float.
fn value_to_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    }?;
    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

/// Interpret a value as a non-negative integer, truncating any fraction.
fn value_to_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                return Some(v);
            }
            let f = n.as_f64()?;
            (f.is_finite() && f >= 0.0).then_some(f.trunc() as u64)
        }
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Remove thousands separators, surrounding whitespace and a currency sign.
fn clean_numeric(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| *c != ',').collect();
    let trimmed = stripped.trim();
    trimmed.strip_prefix('$').unwrap_or(trimmed).trim_start().to_string()
}

/// Parse the longest leading decimal number, e.g. `"12.5 USD"` -> `12.5`.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let cleaned = clean_numeric(text);
    let bytes = cleaned.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    cleaned[..end].parse().ok()
}

/// Parse the leading integer, e.g. `"1,234 units"` -> `1234`, `"12.9"` -> `12`.
///
/// Negative values yield `None`; values past `u64::MAX` saturate.
fn parse_int_prefix(text: &str) -> Option<u64> {
    let cleaned = clean_numeric(text);
    let (negative, rest) = match cleaned.as_bytes().first() {
        Some(b'-') => (true, &cleaned[1..]),
        Some(b'+') => (false, &cleaned[1..]),
        _ => (false, cleaned.as_str()),
    };
    let digit_count = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 || negative {
        return None;
    }
    Some(rest[..digit_count].parse().unwrap_or(u64::MAX))
}

/// Normalize a date string to `YYYY-MM-DD`, or empty when unrecognized.
fn parse_date(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        });

    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => {
            trace!(raw = text, "unrecognized date, leaving empty");
            String::new()
        }
    }
}
