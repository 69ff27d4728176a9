//! Display formatting for summary and segment figures.
//!
//! Rounding is half away from zero at two decimals, so `0.125` renders as
//! `"0.13"` rather than following the binary tie of the float formatter.

/// Round to two decimal places.
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Format an amount as `"$X.XX"`.
pub fn currency(value: f64) -> String {
    format!("${:.2}", round2(value))
}

/// Format a percentage as `"NN.NN%"`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", round2(value))
}

/// Format an integer with comma thousands separators (`1234567` -> `"1,234,567"`).
pub fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a bucket bound with at most two decimals and no trailing zeros.
pub fn bound(value: f64) -> String {
    // Display for f64 already drops a trailing ".0"
    format!("{}", round2(value))
}

/// Parse a grouped count back into a number. Returns `None` on malformed input.
pub fn parse_grouped(text: &str) -> Option<u64> {
    text.replace(',', "").parse().ok()
}
