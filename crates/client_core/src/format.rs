//! vi-VN rendering of price estimates: whole numbers, `.` as the group separator.

use tracing::warn;

use crate::error::FormatError;

pub const PRICE_UNIT: &str = "triệu VNĐ/m²";
pub const PRICE_DISCLAIMER: &str = "* Giá dự đoán chỉ mang tính tham khảo";
/// Rendered in place of a price that cannot be formatted.
pub const PRICE_PLACEHOLDER: &str = "--";

/// Rounds half toward positive infinity, then groups digits in threes.
pub fn format_price(value: f64) -> Result<String, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NonFinite(value));
    }

    let rounded = round_half_up(value);
    let grouped = group_thousands(&format!("{:.0}", rounded.abs()));
    // -0.0 compares equal to zero and renders unsigned, unlike vi-VN
    // Intl.NumberFormat, which prints `-0` for values like -0.2.
    if rounded < 0.0 {
        Ok(format!("-{grouped}"))
    } else {
        Ok(grouped)
    }
}

/// Price with its unit, or the placeholder when the value is not finite.
pub fn display_price(value: f64) -> String {
    match format_price(value) {
        Ok(formatted) => format!("{formatted} {PRICE_UNIT}"),
        Err(err) => {
            warn!(%err, "substituting placeholder for unformattable price");
            PRICE_PLACEHOLDER.to_string()
        }
    }
}

fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
