//! CSS unit helpers.

use crate::general::{format_number, is_numeric_like};

/// Append `px` to bare numeric strings; anything else is returned unchanged.
pub fn with_px(value: &str) -> String {
    if is_numeric_like(value) {
        format!("{}px", value.trim())
    } else {
        value.to_string()
    }
}

/// Pixel string for a number, dropping a zero fractional part.
pub fn px(n: f64) -> String {
    format!("{}px", format_number(n))
}
