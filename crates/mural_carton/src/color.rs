//! Legacy color normalization.
//!
//! Page descriptions written for native clients encode colors as `0xRRGGBB` or
//! `0xRRGGBBAA`. Browsers want `#rrggbb[aa]`.

use once_cell::sync::Lazy;
use regex::Regex;

static LEGACY_HEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0[xX]([0-9a-fA-F]{3,8})$").expect("valid regex"));

/// Whether the string uses the `0x` legacy color notation.
#[inline]
pub fn is_legacy_color(value: &str) -> bool {
    value.starts_with("0x") || value.starts_with("0X")
}

/// Normalize a legacy `0x` color into standard hex notation.
///
/// Non-legacy strings are returned unchanged. Malformed legacy strings keep their
/// digits but gain the `#` prefix so the output is still recognizable.
pub fn normalize_color(value: &str) -> String {
    let trimmed = value.trim();
    if !is_legacy_color(trimmed) {
        return value.to_string();
    }
    match LEGACY_HEX.captures(trimmed) {
        Some(caps) => format!("#{}", caps[1].to_ascii_lowercase()),
        None => format!("#{}", &trimmed[2..]),
    }
}
