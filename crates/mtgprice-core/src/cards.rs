//! Card-list parsing for pasted deck lists.

use std::sync::LazyLock;

use regex::Regex;

/// Leading quantity token: `"4 Sol Ring"`, `"4x Sol Ring"`, `"12X Island"`.
/// A bare number only counts as a quantity up to two digits, so names such
/// as `"1996 World Champion"` pass through untouched.
static QUANTITY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,2}[xX]?|\d+[xX])\s+(\S.*)$").expect("valid regex")
});

/// Splits a newline-delimited blob into card names.
///
/// Lines are trimmed, blank lines dropped, and leading quantity tokens
/// stripped. Order is preserved and duplicates are kept.
#[must_use]
pub fn parse_card_list(blob: &str) -> Vec<String> {
    blob.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(strip_quantity)
        .map(str::to_string)
        .collect()
}

/// Removes a leading quantity token from a single trimmed card line.
///
/// A line that is only a number (e.g. `"1996"`) is returned unchanged.
#[must_use]
pub fn strip_quantity(line: &str) -> &str {
    QUANTITY_PREFIX
        .captures(line)
        .and_then(|c| c.get(1))
        .map_or(line, |m| m.as_str().trim_end())
}
