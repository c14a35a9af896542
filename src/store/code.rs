/// Prefix used when a company has no configured code template.
pub const DEFAULT_PREFIX: &str = "P";

/// Width of the zero-padded numeric suffix. The "latest code" scan orders
/// codes lexicographically, which is only correct while every suffix has
/// this width; do not change one without the other.
pub const SUFFIX_WIDTH: usize = 5;

/// Extracts the trailing run of ASCII digits from a product code.
#[must_use]
pub fn trailing_number(code: &str) -> Option<u64> {
    let digits: String = code
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

#[must_use]
pub fn format_code(prefix: &str, number: u64) -> String {
    format!("{prefix}-{number:0width$}", width = SUFFIX_WIDTH)
}

/// Derives the next code in a company's sequence from the highest existing
/// code, or starts the sequence at 1.
#[must_use]
pub fn next_code(prefix: &str, last_code: Option<&str>) -> String {
    let next = last_code
        .and_then(trailing_number)
        .map_or(1, |n| n + 1);
    format_code(prefix, next)
}
