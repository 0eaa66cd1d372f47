//! Small text helpers shared by the cleaning rules.

/// Removes every occurrence of each pattern, in order.
///
/// # Examples
///
/// ```
/// use rdc_common::remove_all;
///
/// assert_eq!(remove_all("£3.00", &["£"]), "3.00");
/// assert_eq!(remove_all("??4971858637664481", &["?"]), "4971858637664481");
/// ```
pub fn remove_all(value: &str, patterns: &[&str]) -> String {
    let mut out = value.to_string();
    for pattern in patterns {
        if !pattern.is_empty() && out.contains(pattern) {
            out = out.replace(pattern, "");
        }
    }
    out
}

/// Keeps only ASCII digits.
///
/// # Examples
///
/// ```
/// use rdc_common::digits_only;
///
/// assert_eq!(digits_only("J78"), "78");
/// assert_eq!(digits_only("3n9"), "39");
/// ```
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Parses a trimmed float; `None` for empty or invalid input.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Parses a trimmed integer; `None` for empty or invalid input.
pub fn parse_i64(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}
