/// Country code used when a source lists national numbers without one.
pub const DEFAULT_COUNTRY_CODE: &str = "+41";

/// Turns a raw number into the dial string the router stores.
///
/// Everything except digits, `+` and spaces is dropped, a leading `00` becomes
/// `+` and a single leading `0` is replaced by `country_code`.
pub fn normalize_number(raw: &str, country_code: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+' || *ch == ' ')
        .collect();
    to_international(stripped.trim(), country_code)
}

/// Rewrites the national prefix only; `number` is otherwise kept verbatim.
pub fn to_international(number: &str, country_code: &str) -> String {
    if let Some(rest) = number.strip_prefix("00") {
        format!("+{rest}")
    } else if let Some(rest) = number.strip_prefix('0') {
        format!("{country_code}{rest}")
    } else {
        number.to_string()
    }
}
