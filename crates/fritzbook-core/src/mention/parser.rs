use crate::error::ExtractionError;
use crate::mention::ListingEntry;
use once_cell::sync::Lazy;
use regex::Regex;

static CONNECTORS: Lazy<Regex> =
    Lazy::new(|| Regex::new("und|oder|sowie|auch|,|;").expect("connector pattern"));

const RANGE_TOKEN: &str = "bis";
const RANGE_SUFFIX_LEN: usize = 4;
const SLASH_SUFFIX_LEN: usize = 2;

/// Splits a free-text listing such as `021 558 73 91/92/93` or
/// `044 400 00 00 bis 044 400 00 19` into raw numbers, in listing order.
pub fn extract_numbers(mention: &str) -> Result<Vec<String>, ExtractionError> {
    let mut numbers = Vec::new();
    for segment in CONNECTORS.split(mention) {
        if segment.contains('/') {
            numbers.extend(expand_slashed(segment));
        } else if segment.contains(RANGE_TOKEN) {
            numbers.extend(expand_range(segment)?);
        } else {
            let number = dial_chars(segment);
            if !number.is_empty() {
                numbers.push(number);
            }
        }
    }
    Ok(numbers)
}

pub fn entries_for(mention: &str, name: &str) -> Result<Vec<ListingEntry>, ExtractionError> {
    Ok(extract_numbers(mention)?
        .into_iter()
        .map(|number| ListingEntry::new(number, name))
        .collect())
}

// Grouped suffixes replace the last two digits of the first number. This
// matches how Swiss listings write blocks of numbers; it is not a general rule.
fn expand_slashed(segment: &str) -> Vec<String> {
    let mut fields = segment.split('/');
    let base = dial_chars(fields.next().unwrap_or_default());
    if base.is_empty() {
        return Vec::new();
    }

    let stem = base[..base.len().saturating_sub(SLASH_SUFFIX_LEN)].to_string();
    let mut numbers = vec![base];
    for field in fields {
        let suffix = digits(field);
        if !suffix.is_empty() {
            numbers.push(format!("{stem}{suffix}"));
        }
    }
    numbers
}

fn expand_range(segment: &str) -> Result<Vec<String>, ExtractionError> {
    let mut bounds = segment.split(RANGE_TOKEN);
    let start = dial_chars(bounds.next().unwrap_or_default());
    let end = dial_chars(bounds.next().unwrap_or_default());
    if start.is_empty() || end.is_empty() {
        return Err(ExtractionError::MissingRangeBound {
            mention: segment.trim().to_string(),
        });
    }

    let (prefix, first) = split_suffix(&start);
    let (_, last) = split_suffix(&end);
    let invalid = || ExtractionError::InvalidRangeBound {
        mention: segment.trim().to_string(),
    };
    let first = parse_suffix(first).ok_or_else(invalid)?;
    let last = parse_suffix(last).ok_or_else(invalid)?;

    Ok((first..=last)
        .map(|value| format!("{prefix}{value:0width$}", width = RANGE_SUFFIX_LEN))
        .collect())
}

fn split_suffix(number: &str) -> (&str, &str) {
    number.split_at(number.len().saturating_sub(RANGE_SUFFIX_LEN))
}

fn parse_suffix(suffix: &str) -> Option<u32> {
    if !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

fn dial_chars(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '+')
        .collect()
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}
