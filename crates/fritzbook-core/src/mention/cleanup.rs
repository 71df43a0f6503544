use crate::domain::phone::to_international;
use crate::mention::ListingEntry;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// Shorter numbers match too many callers to block safely.
pub const MIN_NUMBER_LEN: usize = 4;
/// E.164 allows 15 digits, plus the leading `+`.
pub const MAX_NUMBER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooShort,
    NotInternational,
    TooLong,
    Duplicate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TooShort => "too short",
            Self::NotInternational => "not in international format",
            Self::TooLong => "too long",
            Self::Duplicate => "duplicate",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub entry: ListingEntry,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub entries: Vec<ListingEntry>,
    pub skipped: Vec<SkippedEntry>,
}

/// Rewrites every number to international format and drops entries that are
/// unsafe to import. The first occurrence of a number wins.
pub fn clean_entries<I>(entries: I, country_code: &str) -> CleanReport
where
    I: IntoIterator<Item = ListingEntry>,
{
    let mut report = CleanReport::default();
    let mut seen = HashSet::new();

    for mut entry in entries {
        entry.number = to_international(&entry.number, country_code);

        let len = entry.number.chars().count();
        let reason = if len < MIN_NUMBER_LEN {
            Some(SkipReason::TooShort)
        } else if !entry.number.starts_with('+') {
            Some(SkipReason::NotInternational)
        } else if len > MAX_NUMBER_LEN {
            Some(SkipReason::TooLong)
        } else if !seen.insert(entry.number.clone()) {
            Some(SkipReason::Duplicate)
        } else {
            None
        };

        match reason {
            Some(reason) => report.skipped.push(SkippedEntry { entry, reason }),
            None => report.entries.push(entry),
        }
    }

    report
}
