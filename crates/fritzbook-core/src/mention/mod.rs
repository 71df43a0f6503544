//! Turning scraped number mentions into phonebook-ready entries.

pub mod cleanup;
pub mod parser;

pub use cleanup::{clean_entries, CleanReport, SkipReason, SkippedEntry};
pub use parser::{entries_for, extract_numbers};

use serde::Serialize;

/// A dialable number paired with the name it was listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub number: String,
    pub name: String,
}

impl ListingEntry {
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}
