pub mod domain;
pub mod error;
pub mod marker;
pub mod mention;

pub use domain::*;
pub use error::{CoreError, ExtractionError};
pub use marker::extract_between;
pub use mention::{
    clean_entries, entries_for, extract_numbers, CleanReport, ListingEntry, SkipReason,
    SkippedEntry,
};
