use anyhow::{Context as _, Result};
use fritzbook_core::{
    clean_entries, entries_for, Category, CleanReport, Contact, ListingEntry, NumberEntry,
    NumberType, Numbers, Person, Phonebook, PhonebookCollection, DEFAULT_COUNTRY_CODE,
};
use fritzbook_sync::ktipp;
use fritzbook_sync::source::ListingSource;
use tracing::debug;

#[derive(Debug)]
pub struct Harvest {
    pub extracted: usize,
    pub report: CleanReport,
}

/// Fetches the listing, expands every number mention and drops unusable entries.
pub fn harvest_entries<S: ListingSource + ?Sized>(source: &S) -> Result<Harvest> {
    let mentions = ktipp::harvest(source)
        .with_context(|| format!("harvest {} listing", source.source_name()))?;

    let mut entries = Vec::new();
    for mention in &mentions {
        let extracted = entries_for(&mention.text, &mention.name)
            .with_context(|| format!("extract numbers from '{}'", mention.text))?;
        entries.extend(extracted);
    }
    let extracted = entries.len();

    let report = clean_entries(entries, DEFAULT_COUNTRY_CODE);
    for skipped in &report.skipped {
        debug!(
            number = %skipped.entry.number,
            name = %skipped.entry.name,
            reason = %skipped.reason,
            "skip entry"
        );
    }
    debug!(
        extracted,
        kept = report.entries.len(),
        skipped = report.skipped.len(),
        "entries cleaned"
    );
    Ok(Harvest { extracted, report })
}

/// One contact per entry, listed under its work number.
pub fn build_collection(
    entries: &[ListingEntry],
    modified_at: i64,
    country_code: &str,
) -> Result<PhonebookCollection> {
    let mut book = Phonebook::new();
    for entry in entries {
        let name = if entry.name.trim().is_empty() {
            entry.number.as_str()
        } else {
            entry.name.as_str()
        };
        let person =
            Person::new(name).with_context(|| format!("contact for {}", entry.number))?;
        let mut numbers = Numbers::new();
        numbers.insert(NumberType::Work, NumberEntry::new(entry.number.as_str()));
        book.add_contact(
            Contact::new(Category::Normal, person, numbers).with_modified_at(modified_at),
        );
    }

    let mut books = PhonebookCollection::new();
    books.add_phonebook(book);
    books.normalize_numbers(country_code);
    books.select_main_numbers();
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::{build_collection, harvest_entries};
    use fritzbook_core::{ListingEntry, NumberType};
    use fritzbook_sync::error::{Result, SyncError};
    use fritzbook_sync::source::ListingSource;

    struct StaticListing(Vec<String>);

    impl ListingSource for StaticListing {
        fn source_name(&self) -> &'static str {
            "static"
        }

        fn fetch_page(&self, page: u32) -> Result<String> {
            self.0
                .get(page as usize)
                .cloned()
                .ok_or_else(|| SyncError::Unavailable(format!("page {page}")))
        }
    }

    fn page(teasers: &[(&str, &str)]) -> String {
        let mut html = String::from("<p>Letzte Aktualisierung: 01.02.2016</p>");
        for (number, name) in teasers {
            html.push_str(&format!(
                "<section class=\"teaser cf\"><strong>{number}</strong><p>{name}</p></section>"
            ));
        }
        html.push_str("<ul><li><a onclick=\"ajaxPagerWarnlisteLoadIndex(0)\">1</a></li></ul>");
        html
    }

    #[test]
    fn harvest_expands_and_cleans() {
        let source = StaticListing(vec![page(&[
            ("021 558 73 91/92", "Firma: Spam AG"),
            ("021 558 73 92", "Spam AG Kopie"),
            ("123", "Kurz"),
        ])]);
        let harvest = harvest_entries(&source).expect("harvest");
        assert_eq!(harvest.extracted, 4);
        assert_eq!(
            harvest.report.entries,
            vec![
                ListingEntry::new("+41215587391", "Spam AG"),
                ListingEntry::new("+41215587392", "Spam AG"),
            ]
        );
        assert_eq!(harvest.report.skipped.len(), 2);
    }

    #[test]
    fn harvest_fails_on_broken_range() {
        let source = StaticListing(vec![page(&[("044 400 00 00 bis", "Broken")])]);
        let err = harvest_entries(&source).unwrap_err();
        assert!(format!("{err:#}").contains("044 400 00 00 bis"));
    }

    #[test]
    fn collection_has_one_work_contact_per_entry() {
        let entries = vec![
            ListingEntry::new("+41215587391", "Spam AG"),
            ListingEntry::new("+41441234567", " "),
        ];
        let books = build_collection(&entries, 1_700_000_000, "+41").expect("build");
        assert_eq!(books.phonebooks.len(), 1);
        let contacts = &books.phonebooks[0].contacts;
        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[1].person.real_name(), "+41441234567");
        for contact in contacts {
            let work = contact.numbers.get(NumberType::Work).expect("work number");
            assert_eq!(work.priority(), 1);
            assert_eq!(contact.modified_at, Some(1_700_000_000));
        }
    }
}
