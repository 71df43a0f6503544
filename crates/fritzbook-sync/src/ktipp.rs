//! The ktipp.ch warning list of nuisance callers.

use crate::error::Result;
use crate::source::{ListingSource, Mention};
use crate::transport::Transport;
use fritzbook_core::{extract_between, ExtractionError};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

pub const DEFAULT_URL: &str =
    "https://www.ktipp.ch/service/warnlisten/detail/?warnliste_id=7&ajax=ajax-search-form&page=";
pub const NAME_MAX_LENGTH: usize = 100;

const PAGER_MARKER: &str = "ajaxPagerWarnlisteLoadIndex(";
const DATE_MARKER: &str = "Letzte Aktualisierung:";

static TEASER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<section[^>]*class="teaser cf"[^>]*>(.*?)</section>"#)
        .expect("teaser pattern")
});
static STRONG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<strong[^>]*>(.*?)</strong>").expect("strong pattern"));
static PARAGRAPH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p(?:\s[^>]*)?>(.*?)</p>").expect("paragraph pattern"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<li(?:\s[^>]*)?>.*?(?:</li>|$)").expect("list item pattern")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Collects the number mention and company name of every teaser on a page.
pub fn parse_listing(html: &str) -> Vec<Mention> {
    let mut mentions = Vec::new();
    for teaser in TEASER.captures_iter(html) {
        let body = &teaser[1];
        let Some(strong) = STRONG.captures(body) else {
            continue;
        };
        let text = strong[1].split('<').next().unwrap_or_default().trim();
        let name = PARAGRAPH
            .captures(body)
            .map(|paragraph| clean_name(&paragraph[1]))
            .unwrap_or_default();
        mentions.push(Mention {
            text: text.to_string(),
            name,
        });
    }
    mentions
}

pub fn clean_name(raw: &str) -> String {
    let without_breaks = raw.replace(['\n', '\r'], "");
    let text = TAG.replace_all(&without_breaks, " ");
    let text = text.replace("&amp", "&").replace("  ", " ");
    let text = text.trim();
    let text = text.strip_prefix("Firma: ").unwrap_or(text);

    if text.chars().count() <= NAME_MAX_LENGTH {
        return text.to_string();
    }
    let mut short: String = text.chars().take(NAME_MAX_LENGTH - 3).collect();
    short.push_str("...");
    short
}

/// Index of the last page, read from the pager call in the final list item.
pub fn page_count(html: &str) -> std::result::Result<u32, ExtractionError> {
    let last_item = LIST_ITEM
        .find_iter(html)
        .last()
        .map(|item| item.as_str())
        .ok_or_else(|| ExtractionError::MissingMarker {
            marker: "<li".to_string(),
            context: "can't extract max pages".to_string(),
        })?;
    let value = extract_between(last_item, PAGER_MARKER, ")", "can't extract max pages")?;
    value
        .parse()
        .map_err(|_| ExtractionError::InvalidMarkerValue {
            marker: PAGER_MARKER.to_string(),
            value,
            context: "can't extract max pages".to_string(),
        })
}

pub fn source_date(html: &str) -> std::result::Result<String, ExtractionError> {
    extract_between(html, DATE_MARKER, "<", "can't extract creation date")
}

/// Fetches every page of the listing in order, starting with page 0.
pub fn harvest<S: ListingSource + ?Sized>(source: &S) -> Result<Vec<Mention>> {
    let first = source.fetch_page(0)?;
    let updated = source_date(&first)?;
    debug!(source = source.source_name(), %updated, "listing date");
    let last_page = page_count(&first)?;

    let mut mentions = parse_listing(&first);
    for page in 1..=last_page {
        let html = source.fetch_page(page)?;
        mentions.extend(parse_listing(&html));
    }
    info!(
        source = source.source_name(),
        pages = last_page + 1,
        mentions = mentions.len(),
        "listing harvested"
    );
    Ok(mentions)
}

/// The paged listing behind `url_prefix`; page `n` lives at `{url_prefix}{n}`.
#[derive(Debug, Clone)]
pub struct KtippSource<T> {
    url_prefix: String,
    transport: T,
}

impl<T: Transport> KtippSource<T> {
    pub fn new(url_prefix: impl Into<String>, transport: T) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            transport,
        }
    }
}

impl<T: Transport> ListingSource for KtippSource<T> {
    fn source_name(&self) -> &'static str {
        "ktipp"
    }

    fn fetch_page(&self, page: u32) -> Result<String> {
        info!(page, "fetch page");
        let body = self.transport.get(&format!("{}{}", self.url_prefix, page))?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
