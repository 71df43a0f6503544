use anyhow::{Context as _, Result};
use fritzbook_config::AppConfig;
use fritzbook_core::{PhonebookCollection, SkippedEntry};
use fritzbook_sync::ktipp::KtippSource;
use fritzbook_sync::source::ListingSource;
use fritzbook_sync::transport::{HttpOptions, HttpTransport};
use serde::Serialize;
use std::io::{self, Write};
use std::time::Duration;

use crate::error::CliError;
use crate::pipeline::{self, Harvest};
use crate::util::now_utc;

pub mod export;
pub mod upload;

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub extracted: usize,
    pub kept: usize,
    pub skipped: &'a [SkippedEntry],
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'static str>,
}

impl<'a> RunReport<'a> {
    pub fn new(harvest: &'a Harvest, destination: String) -> Self {
        Self {
            extracted: harvest.extracted,
            kept: harvest.report.entries.len(),
            skipped: &harvest.report.skipped,
            destination,
            outcome: None,
        }
    }
}

/// The configured listing, fetched through its own unauthenticated transport.
pub fn listing_source(ctx: &Context<'_>) -> Result<KtippSource<HttpTransport>> {
    let source_config = &ctx.config.source;
    let options = HttpOptions {
        timeout: Duration::from_secs(source_config.timeout_secs),
        accept_invalid_certs: false,
        user_agent: source_config.user_agent.clone(),
    };
    let transport = HttpTransport::new(&source_config.url, None, &options)
        .with_context(|| "prepare listing source")?;
    Ok(KtippSource::new(source_config.url.as_str(), transport))
}

/// Harvests `source` and turns the usable entries into a single phonebook.
pub fn collect(
    ctx: &Context<'_>,
    source: &dyn ListingSource,
) -> Result<(Harvest, PhonebookCollection)> {
    let harvest = pipeline::harvest_entries(source)?;
    if harvest.report.entries.is_empty() {
        return Err(CliError::NothingToProceed.into());
    }
    let collection =
        pipeline::build_collection(&harvest.report.entries, now_utc(), &ctx.config.country_code)?;
    Ok((harvest, collection))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
