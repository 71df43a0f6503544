use crate::commands::{collect, listing_source, print_json, Context, RunReport};
use crate::error::{invalid_input, CliError};
use crate::util::is_http_url;
use anyhow::{Context as _, Result};
use fritzbook_sync::transport::{HttpOptions, HttpTransport};
use fritzbook_sync::upload::{self as router, UploadOutcome};

#[derive(Debug)]
pub struct UploadArgs {
    pub hostname: Option<String>,
    pub sid: Option<String>,
    pub phonebook_id: Option<u32>,
}

pub fn upload(ctx: &Context<'_>, args: UploadArgs) -> Result<()> {
    let router_config = &ctx.config.router;
    let sid = args
        .sid
        .or_else(|| router_config.sid.clone())
        .map(|sid| sid.trim().to_string())
        .filter(|sid| !sid.is_empty())
        .ok_or_else(|| invalid_input("--upload needs a session id (--sid or router.sid)"))?;
    let hostname = args
        .hostname
        .map(|hostname| hostname.trim().to_string())
        .unwrap_or_else(|| router_config.hostname.clone());
    if !is_http_url(&hostname) {
        return Err(invalid_input(format!(
            "hostname must start with http:// or https://: {hostname}"
        )));
    }
    let phonebook_id = args.phonebook_id.unwrap_or(router_config.phonebook_id);

    let options = HttpOptions {
        accept_invalid_certs: router_config.accept_invalid_certs,
        user_agent: ctx.config.source.user_agent.clone(),
        ..HttpOptions::default()
    };
    let transport = HttpTransport::new(&hostname, Some(sid), &options)
        .with_context(|| format!("connect to {hostname}"))?;

    let source = listing_source(ctx)?;
    let (harvest, collection) = collect(ctx, &source)?;
    let outcome = router::upload(&transport, &collection, phonebook_id)
        .with_context(|| format!("upload phonebook to {hostname}"))?;

    if ctx.json {
        let mut report = RunReport::new(&harvest, hostname.clone());
        report.outcome = Some(outcome.label());
        print_json(&report)?;
    }

    match outcome {
        UploadOutcome::Success => {
            if !ctx.json {
                println!(
                    "Uploaded {} contacts to phonebook {} on {}",
                    collection.contact_count(),
                    phonebook_id,
                    hostname
                );
            }
            Ok(())
        }
        UploadOutcome::Failure => Err(CliError::UploadRejected.into()),
        UploadOutcome::Unknown(_) => {
            if !ctx.json {
                println!("Upload to {hostname} finished, but the router's answer was not recognized");
            }
            Ok(())
        }
    }
}
