mod commands;
mod error;
mod pipeline;
mod util;

use anyhow::{Context as _, Result};
use clap::{ArgGroup, Parser};
use fritzbook_config as config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{export, upload, Context};
use crate::error::{exit_code_for, invalid_input, report_error};

#[derive(Debug, Parser)]
#[command(
    name = "fritzbook",
    version,
    about = "Import the ktipp.ch nuisance caller list into a FRITZ!Box phonebook"
)]
#[command(group(ArgGroup::new("target").required(true).args(["output", "upload"])))]
struct Cli {
    /// Write the phonebook XML to this file
    #[arg(long, short)]
    output: Option<PathBuf>,
    /// Upload the phonebook to the router
    #[arg(long, short)]
    upload: bool,
    /// Router base URL, e.g. https://fritz.box
    #[arg(long)]
    hostname: Option<String>,
    /// Session id of an authenticated router session
    #[arg(long)]
    sid: Option<String>,
    /// Not supported: log in elsewhere and pass the session id with --sid
    #[arg(long, hide = true)]
    password: Option<String>,
    /// Phonebook to replace on the router
    #[arg(long = "phonebookid")]
    phonebook_id: Option<u32>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    json: bool,
    #[arg(long, short)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.debug;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        output,
        upload: upload_requested,
        hostname,
        sid,
        password,
        phonebook_id,
        config: config_path,
        json,
        debug: verbose,
    } = cli;

    if password.is_some() {
        return Err(invalid_input(
            "router login is not supported, pass an existing session id with --sid",
        ));
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) => {
                if path.exists() {
                    debug!(path = %path.display(), "config resolved");
                } else {
                    debug!(path = %path.display(), "config missing, using defaults");
                }
            }
            Err(err) => {
                debug!(error = %err, "config unavailable");
            }
        }
    }

    let ctx = Context {
        json,
        config: &app_config,
    };

    match (output, upload_requested) {
        (Some(path), false) => export::export(&ctx, export::ExportArgs { path }),
        (None, true) => upload::upload(
            &ctx,
            upload::UploadArgs {
                hostname,
                sid,
                phonebook_id,
            },
        ),
        _ => Err(invalid_input("choose exactly one of --output or --upload")),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
