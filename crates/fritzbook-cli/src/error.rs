use anyhow::Error;
use fritzbook_config::ConfigError;
use fritzbook_core::{CoreError, ExtractionError};
use fritzbook_sync::error::SyncError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_NO_DATA: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("nothing to proceed: no usable numbers found")]
    NothingToProceed,
    #[error("uploading failed: the router rejected the phonebook")]
    UploadRejected,
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status(err))
}

pub fn exit_status(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NothingToProceed => EXIT_NO_DATA,
                CliError::UploadRejected => EXIT_FAILURE,
            };
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(sync_err) = cause.downcast_ref::<SyncError>() {
            return sync_exit_code(sync_err);
        }
        if let Some(_extraction_err) = cause.downcast_ref::<ExtractionError>() {
            return EXIT_NO_DATA;
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return EXIT_INVALID_INPUT;
        }
    }
    EXIT_FAILURE
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidCountryCode(_)
        | ConfigError::InvalidUrl { .. }
        | ConfigError::InvalidTimeout(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn sync_exit_code(err: &SyncError) -> u8 {
    match err {
        SyncError::Extraction(_) => EXIT_NO_DATA,
        SyncError::Unavailable(_) | SyncError::Core(_) => EXIT_INVALID_INPUT,
        SyncError::Io(_) | SyncError::Parse(_) => EXIT_FAILURE,
        #[cfg(feature = "http")]
        SyncError::Http(_) => EXIT_FAILURE,
        #[cfg(feature = "http")]
        SyncError::Url(_) => EXIT_INVALID_INPUT,
    }
}
