use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use fritzbook_core::DEFAULT_COUNTRY_CODE;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "fritzbook";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_HOSTNAME: &str = "https://fritz.box";
pub const DEFAULT_SOURCE_URL: &str =
    "https://www.ktipp.ch/service/warnlisten/detail/?warnliste_id=7&ajax=ajax-search-form&page=";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub country_code: String,
    pub router: RouterConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub hostname: String,
    pub phonebook_id: u32,
    pub sid: Option<String>,
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            router: RouterConfig {
                hostname: DEFAULT_HOSTNAME.to_string(),
                phonebook_id: 0,
                sid: None,
                accept_invalid_certs: true,
            },
            source: SourceConfig {
                url: DEFAULT_SOURCE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                user_agent: APP_DIR.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid country_code value: {0}")]
    InvalidCountryCode(String),
    #[error("invalid {field} value: {value}")]
    InvalidUrl { field: &'static str, value: String },
    #[error("invalid source.timeout_secs value: {0}")]
    InvalidTimeout(u64),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    country_code: Option<String>,
    router: Option<RouterFile>,
    source: Option<SourceFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouterFile {
    hostname: Option<String>,
    phonebook_id: Option<u32>,
    sid: Option<String>,
    accept_invalid_certs: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceFile {
    url: Option<String>,
    timeout_secs: Option<u64>,
    user_agent: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(country_code) = parsed.country_code {
        config.country_code = validate_country_code(&country_code)?;
    }

    if let Some(router) = parsed.router {
        if let Some(hostname) = router.hostname {
            config.router.hostname = validate_url("router.hostname", hostname)?;
        }
        if let Some(phonebook_id) = router.phonebook_id {
            config.router.phonebook_id = phonebook_id;
        }
        config.router.sid = router
            .sid
            .map(|sid| sid.trim().to_string())
            .filter(|sid| !sid.is_empty());
        if let Some(accept) = router.accept_invalid_certs {
            config.router.accept_invalid_certs = accept;
        }
    }

    if let Some(source) = parsed.source {
        if let Some(url) = source.url {
            config.source.url = validate_url("source.url", url)?;
        }
        if let Some(timeout_secs) = source.timeout_secs {
            if timeout_secs == 0 {
                return Err(ConfigError::InvalidTimeout(timeout_secs));
            }
            config.source.timeout_secs = timeout_secs;
        }
        if let Some(user_agent) = source.user_agent {
            config.source.user_agent = user_agent;
        }
    }

    Ok(config)
}

/// `+` followed by one to three digits.
pub fn validate_country_code(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let valid = trimmed.strip_prefix('+').is_some_and(|digits| {
        (1..=3).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
    });
    if !valid {
        return Err(ConfigError::InvalidCountryCode(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_url(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(trimmed.to_string());
    }
    Err(ConfigError::InvalidUrl { field, value })
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
