//! Configuration loading and representation.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use thiserror::Error;

use stockroom_auth::{Account, Credentials, Role};
use stockroom_observability::LogFormat;

pub const DEFAULT_CATALOG_FILE: &str = "inventory.csv";
pub const DEFAULT_LOG_FILE: &str = "transactions.csv";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "1234";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("{present} is set but {missing} is not")]
    Incomplete {
        present: &'static str,
        missing: &'static str,
    },
}

/// Runtime configuration for the stockroom service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockroomConfig {
    pub catalog_path: PathBuf,
    pub log_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub editor: Credentials,
    pub viewer: Option<Credentials>,
    /// Downgrade every session to viewer.
    pub read_only: bool,
    pub log_format: LogFormat,
    /// The editor account fell back to the built-in development pair.
    pub uses_default_credentials: bool,
}

impl StockroomConfig {
    /// Read configuration from `STOCKROOM_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = PathBuf::from(get("STOCKROOM_DATA_DIR").unwrap_or_else(|| ".".to_string()));
        let catalog_path = resolve(
            &data_dir,
            get("STOCKROOM_CATALOG_FILE").unwrap_or_else(|| DEFAULT_CATALOG_FILE.to_string()),
        );
        let log_path = resolve(
            &data_dir,
            get("STOCKROOM_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
        );

        let bind_raw = get("STOCKROOM_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "STOCKROOM_BIND",
            message: format!("{bind_raw}: {e}"),
        })?;

        let editor = pair(&get, "STOCKROOM_USERNAME", "STOCKROOM_PASSWORD")?;
        let uses_default_credentials = editor.is_none();
        let editor = editor.unwrap_or_else(|| Credentials::new(DEFAULT_USERNAME, DEFAULT_PASSWORD));

        let viewer = pair(&get, "STOCKROOM_VIEWER_USERNAME", "STOCKROOM_VIEWER_PASSWORD")?;

        let read_only = match get("STOCKROOM_READ_ONLY") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::Invalid {
                key: "STOCKROOM_READ_ONLY",
                message: format!("expected true or false, got '{raw}'"),
            })?,
            None => false,
        };

        let log_format = match get("STOCKROOM_LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|message| ConfigError::Invalid {
                key: "STOCKROOM_LOG_FORMAT",
                message,
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            catalog_path,
            log_path,
            bind_addr,
            editor,
            viewer,
            read_only,
            log_format,
            uses_default_credentials,
        })
    }

    /// Accounts a login may match, in precedence order.
    ///
    /// In read-only mode the editor account logs in as a viewer.
    pub fn accounts(&self) -> Vec<Account> {
        let editor_role = if self.read_only { Role::Viewer } else { Role::Editor };
        let mut accounts = vec![Account::new(self.editor.clone(), editor_role)];
        if let Some(viewer) = &self.viewer {
            accounts.push(Account::new(viewer.clone(), Role::Viewer));
        }
        accounts
    }
}

fn resolve(dir: &Path, file: String) -> PathBuf {
    let file = PathBuf::from(file);
    if file.is_absolute() { file } else { dir.join(file) }
}

fn pair<G>(get: &G, user_key: &'static str, pass_key: &'static str) -> Result<Option<Credentials>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match (get(user_key), get(pass_key)) {
        (Some(user), Some(pass)) => Ok(Some(Credentials::new(user, pass))),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::Incomplete {
            present: user_key,
            missing: pass_key,
        }),
        (None, Some(_)) => Err(ConfigError::Incomplete {
            present: pass_key,
            missing: user_key,
        }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
