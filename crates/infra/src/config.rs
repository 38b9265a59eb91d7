//! Configuration loading from the process environment.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_DATA_PATH: &str = "./lockera.json";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Which credential store backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub store: StoreKind,
    /// SendGrid API key; `None` means notifications are only logged.
    pub sendgrid_api_key: Option<String>,
    /// Recipient (and sender) of operations notifications.
    pub notify_mailbox: String,
    /// Domain appended to derived subuser emails.
    pub subuser_domain: String,
    /// Emails that receive the `admin` role at login (lower-cased).
    pub admin_emails: Vec<String>,
    /// Serial codes inserted at startup when absent.
    pub seed_serials: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            store: StoreKind::File(PathBuf::from(DEFAULT_DATA_PATH)),
            sendgrid_api_key: None,
            notify_mailbox: "securebylockera@gmail.com".to_string(),
            subuser_domain: "lockera.com".to_string(),
            admin_emails: Vec::new(),
            seed_serials: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read configuration from environment variables, falling back to dev defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] over an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                reason: e.to_string(),
            })?,
            None => defaults.bind_addr.port(),
        };

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let store = match get("LOCKERA_STORE").as_deref() {
            None | Some("file") => StoreKind::File(
                get("LOCKERA_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            ),
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "LOCKERA_STORE",
                    reason: format!("expected 'file' or 'memory', got '{other}'"),
                });
            }
        };

        Ok(Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], port)),
            jwt_secret,
            store,
            sendgrid_api_key: get("SENDGRID_API_KEY"),
            notify_mailbox: get("LOCKERA_NOTIFY_MAILBOX").unwrap_or(defaults.notify_mailbox),
            subuser_domain: get("LOCKERA_SUBUSER_DOMAIN").unwrap_or(defaults.subuser_domain),
            admin_emails: split_list(get("LOCKERA_ADMIN_EMAILS"))
                .into_iter()
                .map(|e| e.to_lowercase())
                .collect(),
            seed_serials: split_list(get("LOCKERA_SEED_SERIALS")),
        })
    }
}

fn split_list(raw: Option<String>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
