//! Infrastructure layer: credential storage, notifications, config and the
//! services that orchestrate them.

pub mod account_service;
pub mod auth_service;
pub mod config;
pub mod credential_store;
pub mod notify;

pub use account_service::{AccountError, AccountService};
pub use auth_service::{AuthError, AuthService, Session};
pub use config::{AppConfig, ConfigError, StoreKind};
pub use credential_store::{CredentialStore, InMemoryCredentialStore, JsonFileCredentialStore, StoreError};
pub use notify::{LogNotifier, Notification, NotificationOutbox, Notifier, NotifyError, OutboxHandle, Party, SendGridNotifier};
