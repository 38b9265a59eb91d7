//! Infrastructure wiring: store, notifier, outbox and the services on top.

use std::sync::Arc;

use lockera_auth::Hs256Jwt;
use lockera_infra::{
    AccountService, AppConfig, AuthService, CredentialStore, InMemoryCredentialStore,
    JsonFileCredentialStore, LogNotifier, NotificationOutbox, Notifier, OutboxHandle,
    SendGridNotifier, StoreError, StoreKind,
};

pub type DynStore = Arc<dyn CredentialStore>;

/// Services shared by every handler.
pub struct AppServices {
    pub accounts: AccountService<DynStore>,
    pub auth: AuthService<DynStore>,
}

pub fn open_store(kind: &StoreKind) -> Result<DynStore, StoreError> {
    Ok(match kind {
        StoreKind::Memory => {
            tracing::warn!("using in-memory credential store; data is lost on restart");
            Arc::new(InMemoryCredentialStore::new())
        }
        StoreKind::File(path) => Arc::new(JsonFileCredentialStore::open(path.clone())?),
    })
}

fn notifier(config: &AppConfig) -> Arc<dyn Notifier> {
    match &config.sendgrid_api_key {
        Some(key) => Arc::new(SendGridNotifier::new(key.clone(), config.notify_mailbox.clone())),
        None => {
            tracing::warn!("SENDGRID_API_KEY not set; notifications will only be logged");
            Arc::new(LogNotifier)
        }
    }
}

/// Build services over `store`. Must run inside a tokio runtime (the
/// notification worker is spawned here).
pub fn build_services(config: &AppConfig, store: DynStore) -> (AppServices, OutboxHandle) {
    let (outbox, handle) = NotificationOutbox::spawn(notifier(config), config.notify_mailbox.clone());

    let services = AppServices {
        accounts: AccountService::new(store.clone(), outbox, config.subuser_domain.clone()),
        auth: AuthService::new(
            store,
            Hs256Jwt::new(config.jwt_secret.as_bytes()),
            config.admin_emails.iter().cloned(),
        ),
    };
    (services, handle)
}
