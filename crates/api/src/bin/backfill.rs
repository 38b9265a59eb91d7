//! One-off maintenance: link subusers without `createdBy` to the root
//! account that shares their serial.
//!
//! The service always records the creator, so orphans only appear in store
//! files that were edited by hand or assembled by an import script. The
//! file must already use the `{"users","serials"}` layout with UUID ids.

use anyhow::Context;

use lockera_api::app::services;
use lockera_infra::{AppConfig, CredentialStore};

fn main() -> anyhow::Result<()> {
    lockera_observability::init("lockera-backfill");

    let config = AppConfig::from_env().context("invalid configuration")?;
    let store = services::open_store(&config.store).context("failed to open credential store")?;

    let updated = store.backfill_creators().context("backfill failed")?;
    tracing::info!(updated, "creator backfill finished");
    println!("updated {updated} user(s)");
    Ok(())
}
