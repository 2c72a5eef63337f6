//! Startup checks.
//!
//! # Design Decisions
//! - Fail fast: the settings document is validated before the listener binds
//! - A bad document at startup is a configuration defect, never retried

use crate::config::DialerConfig;
use crate::store::{DocumentStore, StoreError};
use crate::toggle::ToggleState;

/// Open the settings document named by `config` and build the dial state.
pub fn open_state(config: &DialerConfig) -> Result<ToggleState, StoreError> {
    let store = DocumentStore::new(&config.path, &config.key);
    let document = store.load()?;

    tracing::info!(
        path = %store.path().display(),
        key = %store.key(),
        value = %document.value(),
        "Settings document loaded"
    );

    Ok(ToggleState::new(store))
}
