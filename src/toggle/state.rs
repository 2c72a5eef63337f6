//! Toggle state: the dial value plus its recency countdown.

use std::sync::{Arc, Mutex, PoisonError};

use crate::observability::metrics;
use crate::store::DocumentStore;
use crate::toggle::countdown::CountdownScheduler;
use crate::toggle::error::DialError;
use crate::toggle::recency::{Recency, RecencyState};

/// Process-lifetime dial state, shared between request handlers.
///
/// The value itself is never cached: every read goes back to the document
/// so edits made to the file by hand show up on the next request.
#[derive(Debug)]
pub struct ToggleState {
    store: DocumentStore,
    recency: Arc<Recency>,
    countdown: CountdownScheduler,
    /// Serializes read-compare-write of the document across requests.
    write_lock: Mutex<()>,
}

impl ToggleState {
    pub fn new(store: DocumentStore) -> Self {
        let recency = Arc::new(Recency::new());
        Self {
            store,
            countdown: CountdownScheduler::new(recency.clone()),
            recency,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Read the dial value from the document.
    pub fn current_value(&self) -> Result<String, DialError> {
        let document = self.store.load().map_err(DialError::Integrity)?;
        Ok(document.value().to_string())
    }

    /// Persist `new_value` if it differs from the stored one.
    ///
    /// Returns whether the document changed. A change restarts the recency
    /// countdown; an unchanged value leaves both storage and countdown alone.
    /// Must be called from within a Tokio runtime.
    pub fn set_if_changed(&self, new_value: &str) -> Result<bool, DialError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let document = self.store.load().map_err(DialError::Integrity)?;
        if document.value() == new_value {
            tracing::debug!(value = %new_value, "Dial unchanged");
            return Ok(false);
        }

        let previous = document.value().to_string();
        self.store
            .save(&document.with_value(new_value))
            .map_err(DialError::Persist)?;

        self.countdown.restart();
        metrics::record_dial_change();
        tracing::info!(from = %previous, to = %new_value, "Dial changed");
        Ok(true)
    }

    /// Snapshot of the recency countdown.
    pub fn recency(&self) -> RecencyState {
        self.recency.snapshot()
    }
}
