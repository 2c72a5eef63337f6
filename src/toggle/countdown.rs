//! Countdown scheduler.
//!
//! # Responsibilities
//! - Drive the recency countdown with one tick every 100 ms
//! - Supersede any running countdown on restart
//! - Stop itself once the countdown expires

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use crate::observability::metrics;
use crate::toggle::recency::{Recency, Tick, TICK};

/// Owns the background task that ticks a [`Recency`].
///
/// At most one task is live. Aborting the previous task on restart is
/// best effort; correctness comes from the generation check in
/// [`Recency::tick`].
#[derive(Debug)]
pub struct CountdownScheduler {
    recency: Arc<Recency>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CountdownScheduler {
    pub fn new(recency: Arc<Recency>) -> Self {
        Self {
            recency,
            task: Mutex::new(None),
        }
    }

    /// Start a fresh countdown, superseding any running one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn restart(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);

        let generation = self.recency.restart();
        if let Some(previous) = task.take() {
            if !previous.is_finished() {
                tracing::debug!(generation, "Superseding running countdown");
            }
            previous.abort();
        }

        tracing::info!(generation, "Countdown started");
        *task = Some(tokio::spawn(run_countdown(self.recency.clone(), generation)));
    }

    /// Whether a countdown task is still running.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}

impl Drop for CountdownScheduler {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = task.take() {
            task.abort();
        }
    }
}

async fn run_countdown(recency: Arc<Recency>, generation: u64) {
    // interval() would fire immediately; the first tick is one period out
    let mut ticker = time::interval_at(Instant::now() + TICK, TICK);

    loop {
        ticker.tick().await;
        match recency.tick(generation) {
            Tick::Counting(_) => {}
            Tick::Expired => {
                tracing::info!(generation, "Countdown expired");
                metrics::record_countdown_expired();
                break;
            }
            Tick::Stale => {
                tracing::debug!(generation, "Stale countdown stopped");
                break;
            }
        }
    }
}
