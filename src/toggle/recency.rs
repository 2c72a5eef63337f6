//! Recency state machine.
//!
//! # States
//! - Idle: `remaining_ticks == 0`, not recently changed
//! - Counting(n): `remaining_ticks == n > 0`, recently changed
//!
//! # State Transitions
//! ```text
//! Idle        --restart--> Counting(600)
//! Counting(n) --restart--> Counting(600)   (new generation)
//! Counting(n) --tick-----> Counting(n-1)   n > 1
//! Counting(1) --tick-----> Idle
//! ```
//!
//! Every restart bumps a generation counter. A tick carries the generation
//! it was issued for and is ignored if a newer restart has happened since,
//! so a superseded timer can never decrement or expire the current countdown.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

/// Length of one countdown tick.
pub const TICK: Duration = Duration::from_millis(100);

/// Ticks in a full countdown (60 seconds).
pub const COUNTDOWN_TICKS: u32 = 600;

const TICKS_PER_SECOND: u32 = 10;

/// Snapshot of the recency state handed to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecencyState {
    pub is_recent: bool,
    pub remaining_ticks: u32,
}

impl RecencyState {
    pub const IDLE: RecencyState = RecencyState {
        is_recent: false,
        remaining_ticks: 0,
    };

    fn from_ticks(remaining_ticks: u32) -> Self {
        Self {
            is_recent: remaining_ticks > 0,
            remaining_ticks,
        }
    }

    /// Remaining time in whole seconds, rounded half up.
    pub fn remaining_seconds(&self) -> u32 {
        rounded_div(self.remaining_ticks, TICKS_PER_SECOND)
    }
}

fn rounded_div(n: u32, m: u32) -> u32 {
    let quotient = n / m;
    if (n % m) * 2 >= m {
        quotient + 1
    } else {
        quotient
    }
}

/// Outcome of applying one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Decremented; this many ticks remain.
    Counting(u32),
    /// This tick brought the countdown to zero.
    Expired,
    /// The tick belongs to a superseded generation and was ignored.
    Stale,
}

#[derive(Debug, Default)]
struct Countdown {
    generation: u64,
    remaining: u32,
}

/// The shared, lock-protected recency state.
#[derive(Debug, Default)]
pub struct Recency {
    inner: Mutex<Countdown>,
}

impl Recency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; never blocks on the countdown task beyond the lock.
    pub fn snapshot(&self) -> RecencyState {
        RecencyState::from_ticks(self.lock().remaining)
    }

    /// Reset to a full countdown and return the new generation.
    pub fn restart(&self) -> u64 {
        let mut countdown = self.lock();
        countdown.generation += 1;
        countdown.remaining = COUNTDOWN_TICKS;
        countdown.generation
    }

    /// Apply one tick on behalf of `generation`.
    pub fn tick(&self, generation: u64) -> Tick {
        let mut countdown = self.lock();
        if countdown.generation != generation {
            return Tick::Stale;
        }

        countdown.remaining = countdown.remaining.saturating_sub(1);
        match countdown.remaining {
            0 => Tick::Expired,
            n => Tick::Counting(n),
        }
    }

    // The guarded data is two integers that are always consistent, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Countdown> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
