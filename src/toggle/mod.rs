//! Toggle state subsystem.
//!
//! # Data Flow
//! ```text
//! GET/HEAD:
//!     ToggleState::current_value (document re-read)
//!     + ToggleState::recency (lock-protected snapshot)
//!
//! POST:
//!     ToggleState::set_if_changed
//!         → load document, compare
//!         → [changed] save document
//!         → [changed] CountdownScheduler::restart
//!                         → Recency::restart (new generation, 600 ticks)
//!                         → spawn tick task (100 ms), abort previous
//! ```
//!
//! # Design Decisions
//! - Recency is ephemeral and never persisted
//! - Ticks are validated against a generation token under the same lock
//!   that guards the count, so a superseded timer cannot touch the new one
//! - Concurrent POSTs are serialized around the document read-modify-write
//! - Document integrity failures are fatal; write failures are not

pub mod countdown;
pub mod error;
pub mod recency;
pub mod state;

pub use countdown::CountdownScheduler;
pub use error::DialError;
pub use recency::{Recency, RecencyState, Tick, COUNTDOWN_TICKS, TICK};
pub use state::ToggleState;
