//! Settings document storage.
//!
//! # Data Flow
//! ```text
//! dials.json
//!     → DocumentStore::load (read, parse, validate key)
//!     → SettingDocument (typed; dial key guaranteed to be a string)
//!     → with_value(new)
//!     → DocumentStore::save (tmp file + rename)
//! ```
//!
//! # Design Decisions
//! - The whole document is re-read on every access; nothing is cached
//! - Keys other than the dial are carried through untouched
//! - Concurrent writers are serialized one level up, in the toggle state

pub mod document;

pub use document::{get_required_string, DocumentStore, SettingDocument, StoreError};
