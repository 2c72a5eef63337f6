//! Dial service library.
//!
//! Serves a single named setting from a JSON document over HTTP, lets
//! clients flip it, and shows a 60 second "recently changed" countdown.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;
pub mod toggle;

pub use config::DialerConfig;
pub use http::DialServer;
pub use lifecycle::Shutdown;
pub use store::DocumentStore;
pub use toggle::ToggleState;
