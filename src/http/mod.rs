//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → handlers.rs (path match, method dispatch)
//!         GET/HEAD → ToggleState read → page.rs render
//!         POST     → ToggleState::set_if_changed → 303 to the dial route
//!         other    → 405
//!     → Send to client
//! ```

pub mod handlers;
pub mod page;
pub mod request;
pub mod server;

pub use page::{render_page, DialView, FIELD_NAME};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, DialServer};
