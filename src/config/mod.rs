//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --config <file> (JSON or TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DialerConfig (validated, immutable)
//!     → handed to the server and store at startup
//! ```
//!
//! # Design Decisions
//! - Config is loaded once; there is no hot reload
//! - Only `path`, `key`, `uri` and `port` are required
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{DialerConfig, LimitsConfig, ObservabilityConfig, TimeoutConfig};
pub use validation::ValidationError;
