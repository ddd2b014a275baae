//! # recordkit-core
//!
//! Core types for recordkit. This crate has no recordkit dependencies and
//! provides the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings and the global configuration slot
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`singleton`] - Process-wide, lazily created per-type instances

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod singleton;

// Re-export the most commonly used types at the crate root.
pub use error::{RecordError, RecordResult, ValidationError};
pub use settings::{Settings, UnknownKeyPolicy, SETTINGS};
pub use singleton::{Singleton, SingletonCell, SingletonRegistry, SINGLETONS};
