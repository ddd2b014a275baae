//! # recordkit
//!
//! Schema-validated records for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `recordkit` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use recordkit::prelude::*;
//! use std::sync::LazyLock;
//!
//! static POINT: LazyLock<ModelMeta> = LazyLock::new(|| {
//!     ModelMeta::new("point", vec![FieldDef::integer("x").max_value(10)])
//! });
//!
//! let mut p = Record::new(&POINT);
//! assert!(p.set("x", 11).is_err());
//! assert!(p.set("y", 1).is_err());
//! p.set("x", 10).unwrap();
//! assert_eq!(p.to_json().unwrap(), r#"{"x":10}"#);
//! ```

/// Errors, settings, logging, and the singleton registry.
pub use recordkit_core as core;

/// Field definitions, schemas, records, and JSON marshaling.
#[cfg(feature = "db")]
pub use recordkit_db as db;

/// Lifecycle signals for record types and instances.
#[cfg(feature = "signals")]
pub use recordkit_signals as signals;

/// The command-line tool's command framework and built-in commands.
#[cfg(feature = "cli")]
pub use recordkit_cli as cli;

// Re-export key third-party crates for convenience
pub use serde;
pub use serde_json;
pub use tracing;

/// Commonly used types, importable with `use recordkit::prelude::*`.
pub mod prelude {
    pub use recordkit_core::{
        RecordError, RecordResult, Settings, Singleton, UnknownKeyPolicy, SETTINGS,
    };

    #[cfg(feature = "db")]
    pub use recordkit_db::{FieldDef, FieldType, FromValue, Model, ModelMeta, Record, Value};

    #[cfg(feature = "signals")]
    pub use recordkit_signals::{connect_logging_receivers, SIGNALS};
}
