//! # recordkit-cli
//!
//! The `recordkit` command-line tool.
//!
//! This crate provides:
//!
//! - **Command framework** - [`ManagementCommand`] and [`CommandRegistry`]
//! - **Built-in commands** - `orm`, `record`, `singleton` and `classlog`
//! - **Bootstrap** - settings loading and the [`run`] entry point used by the binary
//!
//! ## Quick Start
//!
//! ```rust
//! use recordkit_cli::command::CommandRegistry;
//! use recordkit_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"orm"));
//! assert!(names.contains(&"singleton"));
//! ```

// These clippy lints are intentionally allowed:
// - result_large_err: RecordError is the crate-wide error type
// - doc_markdown: backtick requirements for documentation items are too strict
// - missing_const_for_fn: some functions may gain runtime logic later
#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_const_for_fn)]

pub mod bootstrap;
pub mod command;
pub mod commands;
pub mod models;

pub use bootstrap::{load_settings, run};
pub use command::{CommandRegistry, ManagementCommand};
