//! Field definitions.
//!
//! This module provides the [`FieldDef`] struct and [`FieldType`] enum that
//! describe one declared attribute of a record type: its default value, the
//! kind of value it holds, and the limits that value must respect.

pub mod types;

pub use types::{FieldDef, FieldType};
