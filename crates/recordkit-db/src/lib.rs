//! # recordkit-db
//!
//! The record layer of recordkit. A record type is declared once as a
//! [`ModelMeta`](model::ModelMeta): an ordered schema of
//! [`FieldDef`](fields::FieldDef)s, each with a default and a validation rule.
//! Instances are either plain structs implementing [`Model`](model::Model) or
//! dynamic [`Record`](record::Record)s; both send every write through the
//! schema, so an instance only ever holds declared fields with valid values.
//!
//! ## Module Overview
//!
//! - [`model`] - The schema ([`ModelMeta`](model::ModelMeta)) and the [`Model`](model::Model) trait
//! - [`record`] - Schema-driven dynamic instances
//! - [`fields`] - Field definitions and types
//! - [`validators`] - Field validators
//! - [`value`] - The [`Value`](value::Value) enum
//! - [`serializers`] - JSON text output

// These clippy lints are intentionally allowed for the record crate:
// - doc_markdown: backtick requirements for documentation items are too strict
// - return_self_not_must_use: builder pattern methods are self-documenting
// - missing_const_for_fn: accessors may gain runtime logic later
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]

pub mod fields;
pub mod model;
pub mod record;
pub mod serializers;
pub mod validators;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use fields::{FieldDef, FieldType};
pub use model::{parse_json_object, Model, ModelMeta};
pub use record::Record;
pub use serializers::{serializer_for, JsonSerializer, PrettyJsonSerializer, Serializer};
pub use validators::Validator;
pub use value::{FromValue, Value};
