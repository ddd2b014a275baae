//! Field type definitions.
//!
//! Each [`FieldType`] decides which kinds of [`Value`] a field accepts, and a
//! [`FieldDef`] adds the default value and the limits on top. A null value is
//! accepted by every field, whatever its limits.

use std::fmt;

use recordkit_core::ValidationError;

use crate::validators::{
    MaxLengthValidator, MaxValueValidator, MinLengthValidator, MinValueValidator, Validator,
};
use crate::value::Value;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FieldType {
    /// Accepts any value.
    Any,
    /// Text.
    Char,
    /// Whole numbers. Booleans and floats are not integers.
    Integer,
}

impl FieldType {
    /// Returns `true` if a value of this kind may be stored in the field.
    pub const fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Any => true,
            Self::Char => matches!(value, Value::Null | Value::String(_)),
            Self::Integer => matches!(value, Value::Null | Value::Int(_)),
        }
    }

    /// A short name used in messages.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Char => "string",
            Self::Integer => "int",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete definition of a record field.
///
/// Built once when a record type's schema is declared and shared by every
/// instance of that type.
///
/// # Examples
///
/// ```
/// use recordkit_db::fields::FieldDef;
/// use recordkit_db::value::Value;
///
/// let height = FieldDef::integer("height").max_value(300);
/// assert!(height.is_valid(&Value::Int(185)));
/// assert!(!height.is_valid(&Value::Int(500)));
/// assert!(height.is_valid(&Value::Null));
/// ```
#[derive(Debug)]
pub struct FieldDef {
    /// The field name.
    pub name: &'static str,
    /// The kind of value this field holds.
    pub field_type: FieldType,
    /// Value given to new instances.
    pub default: Value,
    /// Maximum length in characters, for text fields.
    pub max_length: Option<usize>,
    /// Maximum value, for integer fields.
    pub max_value: Option<i64>,
    /// Additional validators run after the built-in checks.
    pub validators: Vec<Box<dyn Validator>>,
    /// Human-readable help text.
    pub help_text: String,
}

impl FieldDef {
    /// Creates a new `FieldDef` with a null default and no limits.
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            default: Value::Null,
            max_length: None,
            max_value: None,
            validators: Vec::new(),
            help_text: String::new(),
        }
    }

    /// A field accepting any value.
    pub fn any(name: &'static str) -> Self {
        Self::new(name, FieldType::Any)
    }

    /// A text field.
    pub fn char(name: &'static str) -> Self {
        Self::new(name, FieldType::Char)
    }

    /// An integer field.
    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    /// Sets the default value for this field.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = value.into();
        self
    }

    /// Sets the maximum length in characters.
    #[must_use]
    pub const fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Sets the maximum integer value.
    #[must_use]
    pub const fn max_value(mut self, max_value: i64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    /// Requires at least `min_length` characters.
    #[must_use]
    pub fn min_length(self, min_length: usize) -> Self {
        self.validator(MinLengthValidator::new(min_length))
    }

    /// Requires an integer of at least `min_value`.
    #[must_use]
    pub fn min_value(self, min_value: i64) -> Self {
        self.validator(MinValueValidator::new(min_value))
    }

    /// Attaches a custom validator.
    #[must_use]
    pub fn validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Returns whether `value` is acceptable for this field.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.clean(value).is_ok()
    }

    /// Checks `value` against this field, explaining the first failure.
    ///
    /// Order: null short-circuits to success, then the type check, then the
    /// configured maximums, then any additional validators.
    pub fn clean(&self, value: &Value) -> Result<(), ValidationError> {
        if value.is_null() {
            return Ok(());
        }

        if !self.field_type.accepts(value) {
            return Err(ValidationError::new(
                format!(
                    "Expected a value of type {}, got {}.",
                    self.field_type,
                    value.type_name()
                ),
                "invalid_type",
            )
            .with_param("expected", self.field_type.name())
            .with_param("actual", value.type_name()));
        }

        if let Some(max_length) = self.max_length {
            MaxLengthValidator::new(max_length).validate(value)?;
        }
        if let Some(max_value) = self.max_value {
            MaxValueValidator::new(max_value).validate(value)?;
        }
        for validator in &self.validators {
            validator.validate(value)?;
        }
        Ok(())
    }
}
