//! Record schemas and the typed [`Model`] trait.
//!
//! A [`ModelMeta`] is the schema of one record type: an ordered, immutable list
//! of [`FieldDef`]s built once (usually inside a `LazyLock`) and shared by
//! every instance. It is the single place that decides whether a write is
//! allowed: [`ModelMeta::check`] resolves the field name and validates the
//! value, and both [`Model`] structs and dynamic [`Record`](crate::record::Record)s
//! route every write through it.

use recordkit_core::{RecordError, RecordResult, UnknownKeyPolicy, SETTINGS};
use recordkit_signals::{FieldRejected, InstanceCreated, ModelDeclared, SIGNALS};

use crate::fields::FieldDef;
use crate::serializers::{JsonSerializer, Serializer};
use crate::value::Value;

/// The schema of a record type.
#[derive(Debug)]
pub struct ModelMeta {
    /// The record type name (e.g. "user").
    pub model_name: &'static str,
    fields: Vec<FieldDef>,
    unknown_keys: Option<UnknownKeyPolicy>,
}

impl ModelMeta {
    /// Declares a record type.
    ///
    /// # Panics
    ///
    /// Panics if the schema is inconsistent; see [`try_new`](Self::try_new).
    pub fn new(model_name: &'static str, fields: Vec<FieldDef>) -> Self {
        match Self::try_new(model_name, fields) {
            Ok(meta) => meta,
            Err(e) => panic!("invalid schema for record type \"{model_name}\": {e}"),
        }
    }

    /// Declares a record type, rejecting duplicate field names and defaults
    /// that fail their own field's validation.
    ///
    /// On success the `model_declared` signal is sent.
    pub fn try_new(model_name: &'static str, fields: Vec<FieldDef>) -> RecordResult<Self> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RecordError::SchemaError(format!(
                    "field \"{}\" is declared more than once",
                    field.name
                )));
            }
            field.clean(&field.default).map_err(|reason| {
                RecordError::SchemaError(format!(
                    "default {} for field \"{}\" is invalid: {reason}",
                    field.default, field.name
                ))
            })?;
        }

        let meta = Self {
            model_name,
            fields,
            unknown_keys: None,
        };
        tracing::debug!(model = model_name, fields = meta.fields.len(), "declared record type");
        SIGNALS.model_declared.send(&ModelDeclared {
            model: model_name,
            fields: meta.field_names(),
        });
        Ok(meta)
    }

    /// Fixes the unknown-key policy for this type instead of following the settings.
    #[must_use]
    pub const fn with_unknown_keys(mut self, policy: UnknownKeyPolicy) -> Self {
        self.unknown_keys = Some(policy);
        self
    }

    /// The declared fields, in schema order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the schema position of a field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Declared field names, in schema order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Default values, in schema order.
    pub fn defaults(&self) -> Vec<Value> {
        self.fields.iter().map(|f| f.default.clone()).collect()
    }

    /// The number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the type declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The policy applied to undeclared keys in constructor JSON.
    ///
    /// A policy fixed with [`with_unknown_keys`](Self::with_unknown_keys) wins;
    /// otherwise the configured settings decide, defaulting to `Reject`.
    pub fn unknown_key_policy(&self) -> UnknownKeyPolicy {
        self.unknown_keys
            .or_else(|| SETTINGS.try_get().map(|s| s.unknown_keys))
            .unwrap_or_default()
    }

    /// Decides whether `value` may be written to `name`, without side effects.
    ///
    /// Returns the field's schema position on success.
    pub fn resolve(&self, name: &str, value: &Value) -> RecordResult<usize> {
        let index = self
            .field_index(name)
            .ok_or_else(|| RecordError::UnknownField(name.to_string()))?;
        self.fields[index]
            .clean(value)
            .map_err(|reason| RecordError::invalid_value(name, value, reason))?;
        Ok(index)
    }

    /// Like [`resolve`](Self::resolve), but a rejection is logged and sent on
    /// the `field_rejected` signal.
    pub fn check(&self, name: &str, value: &Value) -> RecordResult<usize> {
        self.resolve(name, value).inspect_err(|e| {
            tracing::warn!(
                model = self.model_name,
                field = name,
                value = %value,
                kind = e.kind(),
                "rejected field write"
            );
            SIGNALS.field_rejected.send(&FieldRejected {
                model: self.model_name,
                field: name.to_string(),
                value: value.to_string(),
                reason: e.kind(),
            });
        })
    }

    /// Builds the JSON object for an instance, walking the schema rather than
    /// whatever the instance happens to hold.
    pub fn to_json_object<'a, F>(&self, mut lookup: F) -> serde_json::Value
    where
        F: FnMut(&str) -> Option<&'a Value>,
    {
        let object: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|f| {
                let value = lookup(f.name).map_or(serde_json::Value::Null, Value::to_json);
                (f.name.to_string(), value)
            })
            .collect();
        serde_json::Value::Object(object)
    }

    /// Sends the `instance_created` signal for this type.
    pub(crate) fn instance_created(&self) {
        tracing::debug!(model = self.model_name, "constructed record instance");
        SIGNALS.instance_created.send(&InstanceCreated {
            model: self.model_name,
        });
    }

    /// Applies a parsed JSON object to an instance, key by key, through `write`.
    ///
    /// Keys arrive in document order. Undeclared keys are skipped or rejected
    /// according to `policy`; the first rejected write aborts.
    pub(crate) fn apply_object<F>(
        &self,
        object: serde_json::Map<String, serde_json::Value>,
        policy: UnknownKeyPolicy,
        mut write: F,
    ) -> RecordResult<()>
    where
        F: FnMut(usize, Value) -> RecordResult<()>,
    {
        for (key, raw) in object {
            if policy == UnknownKeyPolicy::Ignore && self.field_index(&key).is_none() {
                tracing::debug!(model = self.model_name, key = %key, "ignoring undeclared key");
                continue;
            }
            let value = Value::from(raw);
            let index = self.check(&key, &value)?;
            write(index, value)?;
        }
        Ok(())
    }
}

/// Parses constructor input, which must be a JSON object.
///
/// Both unparsable text and valid JSON of another shape are malformed input.
pub fn parse_json_object(input: &str) -> RecordResult<serde_json::Map<String, serde_json::Value>> {
    match JsonSerializer.deserialize(input) {
        Ok(serde_json::Value::Object(object)) => Ok(object),
        Ok(_) => Err(RecordError::MalformedInput(
            RecordError::NOT_AN_OBJECT.to_string(),
        )),
        Err(e) => Err(RecordError::MalformedInput(format!("Invalid JSON input: {e}"))),
    }
}

/// A record type backed by a plain Rust struct.
///
/// Implementors supply the schema and an explicit field-by-field mapping in
/// [`assign`](Model::assign); every public write goes through
/// [`set`](Model::set), which consults the schema first.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use recordkit_core::{RecordError, RecordResult};
/// use recordkit_db::fields::FieldDef;
/// use recordkit_db::model::{Model, ModelMeta};
/// use recordkit_db::value::{FromValue, Value};
///
/// #[derive(Debug, Default)]
/// struct Tag {
///     label: Option<String>,
/// }
///
/// impl Model for Tag {
///     fn meta() -> &'static ModelMeta {
///         static META: LazyLock<ModelMeta> = LazyLock::new(|| {
///             ModelMeta::new("tag", vec![FieldDef::char("label").max_length(8)])
///         });
///         &META
///     }
///
///     fn field_values(&self) -> Vec<(&'static str, Value)> {
///         vec![("label", Value::from(self.label.clone()))]
///     }
///
///     fn assign(&mut self, name: &str, value: Value) -> RecordResult<()> {
///         match name {
///             "label" => self.label = FromValue::from_value(value)?,
///             _ => return Err(RecordError::UnknownField(name.to_string())),
///         }
///         Ok(())
///     }
/// }
///
/// let mut tag = Tag::new().unwrap();
/// tag.set("label", "rust").unwrap();
/// assert!(tag.set("label", "far too long").is_err());
/// assert_eq!(tag.to_json().unwrap(), r#"{"label":"rust"}"#);
/// ```
pub trait Model: Default + Send + Sync + 'static {
    /// Returns the static schema for this type.
    fn meta() -> &'static ModelMeta;

    /// Returns every declared field with its current value.
    fn field_values(&self) -> Vec<(&'static str, Value)>;

    /// Stores an already validated value in the named struct field.
    ///
    /// Called only after the schema accepted the write.
    fn assign(&mut self, name: &str, value: Value) -> RecordResult<()>;

    /// Constructs an instance with every field at its default.
    fn new() -> RecordResult<Self> {
        let instance = with_defaults::<Self>()?;
        Self::meta().instance_created();
        Ok(instance)
    }

    /// Writes one field. On failure the previous value is kept.
    fn set(&mut self, name: &str, value: impl Into<Value>) -> RecordResult<()> {
        let value = value.into();
        let meta = Self::meta();
        meta.check(name, &value)?;
        tracing::debug!(model = meta.model_name, field = name, value = %value, "set field");
        self.assign(name, value)
    }

    /// Reads one field.
    fn get(&self, name: &str) -> Option<Value> {
        self.field_values()
            .into_iter()
            .find_map(|(field, value)| (field == name).then_some(value))
    }

    /// Constructs an instance from a JSON object using the type's unknown-key policy.
    fn from_json(input: &str) -> RecordResult<Self> {
        Self::from_json_with_policy(input, Self::meta().unknown_key_policy())
    }

    /// Constructs an instance from a JSON object.
    ///
    /// Fields start at their defaults and each key is then written through the
    /// schema. Any failure discards the partially built instance.
    fn from_json_with_policy(input: &str, policy: UnknownKeyPolicy) -> RecordResult<Self> {
        let meta = Self::meta();
        let _span = recordkit_core::logging::model_span(meta.model_name).entered();
        let object = parse_json_object(input)?;
        let mut instance = with_defaults::<Self>()?;
        meta.apply_object(object, policy, |index, value| {
            instance.assign(meta.fields()[index].name, value)
        })?;
        meta.instance_created();
        Ok(instance)
    }

    /// Returns the schema-ordered JSON object for this instance.
    fn to_json_value(&self) -> serde_json::Value {
        let values = self.field_values();
        Self::meta().to_json_object(|name| {
            values
                .iter()
                .find_map(|(field, value)| (*field == name).then_some(value))
        })
    }

    /// Serializes this instance as compact JSON.
    fn to_json(&self) -> RecordResult<String> {
        self.to_json_with(&JsonSerializer)
    }

    /// Serializes this instance with the given serializer.
    fn to_json_with(&self, serializer: &dyn Serializer) -> RecordResult<String> {
        serializer.serialize(&self.to_json_value())
    }
}

fn with_defaults<M: Model>() -> RecordResult<M> {
    let mut instance = M::default();
    for field in M::meta().fields() {
        instance.assign(field.name, field.default.clone())?;
    }
    Ok(instance)
}
