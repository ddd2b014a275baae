//! Dynamic records.
//!
//! A [`Record`] is an instance of a record type known only through its
//! [`ModelMeta`]: it holds exactly one [`Value`] per declared field, in schema
//! order, and nothing else.

use std::fmt;

use recordkit_core::{RecordResult, UnknownKeyPolicy};

use crate::model::{parse_json_object, ModelMeta};
use crate::serializers::{JsonSerializer, Serializer};
use crate::value::Value;

/// An instance of a schema-described record type.
///
/// # Examples
///
/// ```
/// use std::sync::LazyLock;
/// use recordkit_db::fields::FieldDef;
/// use recordkit_db::model::ModelMeta;
/// use recordkit_db::record::Record;
///
/// static POINT: LazyLock<ModelMeta> = LazyLock::new(|| {
///     ModelMeta::new("point", vec![FieldDef::integer("x"), FieldDef::integer("y")])
/// });
///
/// let mut p = Record::new(&POINT);
/// p.set("x", 3).unwrap();
/// assert!(p.set("z", 1).is_err());
/// assert_eq!(p.to_json().unwrap(), r#"{"x":3,"y":null}"#);
/// ```
#[derive(Clone)]
pub struct Record {
    meta: &'static ModelMeta,
    values: Vec<Value>,
}

impl Record {
    /// Constructs a record with every field at its default.
    pub fn new(meta: &'static ModelMeta) -> Self {
        let record = Self::with_defaults(meta);
        meta.instance_created();
        record
    }

    /// Constructs a record from a JSON object using the type's unknown-key policy.
    pub fn from_json(meta: &'static ModelMeta, input: &str) -> RecordResult<Self> {
        Self::from_json_with_policy(meta, input, meta.unknown_key_policy())
    }

    /// Constructs a record from a JSON object. Any failure discards the record.
    pub fn from_json_with_policy(
        meta: &'static ModelMeta,
        input: &str,
        policy: UnknownKeyPolicy,
    ) -> RecordResult<Self> {
        let _span = recordkit_core::logging::model_span(meta.model_name).entered();
        let object = parse_json_object(input)?;
        let mut record = Self::with_defaults(meta);
        meta.apply_object(object, policy, |index, value| {
            record.values[index] = value;
            Ok(())
        })?;
        meta.instance_created();
        Ok(record)
    }

    fn with_defaults(meta: &'static ModelMeta) -> Self {
        Self {
            meta,
            values: meta.defaults(),
        }
    }

    /// The schema this record conforms to.
    pub const fn meta(&self) -> &'static ModelMeta {
        self.meta
    }

    /// Writes one field. On failure the previous value is kept.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> RecordResult<()> {
        let value = value.into();
        let index = self.meta.check(name, &value)?;
        tracing::debug!(model = self.meta.model_name, field = name, value = %value, "set field");
        self.values[index] = value;
        Ok(())
    }

    /// Reads one field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.meta.field_index(name).map(|i| &self.values[i])
    }

    /// Every field with its value, in schema order.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        self.meta
            .fields()
            .iter()
            .zip(&self.values)
            .map(|(field, value)| (field.name, value))
    }

    /// Returns the schema-ordered JSON object for this record.
    pub fn to_json_value(&self) -> serde_json::Value {
        self.meta.to_json_object(|name| self.get(name))
    }

    /// Serializes this record as compact JSON.
    pub fn to_json(&self) -> RecordResult<String> {
        self.to_json_with(&JsonSerializer)
    }

    /// Serializes this record with the given serializer.
    pub fn to_json_with(&self, serializer: &dyn Serializer) -> RecordResult<String> {
        serializer.serialize(&self.to_json_value())
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.meta, other.meta) && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.meta.model_name);
        for (name, value) in self.values() {
            s.field(name, value);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldDef;
    use std::sync::LazyLock;

    static BOOK: LazyLock<ModelMeta> = LazyLock::new(|| {
        ModelMeta::new(
            "book",
            vec![
                FieldDef::char("title").max_length(20),
                FieldDef::integer("pages").default(1).max_value(2000),
            ],
        )
    });

    #[test]
    fn test_new_uses_defaults() {
        let book = Record::new(&BOOK);
        assert_eq!(book.get("title"), Some(&Value::Null));
        assert_eq!(book.get("pages"), Some(&Value::Int(1)));
        assert_eq!(book.get("isbn"), None);
    }

    #[test]
    fn test_set_keeps_prior_value_on_failure() {
        let mut book = Record::new(&BOOK);
        book.set("pages", 300).unwrap();
        assert!(book.set("pages", 5000).is_err());
        assert!(book.set("pages", "many").is_err());
        assert_eq!(book.get("pages"), Some(&Value::Int(300)));
    }

    #[test]
    fn test_values_in_schema_order() {
        let book = Record::from_json(&BOOK, r#"{"pages": 10, "title": "Dune"}"#).unwrap();
        let names: Vec<_> = book.values().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["title", "pages"]);
        assert_eq!(book.to_json().unwrap(), r#"{"title":"Dune","pages":10}"#);
    }

    #[test]
    fn test_ignore_policy_skips_unknown_keys() {
        let book = Record::from_json_with_policy(
            &BOOK,
            r#"{"title": "Emma", "author": "Austen"}"#,
            UnknownKeyPolicy::Ignore,
        )
        .unwrap();
        assert_eq!(book.get("title"), Some(&Value::from("Emma")));
    }

    #[test]
    fn test_ignore_policy_still_validates_known_keys() {
        let err = Record::from_json_with_policy(
            &BOOK,
            r#"{"author": "Austen", "pages": 9999}"#,
            UnknownKeyPolicy::Ignore,
        )
        .unwrap_err();
        assert_eq!(err.kind(), "invalid_value");
    }

    #[test]
    fn test_debug_lists_fields() {
        let book = Record::new(&BOOK);
        let debug = format!("{book:?}");
        assert!(debug.starts_with("book"));
        assert!(debug.contains("pages: Int(1)"));
    }

    #[test]
    fn test_equality() {
        let a = Record::from_json(&BOOK, r#"{"title": "Dune"}"#).unwrap();
        let mut b = Record::new(&BOOK);
        assert_ne!(a, b);
        b.set("title", "Dune").unwrap();
        assert_eq!(a, b);
    }
}
