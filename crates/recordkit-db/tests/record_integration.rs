//! Integration tests for validated records.
//!
//! These tests drive a hand-written `User` model and dynamic `Record`s through
//! construction, field writes, and JSON round-trips, checking that an instance
//! never holds an undeclared field or an invalid value.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex};

use recordkit_core::logging::build_subscriber;
use recordkit_core::{RecordError, RecordResult, Settings, UnknownKeyPolicy};
use recordkit_db::fields::FieldDef;
use recordkit_db::model::{Model, ModelMeta};
use recordkit_db::record::Record;
use recordkit_db::serializers::PrettyJsonSerializer;
use recordkit_db::value::{FromValue, Value};
use recordkit_signals::{FieldRejected, InstanceCreated, SIGNALS};

// ── Test model definitions ────────────────────────────────────────────

#[derive(Debug, Default, Clone, PartialEq)]
struct User {
    id: Option<i64>,
    name: Option<String>,
    surname: Option<String>,
    height: Option<i64>,
    year_born: Option<i64>,
}

impl Model for User {
    fn meta() -> &'static ModelMeta {
        static META: LazyLock<ModelMeta> = LazyLock::new(|| {
            ModelMeta::new(
                "user",
                vec![
                    FieldDef::integer("id").default(0).max_value(1 << 32),
                    FieldDef::char("name").max_length(200),
                    FieldDef::char("surname").max_length(200),
                    FieldDef::integer("height").max_value(300),
                    FieldDef::integer("year_born").max_value(2017),
                ],
            )
        });
        &META
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id)),
            ("name", Value::from(self.name.clone())),
            ("surname", Value::from(self.surname.clone())),
            ("height", Value::from(self.height)),
            ("year_born", Value::from(self.year_born)),
        ]
    }

    fn assign(&mut self, name: &str, value: Value) -> RecordResult<()> {
        match name {
            "id" => self.id = FromValue::from_value(value)?,
            "name" => self.name = FromValue::from_value(value)?,
            "surname" => self.surname = FromValue::from_value(value)?,
            "height" => self.height = FromValue::from_value(value)?,
            "year_born" => self.year_born = FromValue::from_value(value)?,
            _ => return Err(RecordError::UnknownField(name.to_string())),
        }
        Ok(())
    }
}

static NOTE: LazyLock<ModelMeta> = LazyLock::new(|| {
    ModelMeta::new(
        "note",
        vec![
            FieldDef::char("title").max_length(3),
            FieldDef::integer("stars").max_value(5),
            FieldDef::any("payload"),
        ],
    )
});

static WATCHED: LazyLock<ModelMeta> = LazyLock::new(|| {
    ModelMeta::new("watched_record", vec![FieldDef::integer("stars").max_value(5)])
});

// ── Construction ──────────────────────────────────────────────────────

#[test]
fn test_new_user_has_defaults() {
    let u = User::new().unwrap();
    assert_eq!(u.id, Some(0));
    assert_eq!(u.name, None);
    assert_eq!(
        u.to_json().unwrap(),
        r#"{"id":0,"name":null,"surname":null,"height":null,"year_born":null}"#
    );
}

#[test]
fn test_set_then_serialize() {
    let mut u = User::new().unwrap();
    u.set("name", "Guido").unwrap();
    u.set("surname", "Van Rossum").unwrap();
    assert_eq!(u.get("id"), Some(Value::Int(0)));
    assert_eq!(
        u.to_json().unwrap(),
        r#"{"id":0,"name":"Guido","surname":"Van Rossum","height":null,"year_born":null}"#
    );
}

#[test]
fn test_from_json_populates_fields() {
    let w = User::from_json(
        r#"{"id": 5, "name": "John", "surname": "Smith", "height": 185, "year_born": 1989}"#,
    )
    .unwrap();
    assert_eq!(w.id, Some(5));
    assert_eq!(w.name.as_deref(), Some("John"));
    assert_eq!(w.height, Some(185));
    assert_eq!(w.year_born, Some(1989));
}

#[test]
fn test_from_json_missing_keys_keep_defaults() {
    let u = User::from_json(r#"{"name": "Ada"}"#).unwrap();
    assert_eq!(u.id, Some(0));
    assert_eq!(u.surname, None);
}

#[test]
fn test_from_json_explicit_null_overrides_default() {
    let u = User::from_json(r#"{"id": null}"#).unwrap();
    assert_eq!(u.id, None);
}

#[test]
fn test_round_trip() {
    let mut u = User::new().unwrap();
    u.set("name", "Grace").unwrap();
    u.set("height", 170).unwrap();
    u.set("year_born", 1906).unwrap();
    let back = User::from_json(&u.to_json().unwrap()).unwrap();
    assert_eq!(back, u);
}

#[test]
fn test_pretty_output_parses_back() {
    let u = User::from_json(r#"{"name": "Linus"}"#).unwrap();
    let pretty = u.to_json_with(&PrettyJsonSerializer).unwrap();
    assert!(pretty.contains('\n'));
    assert_eq!(User::from_json(&pretty).unwrap(), u);
}

// ── Rejected writes ───────────────────────────────────────────────────

#[test]
fn test_unknown_field_rejected() {
    let mut u = User::new().unwrap();
    let before = u.clone();
    for value in [
        Value::from("Why did the chicken cross the road?"),
        Value::Int(1),
        Value::Null,
        Value::Bool(true),
    ] {
        let err = u.set("favourite_joke", value).unwrap_err();
        assert_eq!(err.to_string(), "Unknown field \"favourite_joke\"");
    }
    assert_eq!(u, before);
}

#[test]
fn test_invalid_height_keeps_prior_value() {
    let mut u = User::new().unwrap();
    u.set("height", 180).unwrap();
    let err = u.set("height", 500).unwrap_err();
    assert_eq!(err.to_string(), "Invalid value \"500\" for field \"height\"");
    assert_eq!(err.field(), Some("height"));
    assert_eq!(u.height, Some(180));
}

#[test]
fn test_wrong_type_rejected() {
    let mut u = User::new().unwrap();
    assert!(u.set("height", "tall").is_err());
    assert!(u.set("height", 185.0).is_err());
    assert!(u.set("height", true).is_err());
    assert!(u.set("name", 42).is_err());
    assert_eq!(u, User::new().unwrap());
}

#[test]
fn test_null_always_valid() {
    let mut u = User::from_json(r#"{"name": "Ada", "height": 160}"#).unwrap();
    for field in User::meta().field_names() {
        u.set(field, Value::Null).unwrap();
    }
    assert_eq!(u.name, None);
    assert_eq!(u.height, None);
}

#[test]
fn test_limit_boundaries() {
    let mut u = User::new().unwrap();
    u.set("name", "x".repeat(200)).unwrap();
    assert!(u.set("name", "x".repeat(201)).is_err());
    u.set("id", 1_i64 << 32).unwrap();
    assert!(u.set("id", (1_i64 << 32) + 1).is_err());
    u.set("year_born", 2017).unwrap();
    assert!(u.set("year_born", 2018).is_err());
    u.set("height", -20).unwrap();
}

#[test]
fn test_from_json_invalid_value_fails() {
    let err = User::from_json(r#"{"year_born": 3000}"#).unwrap_err();
    assert_eq!(err.to_string(), "Invalid value \"3000\" for field \"year_born\"");
    assert_eq!(err.kind(), "invalid_value");

    let err = User::from_json(r#"{"year_born": 1989.0}"#).unwrap_err();
    assert_eq!(err.kind(), "invalid_value");
}

#[test]
fn test_from_json_unknown_key_fails_by_default() {
    let err = User::from_json(r#"{"name": "Ada", "nickname": "Countess"}"#).unwrap_err();
    assert!(matches!(err, RecordError::UnknownField(ref f) if f == "nickname"));
}

#[test]
fn test_from_json_ignore_policy() {
    let u = User::from_json_with_policy(
        r#"{"name": "Ada", "nickname": "Countess"}"#,
        UnknownKeyPolicy::Ignore,
    )
    .unwrap();
    assert_eq!(u.name.as_deref(), Some("Ada"));
}

#[test]
fn test_from_json_requires_object() {
    for input in ["[1, 2]", "\"text\"", "42", "null"] {
        let err = User::from_json(input).unwrap_err();
        assert_eq!(err.to_string(), "Supplied JSON must be a dictionary");
    }
    assert_eq!(User::from_json("{oops").unwrap_err().kind(), "malformed_input");
}

// ── Dynamic records ───────────────────────────────────────────────────

#[test]
fn test_dynamic_record_matches_typed_model() {
    let input = r#"{"id": 5, "name": "John", "surname": "Smith", "height": 185, "year_born": 1989}"#;
    let typed = User::from_json(input).unwrap();
    let dynamic = Record::from_json(User::meta(), input).unwrap();
    assert_eq!(typed.to_json().unwrap(), dynamic.to_json().unwrap());
    assert_eq!(dynamic.get("name"), Some(&Value::from("John")));
}

#[test]
fn test_dynamic_record_any_field() {
    let mut note = Record::new(&NOTE);
    note.set("payload", serde_json::json!({"tags": ["a", "b"]})).unwrap();
    note.set("title", "abc").unwrap();
    assert!(note.set("title", "abcd").is_err());
    assert_eq!(
        note.to_json().unwrap(),
        r#"{"title":"abc","stars":null,"payload":{"tags":["a","b"]}}"#
    );
}

// ── Logging ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[test]
fn test_successful_writes_log_at_debug() {
    let logs = CapturedLogs::default();
    let sink = logs.clone();
    let settings = Settings {
        debug: false,
        log_level: "recordkit_db=debug".to_string(),
        ..Settings::default()
    };

    tracing::subscriber::with_default(build_subscriber(&settings, move || sink.clone()), || {
        let mut u = User::new().unwrap();
        u.set("name", "Barbara").unwrap();
        let mut note = Record::new(&NOTE);
        note.set("stars", 4).unwrap();
    });

    let lines: Vec<String> = logs
        .contents()
        .lines()
        .filter(|line| line.contains("\"message\":\"set field\""))
        .map(str::to_string)
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.contains("\"level\":\"DEBUG\"")));
    assert!(lines[0].contains("\"field\":\"name\""));
    assert!(lines[1].contains("\"field\":\"stars\""));
}

// ── Signals ───────────────────────────────────────────────────────────

#[test]
fn test_signals_follow_construction_outcome() {
    let created = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(Mutex::new(Vec::new()));

    let c = created.clone();
    SIGNALS.instance_created.connect(
        "record_integration.created",
        Arc::new(move |event: &InstanceCreated| {
            if event.model == "watched_record" {
                c.fetch_add(1, Ordering::SeqCst);
            }
        }),
    );
    let r = rejected.clone();
    SIGNALS.field_rejected.connect(
        "record_integration.rejected",
        Arc::new(move |event: &FieldRejected| {
            if event.model == "watched_record" {
                r.lock().unwrap().push((event.field.clone(), event.reason));
            }
        }),
    );

    Record::from_json(&WATCHED, r#"{"stars": 4}"#).unwrap();
    assert!(Record::from_json(&WATCHED, r#"{"stars": 9}"#).is_err());
    assert!(Record::from_json(&WATCHED, r#"{"author": "me"}"#).is_err());

    SIGNALS.instance_created.disconnect("record_integration.created");
    SIGNALS.field_rejected.disconnect("record_integration.rejected");

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert_eq!(
        *rejected.lock().unwrap(),
        vec![
            ("stars".to_string(), "invalid_value"),
            ("author".to_string(), "unknown_field"),
        ]
    );
}
