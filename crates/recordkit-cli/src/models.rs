//! Types used by the built-in commands.
//!
//! [`User`] is the record type behind `orm` and `record`; [`AppState`] and
//! [`ScopedState`] are the singletons behind `singleton`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;

use recordkit_core::{RecordError, RecordResult, Singleton};
use recordkit_db::fields::FieldDef;
use recordkit_db::model::{Model, ModelMeta};
use recordkit_db::value::{FromValue, Value};

/// A user in the system.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub height: Option<i64>,
    pub year_born: Option<i64>,
}

static USER_META: LazyLock<ModelMeta> = LazyLock::new(|| {
    ModelMeta::new(
        "user",
        vec![
            FieldDef::integer("id").default(0).max_value(1 << 32),
            FieldDef::char("name").max_length(200),
            FieldDef::char("surname").max_length(200),
            FieldDef::integer("height")
                .max_value(300)
                .help_text("Height in centimetres"),
            FieldDef::integer("year_born").max_value(2017),
        ],
    )
});

impl Model for User {
    fn meta() -> &'static ModelMeta {
        &USER_META
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

static STATES_CREATED: AtomicUsize = AtomicUsize::new(0);

/// Process-wide application state. Each value carries the order in which it
/// was built, so distinct instances are easy to tell apart.
#[derive(Debug)]
pub struct AppState {
    pub serial: usize,
}

impl AppState {
    fn next() -> Self {
        Self {
            serial: STATES_CREATED.fetch_add(1, Ordering::SeqCst) + 1,
        }
    }
}

impl Singleton for AppState {
    fn create() -> Self {
        Self::next()
    }
}

/// A specialisation of [`AppState`]. It is its own type, so it gets its own
/// instance rather than the one [`AppState::instance`] returns.
#[derive(Debug)]
pub struct ScopedState {
    pub base: AppState,
    pub scope: &'static str,
}

impl Singleton for ScopedState {
    fn create() -> Self {
        Self {
            base: AppState::next(),
            scope: "scoped",
        }
    }
}
