//! Settings for recordkit.
//!
//! [`Settings`] holds the handful of knobs the library and the command-line
//! tool read at runtime, and [`LazySettings`] is the globally accessible,
//! configure-once container behind [`SETTINGS`].

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

/// What JSON construction does with keys that are not declared fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownKeyPolicy {
    /// Fail construction with an unknown-field error.
    #[default]
    Reject,
    /// Skip the key and keep going.
    Ignore,
}

impl fmt::Display for UnknownKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}

impl FromStr for UnknownKeyPolicy {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "ignore" => Ok(Self::Ignore),
            other => Err(RecordError::ConfigurationError(format!(
                "unknown key policy must be \"reject\" or \"ignore\", got \"{other}\""
            ))),
        }
    }
}

/// The complete set of recordkit settings.
///
/// # Examples
///
/// ```
/// use recordkit_core::settings::{Settings, UnknownKeyPolicy};
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.unknown_keys, UnknownKeyPolicy::Reject);
/// ```
///
/// Unrecognised keys are refused when settings are deserialized, so a typo in
/// a settings file is reported instead of silently ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty logs instead of JSON logs).
    pub debug: bool,
    /// The log level filter (e.g. "info", "debug", "recordkit_db=trace").
    pub log_level: String,
    /// Default policy for undeclared keys in constructor JSON.
    pub unknown_keys: UnknownKeyPolicy,
    /// Whether serialized records are pretty-printed by the CLI.
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            unknown_keys: UnknownKeyPolicy::Reject,
            pretty_json: false,
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, then read
/// through [`get`](LazySettings::get). Library code that must work whether or
/// not the host configured anything uses [`try_get`](LazySettings::try_get).
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the settings. Must be called at most once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Configures the settings unless they already are.
    ///
    /// Returns `true` if these settings were installed, `false` if another
    /// caller got there first. Safe to race from several threads.
    pub fn try_configure(&self, settings: Settings) -> bool {
        self.inner.set(settings).is_ok()
    }

    /// Returns the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or `None` if nobody configured them yet.
    pub fn try_get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.unknown_keys, UnknownKeyPolicy::Reject);
        assert!(!s.pretty_json);
    }

    #[test]
    fn test_unknown_key_policy_parse() {
        assert_eq!("reject".parse::<UnknownKeyPolicy>().unwrap(), UnknownKeyPolicy::Reject);
        assert_eq!(" Ignore ".parse::<UnknownKeyPolicy>().unwrap(), UnknownKeyPolicy::Ignore);
        assert!("drop".parse::<UnknownKeyPolicy>().is_err());
    }

    #[test]
    fn test_unknown_key_policy_serde() {
        let json = serde_json::to_string(&UnknownKeyPolicy::Ignore).unwrap();
        assert_eq!(json, "\"ignore\"");
        let back: UnknownKeyPolicy = serde_json::from_str("\"reject\"").unwrap();
        assert_eq!(back, UnknownKeyPolicy::Reject);
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());

        let settings = Settings {
            debug: false,
            ..Settings::default()
        };
        lazy.configure(settings);
        assert!(lazy.is_configured());
        assert!(!lazy.get().debug);
    }

    #[test]
    fn test_lazy_settings_try_get() {
        let lazy = LazySettings::new();
        assert!(lazy.try_get().is_none());
        lazy.configure(Settings::default());
        assert_eq!(lazy.try_get().unwrap().log_level, "info");
    }

    #[test]
    fn test_try_configure_first_caller_wins() {
        let lazy = LazySettings::new();
        assert!(lazy.try_configure(Settings {
            log_level: "debug".to_string(),
            ..Settings::default()
        }));
        assert!(!lazy.try_configure(Settings::default()));
        assert_eq!(lazy.get().log_level, "debug");
    }

    #[test]
    fn test_try_configure_concurrent() {
        let lazy = LazySettings::new();
        let barrier = std::sync::Barrier::new(16);
        let installed: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        lazy.try_configure(Settings::default())
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| usize::from(h.join().unwrap()))
                .sum()
        });
        assert_eq!(installed, 1);
        assert!(lazy.is_configured());
    }

    #[test]
    #[should_panic(expected = "already been configured")]
    fn test_lazy_settings_double_configure_panics() {
        let lazy = LazySettings::new();
        lazy.configure(Settings::default());
        lazy.configure(Settings::default());
    }

    #[test]
    #[should_panic(expected = "not been configured")]
    fn test_lazy_settings_get_before_configure_panics() {
        let lazy = LazySettings::new();
        let _ = lazy.get();
    }
}
