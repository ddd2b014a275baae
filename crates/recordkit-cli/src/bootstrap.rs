//! Startup for the `recordkit` binary.
//!
//! Resolves settings (an optional file, then `RECORDKIT_*` environment
//! overrides), installs the tracing subscriber, publishes the settings through
//! [`SETTINGS`], and dispatches to the chosen command.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use recordkit_core::logging::setup_logging;
use recordkit_core::{settings_loader, RecordResult, Settings, SETTINGS};

use crate::command::CommandRegistry;
use crate::commands::register_builtin_commands;

/// Loads settings from `path` if given, otherwise from the environment alone.
pub fn load_settings(path: Option<&Path>) -> RecordResult<Settings> {
    match path {
        Some(path) => settings_loader::from_path_with_env(path),
        None => settings_loader::from_env(),
    }
}

/// Parses `args`, configures the process, and runs the selected command.
///
/// Settings are published globally on the first call only; later calls in the
/// same process reuse whatever was configured first.
pub fn run<I, T>(args: I, out: &mut dyn Write) -> anyhow::Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);

    let matches = registry.build_cli().try_get_matches_from(args)?;
    let settings_path = matches.get_one::<PathBuf>("settings").map(PathBuf::as_path);
    let settings = load_settings(settings_path).with_context(|| match settings_path {
        Some(path) => format!("failed to load settings from {}", path.display()),
        None => "failed to load settings from the environment".to_string(),
    })?;

    setup_logging(&settings);
    if !SETTINGS.try_configure(settings) {
        tracing::debug!("settings already configured; keeping the first ones");
    }
    let settings = SETTINGS.get();
    tracing::debug!(
        debug = settings.debug,
        unknown_keys = %settings.unknown_keys,
        pretty_json = settings.pretty_json,
        "settings loaded"
    );

    registry.execute(&matches, settings, out)?;
    Ok(())
}
