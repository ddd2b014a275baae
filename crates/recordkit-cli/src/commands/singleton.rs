//! The `singleton` command.

use std::io::Write;
use std::sync::Arc;

use recordkit_core::{RecordResult, Settings, Singleton};

use crate::command::ManagementCommand;
use crate::models::{AppState, ScopedState};

/// Shows that a singleton type hands out one shared instance, and that a
/// specialised type gets an instance of its own.
pub struct SingletonCommand;

impl ManagementCommand for SingletonCommand {
    fn name(&self) -> &'static str {
        "singleton"
    }

    fn help(&self) -> &'static str {
        "Show per-type singleton instances"
    }

    fn handle(
        &self,
        _matches: &clap::ArgMatches,
        _settings: &Settings,
        out: &mut dyn Write,
    ) -> RecordResult<()> {
        let first = AppState::instance();
        let second = AppState::instance();
        let scoped = ScopedState::instance();

        writeln!(out, "AppState #{} at {:p}", first.serial, first)?;
        writeln!(out, "AppState #{} at {:p}", second.serial, second)?;
        writeln!(
            out,
            "ScopedState #{} ({}) at {:p}",
            scoped.base.serial, scoped.scope, scoped
        )?;
        writeln!(out, "same AppState instance: {}", Arc::ptr_eq(&first, &second))?;
        writeln!(
            out,
            "ScopedState shares AppState instance: {}",
            first.serial == scoped.base.serial
        )?;
        Ok(())
    }
}
