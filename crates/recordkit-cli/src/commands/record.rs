//! The `record` command.
//!
//! Builds a `User` from JSON given on the command line and prints it back in
//! schema order, or reports why the input was refused.

use std::io::Write;

use recordkit_core::{RecordResult, Settings, UnknownKeyPolicy};
use recordkit_db::model::Model;
use recordkit_db::serializers::serializer_for;

use crate::command::ManagementCommand;
use crate::models::User;

/// Validates a JSON object as a `User`.
pub struct RecordCommand;

impl ManagementCommand for RecordCommand {
    fn name(&self) -> &'static str {
        "record"
    }

    fn help(&self) -> &'static str {
        "Build a User from a JSON object and print it"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("json")
                .long("json")
                .short('j')
                .required(true)
                .value_name("OBJECT")
                .help("The JSON object to build the record from"),
        )
        .arg(
            clap::Arg::new("ignore-unknown")
                .long("ignore-unknown")
                .action(clap::ArgAction::SetTrue)
                .help("Skip undeclared keys instead of refusing the input"),
        )
        .arg(
            clap::Arg::new("pretty")
                .long("pretty")
                .action(clap::ArgAction::SetTrue)
                .help("Pretty-print the output"),
        )
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> RecordResult<()> {
        let input = matches
            .get_one::<String>("json")
            .map_or("{}", String::as_str);
        let policy = if matches.get_flag("ignore-unknown") {
            UnknownKeyPolicy::Ignore
        } else {
            settings.unknown_keys
        };
        let pretty = settings.pretty_json || matches.get_flag("pretty");

        let user = User::from_json_with_policy(input, policy)?;
        writeln!(out, "{}", user.to_json_with(serializer_for(pretty))?)?;
        Ok(())
    }
}
