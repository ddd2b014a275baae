//! The `orm` command.
//!
//! Walks through the `User` record type: building one, writing fields, reading
//! it back as JSON, building another from JSON, and showing the three ways a
//! write can be refused.

use std::io::Write;

use recordkit_core::{RecordResult, Settings};
use recordkit_db::model::Model;
use recordkit_db::serializers::serializer_for;

use crate::command::ManagementCommand;
use crate::models::User;

/// Demonstrates validated records.
pub struct OrmCommand;

const SAMPLE_USER: &str =
    r#"{"id": 5, "name": "John", "surname": "Smith", "height": 185, "year_born": 1989}"#;

impl ManagementCommand for OrmCommand {
    fn name(&self) -> &'static str {
        "orm"
    }

    fn help(&self) -> &'static str {
        "Walk through building, validating and serializing User records"
    }

    fn handle(
        &self,
        _matches: &clap::ArgMatches,
        settings: &Settings,
        out: &mut dyn Write,
    ) -> RecordResult<()> {
        let serializer = serializer_for(settings.pretty_json);

        let mut u = User::new()?;
        u.set("name", "Guido")?;
        u.set("surname", "Van Rossum")?;

        writeln!(out, "User ID={}", display(u.id))?;
        writeln!(out, "User JSON={}", u.to_json_with(serializer)?)?;

        let w = User::from_json_with_policy(SAMPLE_USER, settings.unknown_keys)?;
        writeln!(out, "User ID={}", display(w.id))?;
        writeln!(out, "User NAME={}", display(w.name.as_deref()))?;

        // Each of these must be refused; the refusal is the output.
        let refusals = [
            u.set("favourite_joke", "Knock, knock").err(),
            u.set("height", 500).err(),
            User::from_json(r#"{"year_born": 3000}"#).err(),
        ];
        for err in refusals.into_iter().flatten() {
            writeln!(out, "{err}")?;
        }
        Ok(())
    }
}

fn display<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "null".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(settings: &Settings) -> String {
        let mut out = Vec::new();
        OrmCommand
            .handle(&clap::ArgMatches::default(), settings, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_orm_walkthrough_output() {
        let output = run(&Settings::default());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "User ID=0",
                r#"User JSON={"id":0,"name":"Guido","surname":"Van Rossum","height":null,"year_born":null}"#,
                "User ID=5",
                "User NAME=John",
                r#"Unknown field "favourite_joke""#,
                r#"Invalid value "500" for field "height""#,
                r#"Invalid value "3000" for field "year_born""#,
            ]
        );
    }

    #[test]
    fn test_orm_pretty_json() {
        let settings = Settings {
            pretty_json: true,
            ..Settings::default()
        };
        let output = run(&settings);
        assert!(output.contains("User JSON={\n"));
        assert!(output.contains("\"surname\": \"Van Rossum\""));
    }

    #[test]
    fn test_display_helper() {
        assert_eq!(display(Some(5)), "5");
        assert_eq!(display(None::<i64>), "null");
    }
}
