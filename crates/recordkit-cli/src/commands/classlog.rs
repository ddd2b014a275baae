//! The `classlog` command.
//!
//! Declares a record type at runtime and builds an instance of it while
//! listening on the lifecycle signals, printing each event as it arrives.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, LazyLock, Mutex};

use recordkit_core::{RecordResult, Settings};
use recordkit_db::fields::FieldDef;
use recordkit_db::model::ModelMeta;
use recordkit_db::record::Record;
use recordkit_signals::{connect_logging_receivers, InstanceCreated, ModelDeclared, SIGNALS};

use crate::command::ManagementCommand;

const RECEIVER: &str = "recordkit_cli.classlog";

/// Record types declared by this command, by name.
///
/// A [`Record`] needs a `&'static ModelMeta`, so each schema is leaked once and
/// kept for the rest of the process. Later runs with the same name reuse it.
static DECLARED: LazyLock<Mutex<HashMap<String, &'static ModelMeta>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Looks up the record type called `model`, declaring it on first use.
fn declared_model(model: &str) -> RecordResult<&'static ModelMeta> {
    let mut declared = DECLARED.lock().expect("classlog registry lock poisoned");
    if let Some(meta) = declared.get(model) {
        return Ok(*meta);
    }
    let name: &'static str = Box::leak(model.to_string().into_boxed_str());
    let meta: &'static ModelMeta =
        Box::leak(Box::new(ModelMeta::try_new(name, vec![FieldDef::any("label")])?));
    declared.insert(model.to_string(), meta);
    Ok(meta)
}

/// Prints record type declarations and instance creations.
///
/// The first run for a given `--model` declares the type and prints its
/// declaration. Later runs with the same name only print the new instance.
pub struct ClasslogCommand;

impl ManagementCommand for ClasslogCommand {
    fn name(&self) -> &'static str {
        "classlog"
    }

    fn help(&self) -> &'static str {
        "Log record type declaration and instance creation"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("model")
                .long("model")
                .short('m')
                .default_value("widget")
                .help("Name of the record type to declare"),
        )
    }

    fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
        out: &mut dyn Write,
    ) -> RecordResult<()> {
        let model = matches
            .get_one::<String>("model")
            .map_or("widget", String::as_str)
            .to_string();

        connect_logging_receivers();
        let events = Arc::new(Mutex::new(Vec::new()));
        let declared = events.clone();
        let declared_name = model.clone();
        SIGNALS.model_declared.connect(
            RECEIVER,
            Arc::new(move |event: &ModelDeclared| {
                if event.model == declared_name {
                    declared
                        .lock()
                        .expect("classlog event lock poisoned")
                        .push(format!("Creating new record type: {}", event.model));
                }
            }),
        );
        let created = events.clone();
        let created_name = model.clone();
        SIGNALS.instance_created.connect(
            RECEIVER,
            Arc::new(move |event: &InstanceCreated| {
                if event.model == created_name {
                    created
                        .lock()
                        .expect("classlog event lock poisoned")
                        .push(format!("Record {} new instance", event.model));
                }
            }),
        );

        let result = declared_model(&model).map(Record::new);

        SIGNALS.model_declared.disconnect(RECEIVER);
        SIGNALS.instance_created.disconnect(RECEIVER);

        let instance = result?;
        for line in events.lock().expect("classlog event lock poisoned").iter() {
            writeln!(out, "{line}")?;
        }
        writeln!(out, "{instance:?}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classlog_output() {
        let cmd = ClasslogCommand.add_arguments(clap::Command::new("classlog"));
        let matches = cmd
            .try_get_matches_from(["classlog", "--model", "gadget"])
            .unwrap();
        let mut out = Vec::new();
        ClasslogCommand
            .handle(&matches, &Settings::default(), &mut out)
            .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            vec![
                "Creating new record type: gadget",
                "Record gadget new instance",
                "gadget { label: Null }",
            ]
        );
    }

    fn run_classlog(model: &str) -> String {
        let cmd = ClasslogCommand.add_arguments(clap::Command::new("classlog"));
        let matches = cmd
            .try_get_matches_from(["classlog", "--model", model])
            .unwrap();
        let mut out = Vec::new();
        ClasslogCommand
            .handle(&matches, &Settings::default(), &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_classlog_reuses_declared_type() {
        let first = run_classlog("sprocket");
        let second = run_classlog("sprocket");
        assert!(first.starts_with("Creating new record type: sprocket\n"));
        assert_eq!(
            second.lines().collect::<Vec<_>>(),
            vec!["Record sprocket new instance", "sprocket { label: Null }"]
        );
        assert!(std::ptr::eq(
            declared_model("sprocket").unwrap(),
            declared_model("sprocket").unwrap()
        ));
    }
}
