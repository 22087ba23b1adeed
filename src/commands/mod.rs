use serde::Serialize;
use serde_json::Value;

use item_input::defaults::{self, Defaults};
use item_input::input::{self, ReviewOptions};
use item_input::{InputDefinition, Outcome, TerminalPrompter};

pub type CmdResult<T> = item_input::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    pub non_interactive: bool,
}

impl GlobalArgs {
    pub fn prompter(&self) -> TerminalPrompter {
        if self.non_interactive {
            TerminalPrompter::non_interactive()
        } else {
            TerminalPrompter::new()
        }
    }
}

/// What a form command prints. A cancelled form is a successful run with
/// `{"cancelled": true}` as its data.
#[derive(Debug, Serialize)]
pub struct FormOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl FormOutput {
    fn from_outcome(command: &str, outcome: Outcome<Value>, dry_run: bool) -> Self {
        match outcome {
            Outcome::Value(value) => Self {
                command: Some(command.to_string()),
                value: Some(value),
                dry_run,
                cancelled: false,
            },
            Outcome::Cancelled => Self {
                command: None,
                value: None,
                dry_run: false,
                cancelled: true,
            },
        }
    }
}

/// Run `def` through the create or update review flow and wrap the result.
pub(crate) fn run_form(
    command: &str,
    def: &InputDefinition,
    prior: Option<Value>,
    dry_run: bool,
    global: &GlobalArgs,
) -> CmdResult<FormOutput> {
    let settings: Defaults = defaults::load_defaults();
    let mut prompter = global.prompter();
    let options = ReviewOptions {
        dry_run,
        ..ReviewOptions::default()
    };

    let outcome = match prior {
        Some(prior) => input::update_from_user_input(def, &mut prompter, settings, prior, &options)?,
        None => input::create_from_user_input(def, &mut prompter, settings, &options)?,
    };
    Ok((FormOutput::from_outcome(command, outcome, dry_run), 0))
}

// ============================================================================
// Prior values (CLI layer)
// ============================================================================

/// Read a prior value from inline JSON or `@path` (with `~` expansion).
pub(crate) fn read_prior(spec: &str) -> item_input::Result<Value> {
    let raw = match spec.strip_prefix('@') {
        Some(path) => {
            if path.trim().is_empty() {
                return Err(item_input::Error::validation_invalid_argument(
                    "from",
                    "Invalid JSON spec '@' (missing file path)",
                    None,
                    None,
                ));
            }
            let path = item_input::paths::expand(path)?;
            std::fs::read_to_string(&path).map_err(|e| {
                item_input::Error::internal_io(
                    e.to_string(),
                    Some(format!("read {}", path.display())),
                )
            })?
        }
        None => spec.to_string(),
    };

    let value: Value = serde_json::from_str(&raw).map_err(|e| {
        item_input::Error::validation_invalid_json(e, Some("parse prior value".to_string()))
    })?;
    if !value.is_object() {
        return Err(item_input::Error::validation_invalid_argument(
            "from",
            "Prior value must be a JSON object",
            None,
            None,
        ));
    }
    Ok(value)
}

pub mod config;
pub mod oauth_app;
pub mod schema_app;

/// Dispatch a command to its handler and wrap the result for printing.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::Reply::from_cmd($module::run($args, $global))
    };
}

pub(crate) fn execute(command: crate::Commands, global: &GlobalArgs) -> crate::output::Reply {
    match command {
        crate::Commands::SchemaApp(args) => dispatch!(args, global, schema_app),
        crate::Commands::OauthApp(args) => dispatch!(args, global, oauth_app),
        crate::Commands::Config(args) => dispatch!(args, global, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_output_is_just_the_flag() {
        let output = FormOutput::from_outcome("schema-app", Outcome::Cancelled, true);
        assert_eq!(
            serde_json::to_value(output).unwrap(),
            serde_json::json!({"cancelled": true})
        );
    }

    #[test]
    fn read_prior_inline_and_file() {
        let value = read_prior(r#"{"displayName": "Demo"}"#).unwrap();
        assert_eq!(value["displayName"], "Demo");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prior.json");
        std::fs::write(&path, r#"{"hostingType": "lambda"}"#).unwrap();
        let value = read_prior(&format!("@{}", path.display())).unwrap();
        assert_eq!(value["hostingType"], "lambda");

        assert!(read_prior("[1, 2]").is_err());
        assert!(read_prior("@").is_err());
    }
}
