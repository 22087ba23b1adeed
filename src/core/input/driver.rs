//! Entry points: evaluate a root definition, optionally followed by a
//! review menu before the result is handed back.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use super::defs::{choose, edit_option, Choice, ItemAction};
use super::{Context, InputDefinition, Session};
use crate::defaults::{self, Defaults};
use crate::error::{Error, Result};
use crate::prompt::{Outcome, Prompter, YesNoPrompt};

/// Evaluate `def` with built-in settings. A `prior` value seeds every
/// question and menu, as when editing an existing item.
pub fn evaluate(
    def: &InputDefinition,
    prompter: &mut dyn Prompter,
    prior: Option<&Value>,
) -> Result<Outcome<Value>> {
    evaluate_with(def, prompter, defaults::builtin_defaults(), prior)
}

pub fn evaluate_with(
    def: &InputDefinition,
    prompter: &mut dyn Prompter,
    settings: Defaults,
    prior: Option<&Value>,
) -> Result<Outcome<Value>> {
    def.check(&settings)?;

    let mut session = Session::new(prompter, settings);
    let ctx = Context::new();
    let outcome = match prior {
        Some(prior) => def.update_from_user_input(&mut session, prior, &ctx)?,
        None => def.build_from_user_input(&mut session, &ctx)?,
    };
    if outcome.is_cancelled() {
        crate::log_status!("input", "{} cancelled", def.name().unwrap_or("input"));
    }
    Ok(outcome)
}

/// Like [`evaluate`], deserializing the produced value into `T`.
pub fn evaluate_as<T: DeserializeOwned>(
    def: &InputDefinition,
    prompter: &mut dyn Prompter,
    prior: Option<&Value>,
) -> Result<Outcome<T>> {
    match evaluate(def, prompter, prior)? {
        Outcome::Value(value) => serde_json::from_value(value)
            .map(Outcome::Value)
            .map_err(|e| {
                Error::validation_invalid_json(
                    e,
                    Some(format!("deserialize {}", def.name().unwrap_or("input"))),
                )
            }),
        Outcome::Cancelled => Ok(Outcome::Cancelled),
    }
}

// ============================================================================
// Review menu
// ============================================================================

/// Verb shown on the review menu's finish entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinishVerb {
    Create,
    #[default]
    Update,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Nothing will be sent anywhere; the finish entry says "output".
    pub dry_run: bool,
    pub verb: FinishVerb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReviewEntry {
    Action(ItemAction),
    PreviewJson,
    PreviewYaml,
}

/// Build a new value, then let the user review, preview and edit it before
/// finishing.
pub fn create_from_user_input(
    def: &InputDefinition,
    prompter: &mut dyn Prompter,
    settings: Defaults,
    options: &ReviewOptions,
) -> Result<Outcome<Value>> {
    def.check(&settings)?;
    let mut session = Session::new(prompter, settings);

    let built = match def.build_from_user_input(&mut session, &Context::new())? {
        Outcome::Value(built) => built,
        Outcome::Cancelled => {
            crate::log_status!("input", "{} cancelled", def.name().unwrap_or("input"));
            return Ok(Outcome::Cancelled);
        }
    };
    let options = ReviewOptions {
        verb: FinishVerb::Create,
        ..options.clone()
    };
    review(def, &mut session, built, &options)
}

/// Review and edit an existing value.
pub fn update_from_user_input(
    def: &InputDefinition,
    prompter: &mut dyn Prompter,
    settings: Defaults,
    previous: Value,
    options: &ReviewOptions,
) -> Result<Outcome<Value>> {
    def.check(&settings)?;
    let mut session = Session::new(prompter, settings);
    review(def, &mut session, previous, options)
}

fn review(
    def: &InputDefinition,
    session: &mut Session<'_>,
    mut value: Value,
    options: &ReviewOptions,
) -> Result<Outcome<Value>> {
    let name = def.name().unwrap_or("input").to_string();
    let ctx = Context::new();
    let verb = match (options.dry_run, options.verb) {
        (true, _) => "output",
        (false, FinishVerb::Create) => "create",
        (false, FinishVerb::Update) => "update",
    };
    let noun = match options.verb {
        FinishVerb::Create => "creation",
        FinishVerb::Update => "update",
    };

    let edit = edit_option(&name);
    let menu = vec![
        Choice::new(edit.name, ReviewEntry::Action(edit.value)),
        Choice::new("Preview JSON.", ReviewEntry::PreviewJson),
        Choice::new("Preview YAML.", ReviewEntry::PreviewYaml),
        Choice::new(
            format!("Finish and {} {}.", verb, name),
            ReviewEntry::Action(ItemAction::Finish),
        ),
        Choice::new(
            format!("Cancel {} of {}.", noun, name),
            ReviewEntry::Action(ItemAction::Cancel),
        ),
    ];

    loop {
        if final_problem(def, &value).is_some() {
            // The object's edit loop reports the problem and only finishes
            // once it is fixed.
            match def.update_from_user_input(session, &value, &ctx)? {
                Outcome::Value(updated) => value = updated,
                Outcome::Cancelled => return Ok(cancelled(&name)),
            }
            continue;
        }

        let entry = choose(
            session.prompter(),
            "Choose an action.",
            &menu,
            Some(&ReviewEntry::Action(ItemAction::Finish)),
        )?;
        let rendered = match entry {
            Outcome::Value(ReviewEntry::Action(ItemAction::Edit)) => {
                if let Outcome::Value(updated) = def.update_from_user_input(session, &value, &ctx)? {
                    value = updated;
                }
                continue;
            }
            Outcome::Value(ReviewEntry::PreviewJson) => {
                render_json(&value, session.settings().json_indent)?
            }
            Outcome::Value(ReviewEntry::PreviewYaml) => render_yaml(&value)?,
            Outcome::Value(ReviewEntry::Action(ItemAction::Finish)) => {
                return Ok(Outcome::Value(value))
            }
            Outcome::Value(ReviewEntry::Action(_)) | Outcome::Cancelled => {
                return Ok(cancelled(&name))
            }
        };

        let prompt = YesNoPrompt {
            question: format!("{}\n\nWould you like to edit further?", rendered),
            default: false,
        };
        if let Outcome::Value(true) = session.prompter().confirm(&prompt)? {
            if let Outcome::Value(updated) = def.update_from_user_input(session, &value, &ctx)? {
                value = updated;
            }
        }
    }
}

fn final_problem(def: &InputDefinition, value: &Value) -> Option<String> {
    match (def, value) {
        (InputDefinition::Object(object), Value::Object(map)) => {
            object.final_problem(map, &Context::new())
        }
        _ => None,
    }
}

fn cancelled(name: &str) -> Outcome<Value> {
    crate::log_status!("input", "{} cancelled", name);
    Outcome::Cancelled
}

/// Pretty JSON with `indent` spaces per level.
pub fn render_json(value: &Value, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::internal_json(e.to_string(), Some("render JSON preview".to_string())))?;
    String::from_utf8(out)
        .map_err(|e| Error::internal_unexpected(format!("JSON preview is not UTF-8: {}", e)))
}

pub fn render_yaml(value: &Value) -> Result<String> {
    serde_yml::to_string(value)
        .map_err(|e| Error::internal_json(e.to_string(), Some("render YAML preview".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::input::{boolean_def, list_def, object_def, select_def, string_def};
    use crate::prompt::{Answer, ScriptedPrompter, TerminalPrompter};
    use serde_json::json;

    fn device() -> InputDefinition {
        object_def("Device")
            .field("label", string_def("Label"))
            .field("enabled", boolean_def("Enabled"))
            .into()
    }

    #[test]
    fn evaluate_builds_from_scratch() {
        let mut prompter = ScriptedPrompter::new([Answer::text("lamp"), Answer::Confirm(false)]);
        let result = evaluate(&device(), &mut prompter, None).unwrap();
        assert_eq!(result, Outcome::Value(json!({"label": "lamp", "enabled": false})));
    }

    #[test]
    fn evaluate_with_prior_opens_edit_menu() {
        let prior = json!({"label": "lamp", "enabled": true});
        let mut prompter = ScriptedPrompter::new([Answer::label("Finish editing Device.")]);
        let result = evaluate(&device(), &mut prompter, Some(&prior)).unwrap();
        assert_eq!(result, Outcome::Value(prior));
    }

    #[test]
    fn configuration_errors_fail_before_any_prompt() {
        let def: InputDefinition = list_def("Names", string_def("Name"))
            .min_items(2)
            .max_items(1)
            .into();
        let mut prompter = ScriptedPrompter::new([]);
        let err = evaluate(&def, &mut prompter, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::DefinitionInvalid);
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn evaluate_as_deserializes() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Device {
            label: String,
            enabled: bool,
        }
        let mut prompter = ScriptedPrompter::new([Answer::text("lamp"), Answer::text("")]);
        let device = evaluate_as::<Device>(&device(), &mut prompter, None).unwrap();
        assert_eq!(
            device,
            Outcome::Value(Device {
                label: "lamp".to_string(),
                enabled: true
            })
        );
    }

    #[test]
    fn non_interactive_uses_defaults_or_fails() {
        let def: InputDefinition = select_def("Hosting Type", ["lambda", "webhook"])
            .default_value("webhook")
            .into();
        let mut prompter = TerminalPrompter::non_interactive();
        assert_eq!(
            evaluate(&def, &mut prompter, None).unwrap(),
            Outcome::Value(json!("webhook"))
        );

        let def: InputDefinition = string_def("Name").into();
        assert!(evaluate(&def, &mut prompter, None).is_err());
    }

    #[test]
    fn create_review_menu_and_finish() {
        let mut prompter = ScriptedPrompter::new([
            Answer::text("lamp"),
            Answer::text(""),
            Answer::label("Finish and create Device."),
        ]);
        let result = create_from_user_input(
            &device(),
            &mut prompter,
            Defaults::default(),
            &ReviewOptions::default(),
        )
        .unwrap();
        assert_eq!(result, Outcome::Value(json!({"label": "lamp", "enabled": true})));

        let review = &prompter.asked()[2];
        assert_eq!(review.question, "Choose an action.");
        assert_eq!(
            review.options,
            [
                "Edit Device.",
                "Preview JSON.",
                "Preview YAML.",
                "Finish and create Device.",
                "Cancel creation of Device.",
            ]
        );
    }

    #[test]
    fn dry_run_says_output() {
        let mut prompter = ScriptedPrompter::new([Answer::label("Finish and output Device.")]);
        let result = update_from_user_input(
            &device(),
            &mut prompter,
            Defaults::default(),
            json!({"label": "lamp", "enabled": true}),
            &ReviewOptions {
                dry_run: true,
                ..ReviewOptions::default()
            },
        )
        .unwrap();
        assert!(!result.is_cancelled());
        assert!(prompter.asked()[0].options.contains(&"Cancel update of Device.".to_string()));
    }

    #[test]
    fn preview_then_edit_further() {
        let mut prompter = ScriptedPrompter::new([
            Answer::label("Preview JSON."),
            Answer::Confirm(true),
            Answer::label("Edit Label: lamp"),
            Answer::text("bulb"),
            Answer::label("Finish editing Device."),
            Answer::label("Preview YAML."),
            Answer::Confirm(false),
            Answer::label("Finish and update Device."),
        ]);
        let result = update_from_user_input(
            &device(),
            &mut prompter,
            Defaults::default(),
            json!({"label": "lamp", "enabled": true}),
            &ReviewOptions::default(),
        )
        .unwrap();
        assert_eq!(result, Outcome::Value(json!({"label": "bulb", "enabled": true})));

        let json_preview = &prompter.asked()[1].question;
        assert!(json_preview.starts_with("{\n    \"enabled\": true,\n    \"label\": \"lamp\""));
        assert!(json_preview.ends_with("\n\nWould you like to edit further?"));
        let yaml_preview = &prompter.asked()[6].question;
        assert!(yaml_preview.contains("label: bulb\n"));
    }

    #[test]
    fn review_cancel() {
        let mut prompter = ScriptedPrompter::new([Answer::label("Cancel update of Device.")]);
        let result = update_from_user_input(
            &device(),
            &mut prompter,
            Defaults::default(),
            json!({"label": "lamp", "enabled": true}),
            &ReviewOptions::default(),
        )
        .unwrap();
        assert!(result.is_cancelled());
    }

    #[test]
    fn render_json_respects_indent() {
        assert_eq!(render_json(&json!({"a": 1}), 2).unwrap(), "{\n  \"a\": 1\n}");
    }
}
