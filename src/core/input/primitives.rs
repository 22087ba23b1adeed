//! Leaf definitions: fixed, absent, computed, text, number and boolean values.

use serde_json::{Number, Value};
use std::fmt;
use std::sync::Arc;

use super::{ComputeFn, Context, InputDefinition, Session, ValidateFn};
use crate::defaults::Defaults;
use crate::error::Result;
use crate::prompt::{Outcome, TextPrompt, YesNoPrompt};
use crate::validation::Validation;

const REQUIRED_MESSAGE: &str = "value is required";

/// A value known without asking. The user is never prompted or notified.
pub fn static_def(value: impl Into<Value>) -> InputDefinition {
    InputDefinition::Static(value.into())
}

/// Always absent. Used for fields that don't apply in the current setting.
pub fn undefined_def() -> InputDefinition {
    InputDefinition::Undefined
}

/// A value derived from already-collected values, never prompted for.
pub fn computed_def<F>(compute: F) -> InputDefinition
where
    F: Fn(&Context) -> Result<Value> + Send + Sync + 'static,
{
    InputDefinition::Computed(ComputedDef {
        compute: Arc::new(compute),
    })
}

#[derive(Clone)]
pub struct ComputedDef {
    pub(crate) compute: ComputeFn,
}

impl ComputedDef {
    pub(crate) fn run(&self, ctx: &Context) -> Result<Outcome<Value>> {
        Ok(Outcome::Value((self.compute)(ctx)?))
    }
}

impl fmt::Debug for ComputedDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComputedDef").finish_non_exhaustive()
    }
}

/// Default for a text answer: fixed, or derived from context.
#[derive(Clone)]
pub enum DefaultText {
    Literal(String),
    Computed(Arc<dyn Fn(&Context) -> String + Send + Sync>),
}

impl DefaultText {
    fn resolve(&self, ctx: &Context) -> String {
        match self {
            DefaultText::Literal(text) => text.clone(),
            DefaultText::Computed(compute) => compute(ctx),
        }
    }
}

// ============================================================================
// Strings
// ============================================================================

pub fn string_def(name: impl Into<String>) -> StringDef {
    StringDef::new(name, false)
}

/// An empty answer produces the absent value.
pub fn optional_string_def(name: impl Into<String>) -> StringDef {
    StringDef::new(name, true)
}

#[derive(Clone)]
pub struct StringDef {
    pub(crate) name: String,
    optional: bool,
    default: Option<DefaultText>,
    validate: Option<ValidateFn>,
    help_text: Option<String>,
}

impl StringDef {
    fn new(name: impl Into<String>, optional: bool) -> Self {
        Self {
            name: name.into(),
            optional,
            default: None,
            validate: None,
            help_text: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(DefaultText::Literal(value.into()));
        self
    }

    pub fn default_with<F>(mut self, compute: F) -> Self
    where
        F: Fn(&Context) -> String + Send + Sync + 'static,
    {
        self.default = Some(DefaultText::Computed(Arc::new(compute)));
        self
    }

    /// Validator that also sees the context.
    pub fn validate_with<F>(mut self, validate: F) -> Self
    where
        F: Fn(&str, &Context) -> Validation + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    pub fn validate<F>(self, validate: F) -> Self
    where
        F: Fn(&str) -> Validation + Send + Sync + 'static,
    {
        self.validate_with(move |input, _| validate(input))
    }

    /// Answering `?` shows this text and asks again.
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    fn question(&self) -> String {
        let mut question = self.name.clone();
        if self.optional {
            question.push_str(" (optional)");
        }
        if self.help_text.is_some() {
            question.push_str(" (? for help)");
        }
        question
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        let default = match prior.and_then(Value::as_str) {
            Some(original) => Some(original.to_string()),
            None => self.default.as_ref().map(|d| d.resolve(ctx)),
        };
        let prompt = TextPrompt {
            question: self.question(),
            default,
        };

        loop {
            let entered = match session.prompter().text(&prompt)? {
                Outcome::Value(entered) => entered,
                Outcome::Cancelled => return Ok(Outcome::Cancelled),
            };

            if let Some(help) = &self.help_text {
                if entered == "?" {
                    session.message(help);
                    continue;
                }
            }

            if entered.is_empty() {
                if self.optional {
                    return Ok(Outcome::Value(Value::Null));
                }
                session.reject(&self.name, REQUIRED_MESSAGE)?;
                continue;
            }

            if let Some(validate) = &self.validate {
                if let Validation::Invalid(message) = validate(&entered, ctx) {
                    session.reject(&self.name, &message)?;
                    continue;
                }
            }

            return Ok(Outcome::Value(Value::String(entered)));
        }
    }

    pub(crate) fn summarize(&self, value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => crate::text::string_from_value(other),
        }
    }
}

impl fmt::Debug for StringDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringDef")
            .field("name", &self.name)
            .field("optional", &self.optional)
            .field("help_text", &self.help_text)
            .finish_non_exhaustive()
    }
}

impl From<StringDef> for InputDefinition {
    fn from(def: StringDef) -> Self {
        InputDefinition::String(def)
    }
}

// ============================================================================
// Numbers
// ============================================================================

pub fn integer_def(name: impl Into<String>) -> NumberDef {
    NumberDef::new(name, true, false)
}

pub fn optional_integer_def(name: impl Into<String>) -> NumberDef {
    NumberDef::new(name, true, true)
}

pub fn number_def(name: impl Into<String>) -> NumberDef {
    NumberDef::new(name, false, false)
}

pub fn optional_number_def(name: impl Into<String>) -> NumberDef {
    NumberDef::new(name, false, true)
}

#[derive(Debug, Clone)]
pub struct NumberDef {
    pub(crate) name: String,
    integer: bool,
    optional: bool,
    min: Option<f64>,
    max: Option<f64>,
    default: Option<f64>,
    help_text: Option<String>,
}

impl NumberDef {
    fn new(name: impl Into<String>, integer: bool, optional: bool) -> Self {
        Self {
            name: name.into(),
            integer,
            optional,
            min: None,
            max: None,
            default: None,
            help_text: None,
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn default_value(mut self, value: f64) -> Self {
        self.default = Some(value);
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub(crate) fn check(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if max < min {
                return Err(crate::Error::definition_invalid(&self.name, "max must be >= min"));
            }
        }
        Ok(())
    }

    /// Parse and range-check one answer.
    fn parse(&self, entered: &str) -> std::result::Result<Value, String> {
        let (as_f64, value) = if self.integer {
            let parsed: i64 = entered
                .parse()
                .map_err(|_| format!("{} is not a valid integer", entered))?;
            (parsed as f64, Value::from(parsed))
        } else {
            let parsed: f64 = entered
                .parse()
                .ok()
                .filter(|n: &f64| n.is_finite())
                .ok_or_else(|| format!("{} is not a valid number", entered))?;
            let number = Number::from_f64(parsed)
                .ok_or_else(|| format!("{} is not a valid number", entered))?;
            (parsed, Value::Number(number))
        };

        if let Some(min) = self.min {
            if as_f64 < min {
                return Err(format!("must be no less than {}", min));
            }
        }
        if let Some(max) = self.max {
            if as_f64 > max {
                return Err(format!("must be no more than {}", max));
            }
        }
        Ok(value)
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
    ) -> Result<Outcome<Value>> {
        let default = prior
            .filter(|v| v.is_number())
            .map(|v| v.to_string())
            .or_else(|| self.default.map(|d| d.to_string()));
        let mut question = self.name.clone();
        if self.optional {
            question.push_str(" (optional)");
        }
        if self.help_text.is_some() {
            question.push_str(" (? for help)");
        }
        let prompt = TextPrompt { question, default };

        loop {
            let entered = match session.prompter().text(&prompt)? {
                Outcome::Value(entered) => entered,
                Outcome::Cancelled => return Ok(Outcome::Cancelled),
            };
            let entered = entered.trim();

            if let Some(help) = &self.help_text {
                if entered == "?" {
                    session.message(help);
                    continue;
                }
            }

            if entered.is_empty() {
                if self.optional {
                    return Ok(Outcome::Value(Value::Null));
                }
                session.reject(&self.name, REQUIRED_MESSAGE)?;
                continue;
            }

            match self.parse(entered) {
                Ok(value) => return Ok(Outcome::Value(value)),
                Err(message) => session.reject(&self.name, &message)?,
            }
        }
    }
}

impl From<NumberDef> for InputDefinition {
    fn from(def: NumberDef) -> Self {
        InputDefinition::Number(def)
    }
}

// ============================================================================
// Booleans
// ============================================================================

pub fn boolean_def(name: impl Into<String>) -> BooleanDef {
    BooleanDef {
        name: name.into(),
        default: None,
    }
}

#[derive(Debug, Clone)]
pub struct BooleanDef {
    pub(crate) name: String,
    default: Option<bool>,
}

impl BooleanDef {
    pub fn default_value(mut self, value: bool) -> Self {
        self.default = Some(value);
        self
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
    ) -> Result<Outcome<Value>> {
        let default = prior
            .and_then(Value::as_bool)
            .or(self.default)
            .unwrap_or(session.settings().boolean_default);
        let prompt = YesNoPrompt {
            question: self.name.clone(),
            default,
        };
        Ok(session.prompter().confirm(&prompt)?.map(Value::Bool))
    }

    pub(crate) fn summarize(value: &Value) -> String {
        match value.as_bool() {
            Some(true) => "Yes".to_string(),
            Some(false) => "No".to_string(),
            None => crate::text::string_from_value(value),
        }
    }
}

impl From<BooleanDef> for InputDefinition {
    fn from(def: BooleanDef) -> Self {
        InputDefinition::Boolean(def)
    }
}

/// Summary for values that render as themselves, clipped.
pub(crate) fn plain_summary(value: &Value, settings: &Defaults) -> String {
    crate::text::clip_to_maximum(
        &crate::text::string_from_value(value),
        settings.max_item_value_length,
    )
}
