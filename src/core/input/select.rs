//! Single- and multi-choice definitions over a list of labeled values.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::defs::{cancel_option, choose, help_option, Choice, ItemAction};
use super::{primitives, ChoicesFn, Context, InputDefinition, Session, SummarizeFn};
use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::prompt::{MultiSelectPrompt, Outcome, SelectOption};
use crate::text;
use crate::validation::Validation;

/// Where a selection's choices come from.
#[derive(Clone)]
pub enum ChoiceSource {
    Fixed(Vec<Choice<Value>>),
    /// Computed when the question is asked, e.g. from data fetched by the
    /// caller. A failure fails the whole evaluation.
    Lazy(ChoicesFn),
}

impl ChoiceSource {
    fn resolve(&self, name: &str, ctx: &Context) -> Result<Vec<Choice<Value>>> {
        let choices = match self {
            ChoiceSource::Fixed(choices) => choices.clone(),
            ChoiceSource::Lazy(load) => {
                load(ctx).map_err(|e| Error::choices_unavailable(name, e.to_string()))?
            }
        };
        Ok(choices)
    }

    /// Choices for display only; lazy sources that fail render nothing.
    fn peek(&self, ctx: &Context) -> Vec<Choice<Value>> {
        match self {
            ChoiceSource::Fixed(choices) => choices.clone(),
            ChoiceSource::Lazy(load) => load(ctx).unwrap_or_default(),
        }
    }
}

impl fmt::Debug for ChoiceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceSource::Fixed(choices) => f.debug_tuple("Fixed").field(choices).finish(),
            ChoiceSource::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

fn name_of(choices: &[Choice<Value>], value: &Value) -> Option<String> {
    choices
        .iter()
        .find(|c| &c.value == value)
        .map(|c| c.name.clone())
}

// ============================================================================
// Select
// ============================================================================

/// Pick exactly one of `choices`, presented in the order given.
pub fn select_def<I, C>(name: impl Into<String>, choices: I) -> SelectDef
where
    I: IntoIterator<Item = C>,
    C: Into<Choice<Value>>,
{
    SelectDef::new(
        name,
        ChoiceSource::Fixed(choices.into_iter().map(Into::into).collect()),
    )
}

/// Like [`select_def`], with choices computed when the question is asked.
pub fn lazy_select_def<F>(name: impl Into<String>, load: F) -> SelectDef
where
    F: Fn(&Context) -> Result<Vec<Choice<Value>>> + Send + Sync + 'static,
{
    SelectDef::new(name, ChoiceSource::Lazy(Arc::new(load)))
}

/// Pick one of a list of plain strings.
pub fn list_selection_def<I, S>(name: impl Into<String>, items: I) -> SelectDef
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let choices = items
        .into_iter()
        .map(|item| {
            let item = item.into();
            Choice::new(item.clone(), Value::String(item))
        })
        .collect();
    SelectDef::new(name, ChoiceSource::Fixed(choices))
}

#[derive(Clone)]
pub struct SelectDef {
    pub(crate) name: String,
    choices: ChoiceSource,
    default: Option<Value>,
    help_text: Option<String>,
    summarize: Option<SummarizeFn>,
}

#[derive(Debug, Clone, PartialEq)]
enum SelectEntry {
    Choice(usize),
    Action(ItemAction),
}

impl SelectDef {
    fn new(name: impl Into<String>, choices: ChoiceSource) -> Self {
        Self {
            name: name.into(),
            choices,
            default: None,
            help_text: None,
            summarize: None,
        }
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn summarize_with<F>(mut self, summarize: F) -> Self
    where
        F: Fn(&Value, &Context) -> String + Send + Sync + 'static,
    {
        self.summarize = Some(Arc::new(summarize));
        self
    }

    pub(crate) fn check(&self) -> Result<()> {
        match &self.choices {
            ChoiceSource::Fixed(choices) if choices.is_empty() => {
                Err(Error::definition_invalid(&self.name, "no choices available"))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        let choices = self.choices.resolve(&self.name, ctx)?;
        if choices.is_empty() {
            return Err(Error::definition_invalid(&self.name, "no choices available")
                .with_hint("Use choose_def to fall back to a static or absent value"));
        }

        let mut menu: Vec<Choice<SelectEntry>> = choices
            .iter()
            .enumerate()
            .map(|(i, c)| Choice::new(c.name.clone(), SelectEntry::Choice(i)))
            .collect();
        if self.help_text.is_some() {
            let help = help_option();
            menu.push(Choice::new(help.name, SelectEntry::Action(help.value)));
        }
        let cancel = cancel_option();
        menu.push(Choice::new(cancel.name, SelectEntry::Action(cancel.value)));

        let selected = prior.or(self.default.as_ref());
        let default_index = selected
            .and_then(|v| choices.iter().position(|c| &c.value == v))
            .unwrap_or(0);
        let question = format!("Select {}.", self.name);

        loop {
            let entry = choose(
                session.prompter(),
                &question,
                &menu,
                Some(&SelectEntry::Choice(default_index)),
            )?;
            match entry {
                Outcome::Value(SelectEntry::Choice(i)) => {
                    return Ok(Outcome::Value(choices[i].value.clone()))
                }
                Outcome::Value(SelectEntry::Action(ItemAction::Help)) => {
                    if let Some(help) = &self.help_text {
                        session.message(help);
                    }
                }
                Outcome::Value(SelectEntry::Action(_)) | Outcome::Cancelled => {
                    return Ok(Outcome::Cancelled)
                }
            }
        }
    }

    pub(crate) fn summarize(&self, value: &Value, ctx: &Context, settings: &Defaults) -> String {
        if let Some(summarize) = &self.summarize {
            return summarize(value, ctx);
        }
        match name_of(&self.choices.peek(ctx), value) {
            Some(name) => text::clip_to_maximum(&name, settings.max_item_value_length),
            None => primitives::plain_summary(value, settings),
        }
    }
}

impl fmt::Debug for SelectDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectDef")
            .field("name", &self.name)
            .field("choices", &self.choices)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl From<SelectDef> for InputDefinition {
    fn from(def: SelectDef) -> Self {
        InputDefinition::Select(def)
    }
}

// ============================================================================
// Checkbox
// ============================================================================

/// Pick any subset of `choices`. Produces the chosen values in choice order.
pub fn checkbox_def<I, C>(name: impl Into<String>, choices: I) -> CheckboxDef
where
    I: IntoIterator<Item = C>,
    C: Into<Choice<Value>>,
{
    CheckboxDef {
        name: name.into(),
        choices: ChoiceSource::Fixed(choices.into_iter().map(Into::into).collect()),
        default: Vec::new(),
        validate: None,
        summarize: None,
    }
}

pub fn lazy_checkbox_def<F>(name: impl Into<String>, load: F) -> CheckboxDef
where
    F: Fn(&Context) -> Result<Vec<Choice<Value>>> + Send + Sync + 'static,
{
    CheckboxDef {
        name: name.into(),
        choices: ChoiceSource::Lazy(Arc::new(load)),
        default: Vec::new(),
        validate: None,
        summarize: None,
    }
}

#[derive(Clone)]
pub struct CheckboxDef {
    pub(crate) name: String,
    choices: ChoiceSource,
    default: Vec<Value>,
    validate: Option<Arc<dyn Fn(&[Value]) -> Validation + Send + Sync>>,
    summarize: Option<SummarizeFn>,
}

impl CheckboxDef {
    /// Values checked when nothing was chosen before.
    pub fn default_values<I: IntoIterator<Item = Value>>(mut self, values: I) -> Self {
        self.default = values.into_iter().collect();
        self
    }

    pub fn validate<F>(mut self, validate: F) -> Self
    where
        F: Fn(&[Value]) -> Validation + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    pub fn summarize_with<F>(mut self, summarize: F) -> Self
    where
        F: Fn(&Value, &Context) -> String + Send + Sync + 'static,
    {
        self.summarize = Some(Arc::new(summarize));
        self
    }

    /// An empty choice set is allowed; `validate` decides whether the empty
    /// selection is acceptable.
    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        let choices = self.choices.resolve(&self.name, ctx)?;
        let current: Vec<Value> = match prior.and_then(Value::as_array) {
            Some(values) => values.clone(),
            None => self.default.clone(),
        };

        let mut prompt = MultiSelectPrompt {
            question: format!("Select {}.", self.name),
            options: choices.iter().map(|c| SelectOption::new(&c.name)).collect(),
            checked: choices
                .iter()
                .enumerate()
                .filter(|(_, c)| current.contains(&c.value))
                .map(|(i, _)| i)
                .collect(),
        };

        loop {
            let indices = match session.prompter().multi_select(&prompt)? {
                Outcome::Value(indices) => indices,
                Outcome::Cancelled => return Ok(Outcome::Cancelled),
            };
            let mut indices: Vec<usize> = indices.into_iter().filter(|i| *i < choices.len()).collect();
            indices.sort_unstable();
            indices.dedup();
            let selected: Vec<Value> = indices.iter().map(|i| choices[*i].value.clone()).collect();

            if let Some(validate) = &self.validate {
                if let Validation::Invalid(message) = validate(&selected) {
                    session.reject(&self.name, &message)?;
                    prompt.checked = indices;
                    continue;
                }
            }
            return Ok(Outcome::Value(Value::Array(selected)));
        }
    }

    pub(crate) fn summarize(&self, value: &Value, ctx: &Context, settings: &Defaults) -> String {
        if let Some(summarize) = &self.summarize {
            return summarize(value, ctx);
        }
        let choices = self.choices.peek(ctx);
        let names: Vec<String> = value
            .as_array()
            .map(|values| {
                values
                    .iter()
                    .map(|v| name_of(&choices, v).unwrap_or_else(|| text::string_from_value(v)))
                    .collect()
            })
            .unwrap_or_default();
        text::clip_to_maximum(&names.join(", "), settings.max_item_value_length)
    }
}

impl fmt::Debug for CheckboxDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxDef")
            .field("name", &self.name)
            .field("choices", &self.choices)
            .field("default", &self.default)
            .finish_non_exhaustive()
    }
}

impl From<CheckboxDef> for InputDefinition {
    fn from(def: CheckboxDef) -> Self {
        InputDefinition::Checkbox(def)
    }
}

// ============================================================================
// Size-driven selection
// ============================================================================

/// What [`choose_def`] does when there is nothing to choose from.
#[derive(Debug, Clone, PartialEq)]
pub enum EmptyChoices {
    /// The field is absent.
    Absent,
    /// Evaluation can't continue; the caller gets a `definition.invalid`
    /// error before anything is asked.
    Fail,
    /// Use this value instead.
    Fallback(Value),
}

/// Pick the cheapest definition for a list of candidates: nothing to ask
/// when there are zero or one, a select otherwise.
pub fn choose_def(
    name: impl Into<String>,
    choices: Vec<Choice<Value>>,
    empty: EmptyChoices,
) -> Result<InputDefinition> {
    let name = name.into();
    match choices.len() {
        0 => match empty {
            EmptyChoices::Absent => Ok(InputDefinition::Undefined),
            EmptyChoices::Fallback(value) => Ok(InputDefinition::Static(value)),
            EmptyChoices::Fail => Err(Error::definition_invalid(
                &name,
                format!("no {} found", name.to_lowercase()),
            )),
        },
        1 => Ok(InputDefinition::Static(choices[0].value.clone())),
        _ => Ok(InputDefinition::Select(SelectDef::new(
            name,
            ChoiceSource::Fixed(choices),
        ))),
    }
}
