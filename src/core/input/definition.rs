use serde_json::Value;

use super::list::ListDef;
use super::object::ObjectDef;
use super::optional::OptionalDef;
use super::primitives::{self, BooleanDef, ComputedDef, NumberDef, StringDef};
use super::select::{CheckboxDef, SelectDef};
use super::{Context, Session};
use crate::defaults::Defaults;
use crate::error::Result;
use crate::prompt::Outcome;

/// Description of one value to collect.
///
/// Definitions hold no state; evaluating one twice asks the same questions
/// twice. Build them with the `*_def` constructors and compose them with
/// [`object_def`](super::object_def), [`list_def`](super::list_def) and
/// [`optional_def`](super::optional_def).
#[derive(Debug, Clone)]
pub enum InputDefinition {
    Static(Value),
    Undefined,
    Computed(ComputedDef),
    String(StringDef),
    Number(NumberDef),
    Boolean(BooleanDef),
    Select(SelectDef),
    Checkbox(CheckboxDef),
    Optional(OptionalDef),
    Object(ObjectDef),
    List(ListDef),
}

impl InputDefinition {
    /// Display name used in questions and menus.
    pub fn name(&self) -> Option<&str> {
        match self {
            InputDefinition::Static(_)
            | InputDefinition::Undefined
            | InputDefinition::Computed(_) => None,
            InputDefinition::String(def) => Some(&def.name),
            InputDefinition::Number(def) => Some(&def.name),
            InputDefinition::Boolean(def) => Some(&def.name),
            InputDefinition::Select(def) => Some(&def.name),
            InputDefinition::Checkbox(def) => Some(&def.name),
            InputDefinition::Optional(def) => def.inner().name(),
            InputDefinition::Object(def) => Some(&def.name),
            InputDefinition::List(def) => Some(&def.name),
        }
    }

    /// Whether a user can ever be asked to change this value.
    pub fn is_editable(&self) -> bool {
        match self {
            InputDefinition::Static(_)
            | InputDefinition::Undefined
            | InputDefinition::Computed(_) => false,
            InputDefinition::Optional(def) => def.inner().is_editable(),
            _ => true,
        }
    }

    /// Reject misconfigured trees (empty select choices, inverted bounds,
    /// lists of uneditable items) before anything is asked.
    pub fn check(&self, settings: &Defaults) -> Result<()> {
        match self {
            InputDefinition::Static(_)
            | InputDefinition::Undefined
            | InputDefinition::Computed(_)
            | InputDefinition::String(_)
            | InputDefinition::Boolean(_)
            | InputDefinition::Checkbox(_) => Ok(()),
            InputDefinition::Number(def) => def.check(),
            InputDefinition::Select(def) => def.check(),
            InputDefinition::Optional(def) => def.inner().check(settings),
            InputDefinition::Object(def) => def.check(settings),
            InputDefinition::List(def) => def.check(settings),
        }
    }

    /// Short rendering of `value` for edit menus. `None` means the value is
    /// not offered for editing.
    pub fn summarize(&self, value: &Value, ctx: &Context, settings: &Defaults) -> Option<String> {
        let summary = match self {
            InputDefinition::Static(_)
            | InputDefinition::Undefined
            | InputDefinition::Computed(_) => return None,
            InputDefinition::String(def) => {
                crate::text::clip_to_maximum(&def.summarize(value), settings.max_item_value_length)
            }
            InputDefinition::Number(_) => primitives::plain_summary(value, settings),
            InputDefinition::Boolean(_) => BooleanDef::summarize(value),
            InputDefinition::Select(def) => def.summarize(value, ctx, settings),
            InputDefinition::Checkbox(def) => def.summarize(value, ctx, settings),
            InputDefinition::Optional(def) => return def.summarize(value, ctx, settings),
            InputDefinition::Object(def) => def.summarize(value, ctx, settings),
            InputDefinition::List(def) => def.summarize(value, ctx, settings),
        };
        Some(summary)
    }

    /// Ask for a new value.
    pub fn build_from_user_input(
        &self,
        session: &mut Session<'_>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        self.run(session, None, ctx)
    }

    /// Ask for a changed version of `original`, which seeds every default.
    pub fn update_from_user_input(
        &self,
        session: &mut Session<'_>,
        original: &Value,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        let prior = if original.is_null() { None } else { Some(original) };
        self.run(session, prior, ctx)
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        match self {
            InputDefinition::Static(value) => Ok(Outcome::Value(value.clone())),
            InputDefinition::Undefined => Ok(Outcome::Value(Value::Null)),
            InputDefinition::Computed(def) => def.run(ctx),
            InputDefinition::String(def) => def.run(session, prior, ctx),
            InputDefinition::Number(def) => def.run(session, prior),
            InputDefinition::Boolean(def) => def.run(session, prior),
            InputDefinition::Select(def) => def.run(session, prior, ctx),
            InputDefinition::Checkbox(def) => def.run(session, prior, ctx),
            InputDefinition::Optional(def) => def.run(session, prior, ctx),
            InputDefinition::Object(def) => def.run(session, prior, ctx),
            InputDefinition::List(def) => def.run(session, prior, ctx),
        }
    }

    /// Bring `current` up to date after an earlier sibling changed.
    ///
    /// `before` and `after` are the sibling contexts from before and after
    /// the change. Computed values are recomputed, conditional fields whose
    /// activation flipped are built or cleared, everything else is kept.
    pub(crate) fn refresh(
        &self,
        session: &mut Session<'_>,
        current: &Value,
        before: &Context,
        after: &Context,
    ) -> Result<Outcome<Value>> {
        match self {
            InputDefinition::Computed(def) => def.run(after),
            InputDefinition::Optional(def) => def.refresh(session, current, before, after),
            _ => Ok(Outcome::Value(current.clone())),
        }
    }
}
