//! Objects: a fixed set of named fields asked in declaration order.

use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

use super::defs::{cancel_option, choose, finish_option, help_option, Choice, ItemAction};
use super::{Context, InputDefinition, ObjectValidateFn, Session, SummarizeFn};
use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::prompt::Outcome;
use crate::text;
use crate::validation::Validation;

pub fn object_def(name: impl Into<String>) -> ObjectDef {
    ObjectDef {
        name: name.into(),
        fields: Vec::new(),
        summarize: None,
        validate_final: None,
        help_text: None,
    }
}

#[derive(Clone)]
pub struct ObjectDef {
    pub(crate) name: String,
    fields: Vec<(String, InputDefinition)>,
    summarize: Option<SummarizeFn>,
    validate_final: Option<ObjectValidateFn>,
    help_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum EditEntry {
    Field(usize),
    Action(ItemAction),
}

impl ObjectDef {
    /// Append a field. Fields are asked in the order they are added.
    pub fn field(mut self, key: impl Into<String>, def: impl Into<InputDefinition>) -> Self {
        self.fields.push((key.into(), def.into()));
        self
    }

    pub fn summarize_with<F>(mut self, summarize: F) -> Self
    where
        F: Fn(&Value, &Context) -> String + Send + Sync + 'static,
    {
        self.summarize = Some(Arc::new(summarize));
        self
    }

    /// Whole-object check run when the user finishes. Failures are shown and
    /// the edit menu comes back.
    pub fn validate_final<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Map<String, Value>, &Context) -> Validation + Send + Sync + 'static,
    {
        self.validate_final = Some(Arc::new(validate));
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &InputDefinition)> {
        self.fields.iter().map(|(key, def)| (key.as_str(), def))
    }

    pub(crate) fn check(&self, settings: &Defaults) -> Result<()> {
        for (i, (key, def)) in self.fields.iter().enumerate() {
            if self.fields[..i].iter().any(|(earlier, _)| earlier == key) {
                return Err(Error::definition_invalid(
                    &self.name,
                    format!("field '{}' is defined twice", key),
                ));
            }
            def.check(settings)?;
        }
        Ok(())
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        let object = match prior.and_then(Value::as_object) {
            Some(original) => original.clone(),
            None => match self.build(session, ctx)? {
                Outcome::Value(built) => {
                    if self.final_problem(&built, ctx).is_none() {
                        return Ok(Outcome::Value(Value::Object(built)));
                    }
                    built
                }
                Outcome::Cancelled => return Ok(Outcome::Cancelled),
            },
        };
        self.edit(session, object, ctx)
    }

    fn build(&self, session: &mut Session<'_>, ctx: &Context) -> Result<Outcome<Map<String, Value>>> {
        if let Some(help) = &self.help_text {
            session.message(help);
        }

        let mut partial = Map::new();
        for (key, def) in &self.fields {
            let child_ctx = ctx.with_parent(Value::Object(partial.clone()));
            match def.build_from_user_input(session, &child_ctx)? {
                Outcome::Value(value) => set_field(&mut partial, key, value),
                Outcome::Cancelled => return Ok(Outcome::Cancelled),
            }
        }
        Ok(Outcome::Value(partial))
    }

    pub(crate) fn final_problem(&self, object: &Map<String, Value>, ctx: &Context) -> Option<String> {
        match self.validate_final.as_ref().map(|validate| validate(object, ctx)) {
            Some(Validation::Invalid(message)) => Some(message),
            _ => None,
        }
    }

    fn edit(
        &self,
        session: &mut Session<'_>,
        mut updated: Map<String, Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        // A value that failed final validation on build is reported first.
        if let Some(problem) = self.final_problem(&updated, ctx) {
            session.reject(&self.name, &problem)?;
        }

        loop {
            let child_ctx = ctx.with_parent(Value::Object(updated.clone()));
            let menu = self.edit_menu(&updated, &child_ctx, session.settings());

            let entry = choose(
                session.prompter(),
                &self.name,
                &menu,
                Some(&EditEntry::Action(ItemAction::Finish)),
            )?;
            match entry {
                Outcome::Value(EditEntry::Field(i)) => {
                    let (key, def) = &self.fields[i];
                    let current = updated.get(key).cloned().unwrap_or(Value::Null);
                    let edited = match def.update_from_user_input(session, &current, &child_ctx)? {
                        Outcome::Value(edited) => edited,
                        Outcome::Cancelled => continue,
                    };
                    if edited != current {
                        set_field(&mut updated, key, edited);
                        self.refresh_after(session, i, &mut updated, &child_ctx, ctx)?;
                    }
                }
                Outcome::Value(EditEntry::Action(ItemAction::Finish)) => {
                    match self.final_problem(&updated, ctx) {
                        None => return Ok(Outcome::Value(Value::Object(updated))),
                        Some(problem) => session.reject(&self.name, &problem)?,
                    }
                }
                Outcome::Value(EditEntry::Action(ItemAction::Help)) => {
                    if let Some(help) = &self.help_text {
                        session.message(help);
                    }
                }
                Outcome::Value(EditEntry::Action(_)) | Outcome::Cancelled => {
                    return Ok(Outcome::Cancelled)
                }
            }
        }
    }

    fn edit_menu(
        &self,
        object: &Map<String, Value>,
        child_ctx: &Context,
        settings: &Defaults,
    ) -> Vec<Choice<EditEntry>> {
        let mut menu = Vec::new();
        for (i, (key, def)) in self.fields.iter().enumerate() {
            let value = object.get(key).unwrap_or(&Value::Null);
            if let Some(summary) = def.summarize(value, child_ctx, settings) {
                let label = format!("Edit {}: {}", def.name().unwrap_or(key), summary);
                menu.push(Choice::new(label, EditEntry::Field(i)));
            }
        }
        if self.help_text.is_some() {
            let help = help_option();
            menu.push(Choice::new(help.name, EditEntry::Action(help.value)));
        }
        let finish = finish_option(&self.name);
        menu.push(Choice::new(finish.name, EditEntry::Action(finish.value)));
        let cancel = cancel_option();
        menu.push(Choice::new(cancel.name, EditEntry::Action(cancel.value)));
        menu
    }

    /// Update the fields after `edited` that depend on it.
    fn refresh_after(
        &self,
        session: &mut Session<'_>,
        edited: usize,
        updated: &mut Map<String, Value>,
        before: &Context,
        ctx: &Context,
    ) -> Result<()> {
        for (key, def) in &self.fields[edited + 1..] {
            let after = ctx.with_parent(Value::Object(updated.clone()));
            let current = updated.get(key).cloned().unwrap_or(Value::Null);
            if let Outcome::Value(value) = def.refresh(session, &current, before, &after)? {
                set_field(updated, key, value);
            }
        }
        Ok(())
    }

    pub(crate) fn summarize(&self, value: &Value, ctx: &Context, settings: &Defaults) -> String {
        if let Some(summarize) = &self.summarize {
            return summarize(value, ctx);
        }
        let child_ctx = ctx.with_parent(value.clone());
        let parts: Vec<String> = self
            .fields
            .iter()
            .filter_map(|(key, def)| {
                let field = value.get(key).unwrap_or(&Value::Null);
                def.summarize(field, &child_ctx, settings)
            })
            .collect();
        text::clip_to_maximum(&parts.join(", "), settings.max_item_value_length)
    }
}

/// Absent values are left out of the produced object.
fn set_field(object: &mut Map<String, Value>, key: &str, value: Value) {
    if value.is_null() {
        object.remove(key);
    } else {
        object.insert(key.to_string(), value);
    }
}

impl fmt::Debug for ObjectDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDef")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl From<ObjectDef> for InputDefinition {
    fn from(def: ObjectDef) -> Self {
        InputDefinition::Object(def)
    }
}
