//! Lists: a menu-driven editor over a sequence of items that share one
//! definition.
//!
//! The editor is a small state machine. Every transition takes the live
//! item sequence and returns the next state; the menu is rebuilt from the
//! sequence before each prompt so the user always sees the current bounds.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::defs::{
    add_option, cancel_option, choose, delete_option, edit_option, finish_option, help_option,
    Choice, ItemAction,
};
use super::{Context, InputDefinition, Session, SummarizeFn};
use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::prompt::{Outcome, YesNoPrompt};
use crate::text;

const DUPLICATE_MESSAGE: &str = "Duplicate values are not allowed.";

pub fn list_def(name: impl Into<String>, item: impl Into<InputDefinition>) -> ListDef {
    ListDef {
        name: name.into(),
        item: Box::new(item.into()),
        min_items: None,
        max_items: None,
        allow_duplicates: false,
        summarize: None,
        help_text: None,
    }
}

#[derive(Clone)]
pub struct ListDef {
    pub(crate) name: String,
    item: Box<InputDefinition>,
    min_items: Option<usize>,
    max_items: Option<usize>,
    allow_duplicates: bool,
    summarize: Option<SummarizeFn>,
    help_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListState {
    Menu,
    Add,
    Item(usize),
    Edit(usize),
    Delete(usize),
    Finish,
    Cancel,
}

#[derive(Debug, Clone, PartialEq)]
enum MenuEntry {
    Item(usize),
    Action(ItemAction),
}

impl ListDef {
    /// Fewest items the user may finish with. Defaults to the configured
    /// `list_min_items`.
    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    pub fn summarize_with<F>(mut self, summarize: F) -> Self
    where
        F: Fn(&Value, &Context) -> String + Send + Sync + 'static,
    {
        self.summarize = Some(Arc::new(summarize));
        self
    }

    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    fn min(&self, settings: &Defaults) -> usize {
        self.min_items.unwrap_or(settings.list_min_items)
    }

    pub(crate) fn check(&self, settings: &Defaults) -> Result<()> {
        let min = self.min(settings);
        if let Some(max) = self.max_items {
            if min > max {
                return Err(Error::definition_invalid(
                    &self.name,
                    format!("min_items ({}) is greater than max_items ({})", min, max),
                ));
            }
        }
        if !self.item.is_editable() {
            return Err(Error::definition_invalid(
                &self.name,
                "list items must be editable",
            ));
        }
        self.item.check(settings)
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        let mut items: Vec<Value> = prior
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let mut state = ListState::Menu;

        loop {
            state = match state {
                ListState::Menu => self.menu(session, &items)?,
                ListState::Add => self.add(session, &mut items, ctx)?,
                ListState::Item(index) => self.item_menu(session, &items, index)?,
                ListState::Edit(index) => self.edit(session, &mut items, index, ctx)?,
                ListState::Delete(index) => self.delete(session, &mut items, index)?,
                ListState::Finish => return Ok(Outcome::Value(Value::Array(items))),
                ListState::Cancel => return Ok(Outcome::Cancelled),
            };
        }
    }

    fn over_max(&self, len: usize) -> bool {
        self.max_items.map_or(false, |max| len > max)
    }

    fn item_summary(&self, item: &Value, settings: &Defaults) -> Result<String> {
        self.item
            .summarize(item, &Context::new(), settings)
            .ok_or_else(|| Error::definition_invalid(&self.name, "list items must be editable"))
    }

    fn menu(&self, session: &mut Session<'_>, items: &[Value]) -> Result<ListState> {
        let settings = session.settings().clone();
        let min = self.min(&settings);
        let len = items.len();

        let mut menu = Vec::with_capacity(len + 4);
        for (i, item) in items.iter().enumerate() {
            let summary = self.item_summary(item, &settings)?;
            menu.push(Choice::new(format!("Edit {}.", summary), MenuEntry::Item(i)));
        }
        if self.help_text.is_some() {
            let help = help_option();
            menu.push(Choice::new(help.name, MenuEntry::Action(help.value)));
        }
        let can_add = self.max_items.map_or(true, |max| len < max);
        if can_add {
            let add = add_option(self.item.name().unwrap_or(&self.name));
            menu.push(Choice::new(add.name, MenuEntry::Action(add.value)));
        }
        let can_finish = len >= min && !self.over_max(len);
        if can_finish {
            let finish = finish_option(&self.name);
            menu.push(Choice::new(finish.name, MenuEntry::Action(finish.value)));
        }
        let cancel = cancel_option();
        menu.push(Choice::new(cancel.name, MenuEntry::Action(cancel.value)));

        // A prior value above max_items offers neither Add nor Finish.
        let default = if can_finish {
            MenuEntry::Action(ItemAction::Finish)
        } else if can_add {
            MenuEntry::Action(ItemAction::Add)
        } else {
            MenuEntry::Item(0)
        };
        let question = format!("Add or edit {}.", self.name);

        Ok(match choose(session.prompter(), &question, &menu, Some(&default))? {
            Outcome::Value(MenuEntry::Item(i)) => ListState::Item(i),
            Outcome::Value(MenuEntry::Action(ItemAction::Add)) => ListState::Add,
            Outcome::Value(MenuEntry::Action(ItemAction::Finish)) => ListState::Finish,
            Outcome::Value(MenuEntry::Action(ItemAction::Help)) => {
                if let Some(help) = &self.help_text {
                    session.message(help);
                }
                ListState::Menu
            }
            Outcome::Value(MenuEntry::Action(_)) | Outcome::Cancelled => ListState::Cancel,
        })
    }

    fn item_menu(&self, session: &mut Session<'_>, items: &[Value], index: usize) -> Result<ListState> {
        let settings = session.settings().clone();
        let summary = self.item_summary(&items[index], &settings)?;

        let mut menu = vec![edit_option(&summary)];
        if items.len() > self.min(&settings) || self.over_max(items.len()) {
            menu.push(delete_option(&summary));
        }
        menu.push(cancel_option());

        let question = format!("What do you want to do with {}?", summary);
        Ok(match choose(session.prompter(), &question, &menu, Some(&ItemAction::Edit))? {
            Outcome::Value(ItemAction::Edit) => ListState::Edit(index),
            Outcome::Value(ItemAction::Delete) => ListState::Delete(index),
            _ => ListState::Menu,
        })
    }

    fn add(&self, session: &mut Session<'_>, items: &mut Vec<Value>, ctx: &Context) -> Result<ListState> {
        let item_ctx = ctx.with_parent(Value::Array(items.clone()));
        if let Outcome::Value(item) = self.item.build_from_user_input(session, &item_ctx)? {
            if self.accepts(session, items, &item, None)? {
                items.push(item);
            }
        }
        Ok(ListState::Menu)
    }

    fn edit(
        &self,
        session: &mut Session<'_>,
        items: &mut [Value],
        index: usize,
        ctx: &Context,
    ) -> Result<ListState> {
        let item_ctx = ctx.with_parent(Value::Array(items.to_vec()));
        if let Outcome::Value(item) =
            self.item.update_from_user_input(session, &items[index], &item_ctx)?
        {
            if self.accepts(session, items, &item, Some(index))? {
                items[index] = item;
            }
        }
        Ok(ListState::Menu)
    }

    fn delete(&self, session: &mut Session<'_>, items: &mut Vec<Value>, index: usize) -> Result<ListState> {
        let settings = session.settings().clone();
        let summary = self.item_summary(&items[index], &settings)?;
        let prompt = YesNoPrompt {
            question: format!("Delete {}?", summary),
            default: false,
        };
        if let Outcome::Value(true) = session.prompter().confirm(&prompt)? {
            items.remove(index);
        }
        Ok(ListState::Menu)
    }

    /// Duplicate check; `replacing` is the index being edited, which may keep
    /// its own value.
    fn accepts(
        &self,
        session: &mut Session<'_>,
        items: &[Value],
        item: &Value,
        replacing: Option<usize>,
    ) -> Result<bool> {
        if self.allow_duplicates {
            return Ok(true);
        }
        let duplicate = items
            .iter()
            .enumerate()
            .any(|(i, existing)| Some(i) != replacing && existing == item);
        if duplicate {
            session.reject(&self.name, DUPLICATE_MESSAGE)?;
            return Ok(false);
        }
        Ok(true)
    }

    pub(crate) fn summarize(&self, value: &Value, ctx: &Context, settings: &Defaults) -> String {
        if let Some(summarize) = &self.summarize {
            return summarize(value, ctx);
        }
        let parts: Vec<String> = value
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| self.item.summarize(item, &Context::new(), settings))
                    .collect()
            })
            .unwrap_or_default();
        text::clip_to_maximum(&parts.join(", "), settings.max_item_value_length)
    }
}

impl fmt::Debug for ListDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListDef")
            .field("name", &self.name)
            .field("item", &self.item)
            .field("min_items", &self.min_items)
            .field("max_items", &self.max_items)
            .field("allow_duplicates", &self.allow_duplicates)
            .finish_non_exhaustive()
    }
}

impl From<ListDef> for InputDefinition {
    fn from(def: ListDef) -> Self {
        InputDefinition::List(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::input::{computed_def, string_def};
    use crate::prompt::{Answer, ScriptedPrompter};
    use serde_json::json;

    fn uris() -> ListDef {
        list_def("Redirect URIs", string_def("Redirect URI"))
    }

    fn evaluate(
        def: &InputDefinition,
        answers: Vec<Answer>,
        prior: Option<&Value>,
    ) -> (Result<Outcome<Value>>, ScriptedPrompter) {
        let mut prompter = ScriptedPrompter::new(answers);
        let result = {
            let mut session = Session::new(&mut prompter, Defaults::default());
            match prior {
                Some(prior) => def.update_from_user_input(&mut session, prior, &Context::new()),
                None => def.build_from_user_input(&mut session, &Context::new()),
            }
        };
        (result, prompter)
    }

    #[test]
    fn empty_list_below_minimum_offers_add_only() {
        let def: InputDefinition = uris().into();
        let (result, prompter) = evaluate(
            &def,
            vec![
                Answer::label("Add Redirect URI."),
                Answer::text("https://a"),
                Answer::label("Finish editing Redirect URIs."),
            ],
            None,
        );
        assert_eq!(result.unwrap(), Outcome::Value(json!(["https://a"])));

        let first = &prompter.asked()[0];
        assert_eq!(first.question, "Add or edit Redirect URIs.");
        assert_eq!(first.options, ["Add Redirect URI.", "Cancel"]);
        assert_eq!(first.default.as_deref(), Some("Add Redirect URI."));

        let second = &prompter.asked()[2];
        assert_eq!(
            second.options,
            ["Edit https://a.", "Add Redirect URI.", "Finish editing Redirect URIs.", "Cancel"]
        );
        assert_eq!(second.default.as_deref(), Some("Finish editing Redirect URIs."));
    }

    #[test]
    fn add_is_hidden_at_maximum() {
        let def: InputDefinition = uris().min_items(0).max_items(1).into();
        let prior = json!(["https://a"]);
        let (result, prompter) = evaluate(&def, vec![Answer::label("Finish editing Redirect URIs.")], Some(&prior));
        assert_eq!(result.unwrap(), Outcome::Value(prior));
        assert_eq!(
            prompter.asked()[0].options,
            ["Edit https://a.", "Finish editing Redirect URIs.", "Cancel"]
        );
    }

    #[test]
    fn duplicates_are_rejected() {
        let def: InputDefinition = uris().into();
        let (result, prompter) = evaluate(
            &def,
            vec![
                Answer::label("Add Redirect URI."),
                Answer::text("https://a"),
                Answer::label("Add Redirect URI."),
                Answer::text("https://a"),
                Answer::label("Finish editing Redirect URIs."),
            ],
            None,
        );
        assert_eq!(result.unwrap(), Outcome::Value(json!(["https://a"])));
        assert_eq!(prompter.messages(), ["Duplicate values are not allowed."]);
    }

    #[test]
    fn duplicates_allowed_when_configured() {
        let def: InputDefinition = uris().allow_duplicates(true).into();
        let (result, _) = evaluate(
            &def,
            vec![
                Answer::label("Add Redirect URI."),
                Answer::text("x"),
                Answer::label("Add Redirect URI."),
                Answer::text("x"),
                Answer::label("Finish editing Redirect URIs."),
            ],
            None,
        );
        assert_eq!(result.unwrap(), Outcome::Value(json!(["x", "x"])));
    }

    #[test]
    fn edit_replaces_item_in_place() {
        let def: InputDefinition = uris().into();
        let prior = json!(["a", "b"]);
        let (result, prompter) = evaluate(
            &def,
            vec![
                Answer::label("Edit b."),
                Answer::label("Edit b."),
                Answer::text("c"),
                Answer::label("Finish editing Redirect URIs."),
            ],
            Some(&prior),
        );
        assert_eq!(result.unwrap(), Outcome::Value(json!(["a", "c"])));

        let item_menu = &prompter.asked()[1];
        assert_eq!(item_menu.question, "What do you want to do with b?");
        assert_eq!(item_menu.options, ["Edit b.", "Delete b.", "Cancel"]);
        assert_eq!(prompter.asked()[2].default.as_deref(), Some("b"));
    }

    #[test]
    fn edit_may_keep_its_own_value() {
        let def: InputDefinition = uris().into();
        let prior = json!(["a"]);
        let (result, prompter) = evaluate(
            &def,
            vec![
                Answer::label("Edit a."),
                Answer::label("Edit a."),
                Answer::text(""),
                Answer::label("Finish editing Redirect URIs."),
            ],
            Some(&prior),
        );
        assert_eq!(result.unwrap(), Outcome::Value(prior));
        assert!(prompter.messages().is_empty());
    }

    #[test]
    fn delete_confirms_and_respects_minimum() {
        let def: InputDefinition = uris().into();
        let prior = json!(["a", "b"]);
        let (result, prompter) = evaluate(
            &def,
            vec![
                Answer::label("Edit a."),
                Answer::label("Delete a."),
                Answer::Confirm(false),
                Answer::label("Edit a."),
                Answer::label("Delete a."),
                Answer::Confirm(true),
                Answer::label("Edit b."),
                Answer::label("Cancel"),
                Answer::label("Finish editing Redirect URIs."),
            ],
            Some(&prior),
        );
        assert_eq!(result.unwrap(), Outcome::Value(json!(["b"])));
        assert_eq!(prompter.asked()[2].question, "Delete a?");
        assert_eq!(prompter.asked()[2].default.as_deref(), Some("false"));
        // One item left at min_items = 1: no delete offered.
        assert_eq!(prompter.asked()[7].options, ["Edit b.", "Cancel"]);
    }

    #[test]
    fn cancel_inside_add_returns_to_menu() {
        let def: InputDefinition = uris().into();
        let (result, prompter) = evaluate(
            &def,
            vec![
                Answer::label("Add Redirect URI."),
                Answer::Cancel,
                Answer::label("Cancel"),
            ],
            None,
        );
        assert!(result.unwrap().is_cancelled());
        assert_eq!(prompter.asked().len(), 3);
    }

    #[test]
    fn items_see_current_sequence() {
        let def: InputDefinition = list_def(
            "Names",
            string_def("Name").default_with(|ctx| {
                let count = ctx.parent().and_then(Value::as_array).map_or(0, Vec::len);
                format!("name-{}", count + 1)
            }),
        )
        .into();
        let (result, _) = evaluate(
            &def,
            vec![
                Answer::label("Add Name."),
                Answer::text(""),
                Answer::label("Add Name."),
                Answer::text(""),
                Answer::label("Finish editing Names."),
            ],
            None,
        );
        assert_eq!(result.unwrap(), Outcome::Value(json!(["name-1", "name-2"])));
    }

    #[test]
    fn misconfigured_lists_fail_check() {
        let settings = Defaults::default();
        let inverted: InputDefinition = uris().min_items(3).max_items(2).into();
        assert_eq!(inverted.check(&settings).unwrap_err().code, ErrorCode::DefinitionInvalid);

        let uneditable: InputDefinition = list_def("Ids", computed_def(|_| Ok(json!(1)))).into();
        assert_eq!(uneditable.check(&settings).unwrap_err().code, ErrorCode::DefinitionInvalid);
    }

    #[test]
    fn default_summary_joins_items() {
        let def: InputDefinition = uris().into();
        assert_eq!(
            def.summarize(&json!(["a", "b"]), &Context::new(), &Defaults::default()),
            Some("a, b".to_string())
        );
    }
}
