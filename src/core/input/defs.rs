//! Menu vocabulary shared by the combinators.
//!
//! The option builders are pure string templates over an entity name; they
//! know nothing about the list or object that shows them.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::prompt::{Outcome, Prompter, SelectOption, SelectPrompt};

/// A displayed label paired with the value returned if it is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice<V> {
    pub name: String,
    pub value: V,
}

impl<V> Choice<V> {
    pub fn new(name: impl Into<String>, value: V) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl From<&str> for Choice<serde_json::Value> {
    fn from(name: &str) -> Self {
        Choice::new(name, serde_json::Value::from(name))
    }
}

/// The operation a user picked from an editing menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemAction {
    Add,
    Edit,
    Delete,
    Finish,
    Cancel,
    Help,
}

pub fn add_option(name: &str) -> Choice<ItemAction> {
    Choice::new(format!("Add {}.", name), ItemAction::Add)
}

pub fn edit_option(name: &str) -> Choice<ItemAction> {
    Choice::new(format!("Edit {}.", name), ItemAction::Edit)
}

pub fn delete_option(name: &str) -> Choice<ItemAction> {
    Choice::new(format!("Delete {}.", name), ItemAction::Delete)
}

pub fn finish_option(name: &str) -> Choice<ItemAction> {
    Choice::new(format!("Finish editing {}.", name), ItemAction::Finish)
}

pub fn cancel_option() -> Choice<ItemAction> {
    Choice::new("Cancel", ItemAction::Cancel)
}

pub fn help_option() -> Choice<ItemAction> {
    Choice::new("Help", ItemAction::Help)
}

/// Show `choices` as a single-select menu and return the chosen value.
pub(crate) fn choose<V: Clone + PartialEq>(
    prompter: &mut dyn Prompter,
    question: &str,
    choices: &[Choice<V>],
    default: Option<&V>,
) -> Result<Outcome<V>> {
    let prompt = SelectPrompt {
        question: question.to_string(),
        options: choices.iter().map(|c| SelectOption::new(&c.name)).collect(),
        default_index: default.and_then(|d| choices.iter().position(|c| &c.value == d)),
    };

    Ok(prompter
        .select(&prompt)?
        .map(|index| choices[index].value.clone()))
}
