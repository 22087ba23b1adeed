use serde::{Deserialize, Serialize};

/// Result of anything the user can walk away from.
///
/// Cancellation is an ordinary outcome, not an error: every caller decides
/// whether it aborts its own structure or just returns to a menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "value", rename_all = "camelCase")]
pub enum Outcome<T> {
    Value(T),
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Value(value) => Outcome::Value(f(value)),
            Outcome::Cancelled => Outcome::Cancelled,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Cancelled => None,
        }
    }
}

/// A yes/no confirmation prompt.
#[derive(Debug, Clone)]
pub struct YesNoPrompt {
    pub question: String,
    /// true = default yes [Y/n], false = default no [y/N]
    pub default: bool,
}

/// Select one option from a list. The answer is the option's index.
#[derive(Debug, Clone)]
pub struct SelectPrompt {
    pub question: String,
    pub options: Vec<SelectOption>,
    pub default_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Select any number of options. The answer is the chosen indices in
/// ascending order.
#[derive(Debug, Clone)]
pub struct MultiSelectPrompt {
    pub question: String,
    pub options: Vec<SelectOption>,
    pub checked: Vec<usize>,
}

/// Free text input.
#[derive(Debug, Clone)]
pub struct TextPrompt {
    pub question: String,
    pub default: Option<String>,
}
