//! Declarative, composable descriptions of values to collect from a user.
//!
//! A definition is built once and evaluated any number of times against a
//! [`Prompter`](crate::prompt::Prompter). Composite definitions (objects,
//! lists, conditional fields) thread a [`Context`] of already-collected
//! values down to their children.

mod context;
mod definition;
mod defs;
mod driver;
mod list;
mod object;
mod optional;
mod primitives;
mod select;
mod session;

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::Result;
use crate::validation::Validation;

pub use context::Context;
pub use definition::InputDefinition;
pub use defs::{
    add_option, cancel_option, delete_option, edit_option, finish_option, help_option, Choice,
    ItemAction,
};
pub use driver::{
    create_from_user_input, evaluate, evaluate_as, evaluate_with, render_json, render_yaml,
    update_from_user_input, FinishVerb, ReviewOptions,
};
pub use list::{list_def, ListDef};
pub use object::{object_def, ObjectDef};
pub use optional::{optional_def, OptionalDef};
pub use primitives::{
    boolean_def, computed_def, integer_def, number_def, optional_integer_def,
    optional_number_def, optional_string_def, static_def, string_def, undefined_def, BooleanDef,
    ComputedDef, DefaultText, NumberDef, StringDef,
};
pub use select::{
    checkbox_def, choose_def, lazy_checkbox_def, lazy_select_def, list_selection_def, select_def,
    CheckboxDef, ChoiceSource, EmptyChoices, SelectDef,
};
pub use session::Session;

pub type ValidateFn = Arc<dyn Fn(&str, &Context) -> Validation + Send + Sync>;
pub type PredicateFn = Arc<dyn Fn(&Context) -> bool + Send + Sync>;
pub type ComputeFn = Arc<dyn Fn(&Context) -> Result<Value> + Send + Sync>;
pub type ChoicesFn = Arc<dyn Fn(&Context) -> Result<Vec<Choice<Value>>> + Send + Sync>;
pub type SummarizeFn = Arc<dyn Fn(&Value, &Context) -> String + Send + Sync>;
pub type ObjectValidateFn = Arc<dyn Fn(&Map<String, Value>, &Context) -> Validation + Send + Sync>;
