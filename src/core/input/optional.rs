use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use super::{Context, InputDefinition, PredicateFn, Session};
use crate::defaults::Defaults;
use crate::error::Result;
use crate::prompt::Outcome;

/// Ask `inner` only when `predicate` holds for the current context.
///
/// ```ignore
/// let arn = optional_def(string_def("Lambda ARN"), |ctx| {
///     ctx.field_str("hostingType") == Some("lambda")
/// });
/// ```
pub fn optional_def<F>(inner: impl Into<InputDefinition>, predicate: F) -> OptionalDef
where
    F: Fn(&Context) -> bool + Send + Sync + 'static,
{
    OptionalDef {
        inner: Box::new(inner.into()),
        predicate: Arc::new(predicate),
        initially_active: false,
    }
}

#[derive(Clone)]
pub struct OptionalDef {
    inner: Box<InputDefinition>,
    predicate: PredicateFn,
    initially_active: bool,
}

impl OptionalDef {
    /// Whether a prior value is shown as active when there is no context to
    /// ask the predicate about. Never affects building.
    pub fn initially_active(mut self, active: bool) -> Self {
        self.initially_active = active;
        self
    }

    pub fn inner(&self) -> &InputDefinition {
        &self.inner
    }

    pub fn is_active(&self, ctx: &Context) -> bool {
        (self.predicate)(ctx)
    }

    pub(crate) fn run(
        &self,
        session: &mut Session<'_>,
        prior: Option<&Value>,
        ctx: &Context,
    ) -> Result<Outcome<Value>> {
        if !self.is_active(ctx) {
            return Ok(Outcome::Value(Value::Null));
        }
        self.inner.run(session, prior.filter(|v| !v.is_null()), ctx)
    }

    pub(crate) fn refresh(
        &self,
        session: &mut Session<'_>,
        current: &Value,
        before: &Context,
        after: &Context,
    ) -> Result<Outcome<Value>> {
        match (self.is_active(before), self.is_active(after)) {
            (true, true) => self.inner.refresh(session, current, before, after),
            (false, true) => self.inner.build_from_user_input(session, after),
            (_, false) => Ok(Outcome::Value(Value::Null)),
        }
    }

    pub(crate) fn summarize(
        &self,
        value: &Value,
        ctx: &Context,
        settings: &Defaults,
    ) -> Option<String> {
        let active = if ctx.is_empty() {
            self.initially_active
        } else {
            self.is_active(ctx)
        };
        if !active {
            return None;
        }
        self.inner.summarize(value, ctx, settings)
    }
}

impl fmt::Debug for OptionalDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionalDef")
            .field("inner", &self.inner)
            .field("initially_active", &self.initially_active)
            .finish_non_exhaustive()
    }
}

impl From<OptionalDef> for InputDefinition {
    fn from(def: OptionalDef) -> Self {
        InputDefinition::Optional(def)
    }
}
