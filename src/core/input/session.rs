use crate::defaults::Defaults;
use crate::error::{Error, Result};
use crate::prompt::Prompter;

/// Everything one evaluation needs besides the definition tree: who to ask
/// and the display settings. Holds no collected values.
pub struct Session<'p> {
    prompter: &'p mut dyn Prompter,
    settings: Defaults,
}

impl<'p> Session<'p> {
    pub fn new(prompter: &'p mut dyn Prompter, settings: Defaults) -> Self {
        Self { prompter, settings }
    }

    pub fn prompter(&mut self) -> &mut (dyn Prompter + 'p) {
        &mut *self.prompter
    }

    pub fn settings(&self) -> &Defaults {
        &self.settings
    }

    pub fn message(&mut self, msg: &str) {
        self.prompter.message(msg);
    }

    /// Report a rejected answer. Interactive users see the message and get
    /// asked again; without a user the rejection is final.
    pub(crate) fn reject(&mut self, field: &str, message: &str) -> Result<()> {
        if self.prompter.is_interactive() {
            self.prompter.message(message);
            Ok(())
        } else {
            Err(Error::validation_invalid_argument(
                field,
                message,
                None,
                None,
            ))
        }
    }
}
