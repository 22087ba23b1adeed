// Public modules
pub mod error;
pub mod input;
pub mod prompt;
pub mod tty;

// Public modules for CLI access
pub mod defaults;
pub mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use input::{Context, InputDefinition};
pub use prompt::{Outcome, Prompter, ScriptedPrompter, TerminalPrompter};
