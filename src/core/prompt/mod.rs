mod scripted;
mod types;

pub use scripted::{Answer, Asked, PromptKind, ScriptedPrompter};
pub use types::*;

use crate::error::{Error, Result};
use crate::tty;
use std::io::{self, BufRead, Write};

/// The only way input definitions talk to a user.
///
/// Implementations ask exactly one question per call and block until it is
/// answered. End of input or an explicit cancel maps to `Outcome::Cancelled`;
/// I/O failures are errors.
pub trait Prompter {
    fn text(&mut self, prompt: &TextPrompt) -> Result<Outcome<String>>;

    fn select(&mut self, prompt: &SelectPrompt) -> Result<Outcome<usize>>;

    fn multi_select(&mut self, prompt: &MultiSelectPrompt) -> Result<Outcome<Vec<usize>>>;

    fn confirm(&mut self, prompt: &YesNoPrompt) -> Result<Outcome<bool>>;

    /// Informational output (help text, validation errors, previews).
    fn message(&mut self, msg: &str);

    /// Whether a human can correct a rejected answer. Non-interactive
    /// prompters answer from defaults only, so a rejected answer is final.
    fn is_interactive(&self) -> bool {
        true
    }
}

/// Line-oriented prompter over stdin/stderr.
/// Handles TTY detection and provides consistent prompting behavior.
pub struct TerminalPrompter {
    interactive: bool,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
}

impl TerminalPrompter {
    /// Create prompter with automatic TTY detection.
    pub fn new() -> Self {
        Self::with_interactive(tty::require_tty_for_interactive())
    }

    /// Create prompter with explicit interactive mode.
    pub fn with_interactive(interactive: bool) -> Self {
        Self {
            interactive,
            input: Box::new(io::BufReader::new(io::stdin())),
            output: Box::new(io::stderr()),
        }
    }

    /// Force non-interactive mode (useful for --non-interactive flags).
    pub fn non_interactive() -> Self {
        Self::with_interactive(false)
    }

    /// Prompter over arbitrary streams; always interactive.
    pub fn with_io(input: Box<dyn BufRead>, output: Box<dyn Write>) -> Self {
        Self {
            interactive: true,
            input,
            output,
        }
    }

    fn write(&mut self, text: &str) {
        write!(self.output, "{}", text).ok();
        self.output.flush().ok();
    }

    fn writeln(&mut self, text: &str) {
        writeln!(self.output, "{}", text).ok();
    }

    /// Read one line. `None` on end of input.
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read prompt answer".to_string())))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn no_default(question: &str) -> Error {
        Error::validation_invalid_argument(
            "tty",
            format!("'{}' needs an answer but input is not interactive", question),
            None,
            None,
        )
    }

    fn print_options(&mut self, options: &[SelectOption], marked: impl Fn(usize) -> bool, marker: &str) {
        for (i, opt) in options.iter().enumerate() {
            let mark = if marked(i) { marker } else { " " };
            self.writeln(&format!("  {}[{}] {}", mark, i + 1, opt.label));
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn text(&mut self, prompt: &TextPrompt) -> Result<Outcome<String>> {
        if !self.interactive {
            return match &prompt.default {
                Some(default) => Ok(Outcome::Value(default.clone())),
                None => Err(Self::no_default(&prompt.question)),
            };
        }

        match &prompt.default {
            Some(default) if !default.is_empty() => {
                let line = format!("{} ({}): ", prompt.question, default);
                self.write(&line);
            }
            _ => {
                let line = format!("{}: ", prompt.question);
                self.write(&line);
            }
        }

        let Some(entered) = self.read_line()? else {
            return Ok(Outcome::Cancelled);
        };
        if entered.is_empty() {
            return Ok(Outcome::Value(prompt.default.clone().unwrap_or_default()));
        }
        Ok(Outcome::Value(entered))
    }

    fn select(&mut self, prompt: &SelectPrompt) -> Result<Outcome<usize>> {
        if !self.interactive {
            return match prompt.default_index {
                Some(index) if index < prompt.options.len() => Ok(Outcome::Value(index)),
                _ => Err(Self::no_default(&prompt.question)),
            };
        }

        self.writeln(&prompt.question);
        self.print_options(&prompt.options, |i| Some(i) == prompt.default_index, "*");

        loop {
            let line = format!("Enter choice (1-{}): ", prompt.options.len());
            self.write(&line);

            let Some(entered) = self.read_line()? else {
                return Ok(Outcome::Cancelled);
            };
            if entered.is_empty() {
                if let Some(index) = prompt.default_index {
                    return Ok(Outcome::Value(index));
                }
                continue;
            }

            match entered.parse::<usize>() {
                Ok(n) if n >= 1 && n <= prompt.options.len() => return Ok(Outcome::Value(n - 1)),
                _ => {
                    let line = format!("Please enter a number between 1 and {}.", prompt.options.len());
                    self.writeln(&line);
                }
            }
        }
    }

    fn multi_select(&mut self, prompt: &MultiSelectPrompt) -> Result<Outcome<Vec<usize>>> {
        if !self.interactive {
            return Ok(Outcome::Value(prompt.checked.clone()));
        }

        self.writeln(&prompt.question);
        self.print_options(&prompt.options, |i| prompt.checked.contains(&i), "x");

        loop {
            self.write("Enter choices separated by commas (empty keeps marked, '-' for none): ");

            let Some(entered) = self.read_line()? else {
                return Ok(Outcome::Cancelled);
            };
            if entered.is_empty() {
                return Ok(Outcome::Value(prompt.checked.clone()));
            }
            if entered == "-" {
                return Ok(Outcome::Value(Vec::new()));
            }

            match parse_indices(&entered, prompt.options.len()) {
                Some(indices) => return Ok(Outcome::Value(indices)),
                None => {
                    let line = format!(
                        "Please enter numbers between 1 and {} separated by commas.",
                        prompt.options.len()
                    );
                    self.writeln(&line);
                }
            }
        }
    }

    fn confirm(&mut self, prompt: &YesNoPrompt) -> Result<Outcome<bool>> {
        if !self.interactive {
            return Ok(Outcome::Value(prompt.default));
        }

        let suffix = if prompt.default { "[Y/n]" } else { "[y/N]" };
        let line = format!("{} {}: ", prompt.question, suffix);
        self.write(&line);

        let Some(entered) = self.read_line()? else {
            return Ok(Outcome::Cancelled);
        };

        let trimmed = entered.to_lowercase();
        if trimmed.is_empty() {
            return Ok(Outcome::Value(prompt.default));
        }

        Ok(Outcome::Value(trimmed.starts_with('y')))
    }

    fn message(&mut self, msg: &str) {
        if self.interactive {
            self.writeln(msg);
        }
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

/// Parse `"1, 3,2"` into sorted, deduplicated zero-based indices.
fn parse_indices(entered: &str, len: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::new();
    for part in entered.split(',') {
        let n: usize = part.trim().parse().ok()?;
        if n < 1 || n > len {
            return None;
        }
        indices.push(n - 1);
    }
    indices.sort_unstable();
    indices.dedup();
    Some(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter {
        TerminalPrompter::with_io(Box::new(Cursor::new(input.to_string())), Box::new(io::sink()))
    }

    fn options(labels: &[&str]) -> Vec<SelectOption> {
        labels.iter().map(|l| SelectOption::new(*l)).collect()
    }

    #[test]
    fn text_uses_default_on_empty_line() {
        let mut p = prompter("\n");
        let answer = p
            .text(&TextPrompt {
                question: "Name".to_string(),
                default: Some("alpha".to_string()),
            })
            .unwrap();
        assert_eq!(answer, Outcome::Value("alpha".to_string()));
    }

    #[test]
    fn text_end_of_input_cancels() {
        let mut p = prompter("");
        let answer = p
            .text(&TextPrompt {
                question: "Name".to_string(),
                default: None,
            })
            .unwrap();
        assert!(answer.is_cancelled());
    }

    #[test]
    fn select_reprompts_on_out_of_range() {
        let mut p = prompter("7\nabc\n2\n");
        let answer = p
            .select(&SelectPrompt {
                question: "Pick".to_string(),
                options: options(&["a", "b"]),
                default_index: None,
            })
            .unwrap();
        assert_eq!(answer, Outcome::Value(1));
    }

    #[test]
    fn multi_select_parses_list() {
        let mut p = prompter("3, 1,3\n");
        let answer = p
            .multi_select(&MultiSelectPrompt {
                question: "Pick".to_string(),
                options: options(&["a", "b", "c"]),
                checked: vec![],
            })
            .unwrap();
        assert_eq!(answer, Outcome::Value(vec![0, 2]));
    }

    #[test]
    fn multi_select_dash_clears() {
        let mut p = prompter("-\n");
        let answer = p
            .multi_select(&MultiSelectPrompt {
                question: "Pick".to_string(),
                options: options(&["a", "b"]),
                checked: vec![1],
            })
            .unwrap();
        assert_eq!(answer, Outcome::Value(vec![]));
    }

    #[test]
    fn confirm_defaults_and_parses() {
        let mut p = prompter("\nno\n");
        let prompt = YesNoPrompt {
            question: "Sure?".to_string(),
            default: true,
        };
        assert_eq!(p.confirm(&prompt).unwrap(), Outcome::Value(true));
        assert_eq!(p.confirm(&prompt).unwrap(), Outcome::Value(false));
    }

    #[test]
    fn non_interactive_requires_defaults() {
        let mut p = TerminalPrompter::non_interactive();
        let err = p
            .text(&TextPrompt {
                question: "Name".to_string(),
                default: None,
            })
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationInvalidArgument);

        let answer = p
            .select(&SelectPrompt {
                question: "Pick".to_string(),
                options: options(&["a", "b"]),
                default_index: Some(1),
            })
            .unwrap();
        assert_eq!(answer, Outcome::Value(1));
    }
}
