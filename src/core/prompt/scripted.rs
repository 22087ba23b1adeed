//! Deterministic prompter that replays canned answers.
//!
//! Every prompt is recorded so callers can assert on exactly what was asked
//! and which menu entries were offered.

use std::collections::VecDeque;

use super::{
    MultiSelectPrompt, Outcome, Prompter, SelectOption, SelectPrompt, TextPrompt, YesNoPrompt,
};
use crate::error::{Error, Result};

/// One canned answer, consumed by the next prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Free text, exactly as typed (empty means "accept the default").
    Text(String),
    /// Select the option with this label.
    Label(String),
    /// Select the option at this index.
    Index(usize),
    /// Check exactly the options with these labels.
    Labels(Vec<String>),
    Confirm(bool),
    Cancel,
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn label(value: impl Into<String>) -> Self {
        Answer::Label(value.into())
    }

    pub fn labels<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Labels(values.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Text,
    Select,
    MultiSelect,
    Confirm,
}

/// A prompt as it was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asked {
    pub kind: PromptKind,
    pub question: String,
    pub options: Vec<String>,
    pub default: Option<String>,
}

#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    asked: Vec<Asked>,
    messages: Vec<String>,
}

impl ScriptedPrompter {
    pub fn new<I: IntoIterator<Item = Answer>>(answers: I) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Every prompt shown so far, oldest first.
    pub fn asked(&self) -> &[Asked] {
        &self.asked
    }

    pub fn questions(&self) -> Vec<&str> {
        self.asked.iter().map(|a| a.question.as_str()).collect()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn record(
        &mut self,
        kind: PromptKind,
        question: &str,
        options: &[SelectOption],
        default: Option<String>,
    ) {
        self.asked.push(Asked {
            kind,
            question: question.to_string(),
            options: options.iter().map(|o| o.label.clone()).collect(),
            default,
        });
    }

    fn next(&mut self, question: &str) -> Result<Answer> {
        self.answers
            .pop_front()
            .ok_or_else(|| Error::prompt_script_exhausted(question))
    }
}

fn position(question: &str, options: &[SelectOption], label: &str) -> Result<usize> {
    options
        .iter()
        .position(|o| o.label == label)
        .ok_or_else(|| Error::prompt_unexpected_answer(question, label))
}

impl Prompter for ScriptedPrompter {
    fn text(&mut self, prompt: &TextPrompt) -> Result<Outcome<String>> {
        self.record(PromptKind::Text, &prompt.question, &[], prompt.default.clone());
        match self.next(&prompt.question)? {
            Answer::Text(entered) if entered.is_empty() => Ok(Outcome::Value(
                prompt.default.clone().unwrap_or_default(),
            )),
            Answer::Text(entered) => Ok(Outcome::Value(entered)),
            Answer::Cancel => Ok(Outcome::Cancelled),
            other => Err(Error::prompt_unexpected_answer(
                &prompt.question,
                format!("{:?}", other),
            )),
        }
    }

    fn select(&mut self, prompt: &SelectPrompt) -> Result<Outcome<usize>> {
        let default = prompt
            .default_index
            .and_then(|i| prompt.options.get(i))
            .map(|o| o.label.clone());
        self.record(PromptKind::Select, &prompt.question, &prompt.options, default);
        match self.next(&prompt.question)? {
            Answer::Label(label) => Ok(Outcome::Value(position(
                &prompt.question,
                &prompt.options,
                &label,
            )?)),
            Answer::Index(index) if index < prompt.options.len() => Ok(Outcome::Value(index)),
            Answer::Cancel => Ok(Outcome::Cancelled),
            other => Err(Error::prompt_unexpected_answer(
                &prompt.question,
                format!("{:?}", other),
            )),
        }
    }

    fn multi_select(&mut self, prompt: &MultiSelectPrompt) -> Result<Outcome<Vec<usize>>> {
        let checked = prompt
            .checked
            .iter()
            .filter_map(|i| prompt.options.get(*i))
            .map(|o| o.label.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        self.record(
            PromptKind::MultiSelect,
            &prompt.question,
            &prompt.options,
            Some(checked),
        );
        match self.next(&prompt.question)? {
            Answer::Labels(labels) => {
                let mut indices = labels
                    .iter()
                    .map(|label| position(&prompt.question, &prompt.options, label))
                    .collect::<Result<Vec<_>>>()?;
                indices.sort_unstable();
                indices.dedup();
                Ok(Outcome::Value(indices))
            }
            Answer::Cancel => Ok(Outcome::Cancelled),
            other => Err(Error::prompt_unexpected_answer(
                &prompt.question,
                format!("{:?}", other),
            )),
        }
    }

    fn confirm(&mut self, prompt: &YesNoPrompt) -> Result<Outcome<bool>> {
        self.record(
            PromptKind::Confirm,
            &prompt.question,
            &[],
            Some(prompt.default.to_string()),
        );
        match self.next(&prompt.question)? {
            Answer::Confirm(answer) => Ok(Outcome::Value(answer)),
            Answer::Text(entered) if entered.is_empty() => Ok(Outcome::Value(prompt.default)),
            Answer::Cancel => Ok(Outcome::Cancelled),
            other => Err(Error::prompt_unexpected_answer(
                &prompt.question,
                format!("{:?}", other),
            )),
        }
    }

    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }
}
