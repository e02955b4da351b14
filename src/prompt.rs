//! Interactive input
//!
//! Every read goes through the [`Prompt`] trait so the operation planners in
//! `handler` can be driven by a script in tests. Readers that validate
//! re-prompt until the answer is acceptable, but end of input is always an
//! error so a closed stdin can never spin forever.

use crate::constants::ESCAPE_TOKEN;
use crate::schema::{Column, ColumnType};
use crate::utils;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Source of operator answers.
pub trait Prompt {
    /// Show `message` and read one line without its line ending.
    fn read_line(&mut self, message: &str) -> Result<String>;

    /// Like `read_line`, but without echoing the answer.
    fn read_password(&mut self, message: &str) -> Result<String>;

    /// Show a line of feedback to the operator.
    fn notify(&mut self, message: &str);
}

/// The controlling terminal.
#[derive(Debug, Default)]
pub struct Terminal;

impl Prompt for Terminal {
    fn read_line(&mut self, message: &str) -> Result<String> {
        print!("{}", message);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .context("Failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("Input closed while waiting for an answer");
        }

        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }

    fn read_password(&mut self, message: &str) -> Result<String> {
        rpassword::prompt_password(message).context("Failed to read password")
    }

    fn notify(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Read a table, column or database name, re-prompting until it is valid.
pub fn read_identifier(prompt: &mut dyn Prompt, kind: &str) -> Result<String> {
    loop {
        let name = prompt.read_line(&format!("Enter {} name:", kind))?;
        let name = name.trim();
        if utils::is_valid_identifier(name) {
            return Ok(name.to_string());
        }
        prompt.notify(&format!("Invalid {} name.", kind));
    }
}

/// Collect answers until the operator types the escape token.
pub fn read_until_escape(prompt: &mut dyn Prompt, message: &str) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    loop {
        let line = prompt.read_line(message)?;
        let line = line.trim();
        if line == ESCAPE_TOKEN {
            return Ok(lines);
        }
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
}

/// Read a value for `column`, re-prompting until it parses for the column type.
///
/// Returns `None` for column types the prompts cannot read.
pub fn read_column_value(prompt: &mut dyn Prompt, column: &Column) -> Result<Option<String>> {
    if !column.kind.is_supported() {
        prompt.notify("Value Type not supported at the moment.");
        return Ok(None);
    }

    loop {
        let raw = prompt.read_line(&format!("Enter {}: ", column.name))?;
        if let Some(value) = column.kind.parse_input(&raw) {
            return Ok(Some(value));
        }
        if column.kind == ColumnType::Date {
            prompt.notify("Invalid DATE format. Use yyyy-MM-dd.");
        } else {
            prompt.notify(&format!("Invalid {} value entered.", column.kind.label()));
        }
    }
}

/// Read a non-empty free-text answer.
pub fn read_required(prompt: &mut dyn Prompt, message: &str, label: &str) -> Result<String> {
    loop {
        let value = prompt.read_line(message)?;
        if !value.trim().is_empty() {
            return Ok(value);
        }
        prompt.notify(&format!("Invalid {} entered.", label));
    }
}

/// Ask a yes/no question; only `y` or `Y` counts as yes.
pub fn confirm(prompt: &mut dyn Prompt, message: &str) -> Result<bool> {
    let answer = prompt.read_line(message)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::Prompt;
    use anyhow::Result;
    use std::collections::VecDeque;

    /// Replays canned answers and records everything shown.
    #[derive(Debug, Default)]
    pub struct ScriptedPrompt {
        answers: VecDeque<String>,
        /// Prompts and notices seen so far, in order
        pub transcript: Vec<String>,
    }

    impl ScriptedPrompt {
        pub fn new<I, S>(answers: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            Self {
                answers: answers.into_iter().map(Into::into).collect(),
                transcript: Vec::new(),
            }
        }

        /// Answers that were never asked for.
        pub fn remaining(&self) -> usize {
            self.answers.len()
        }

        fn next_answer(&mut self, message: &str) -> Result<String> {
            self.transcript.push(message.to_string());
            self.answers
                .pop_front()
                .ok_or_else(|| anyhow::anyhow!("Input closed while waiting for an answer"))
        }
    }

    impl Prompt for ScriptedPrompt {
        fn read_line(&mut self, message: &str) -> Result<String> {
            self.next_answer(message)
        }

        fn read_password(&mut self, message: &str) -> Result<String> {
            self.next_answer(message)
        }

        fn notify(&mut self, message: &str) {
            self.transcript.push(message.to_string());
        }
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedPrompt;
