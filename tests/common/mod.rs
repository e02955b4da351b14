//! Helpers shared by the integration tests

use anyhow::Result;
use pgprompt::prompt::Prompt;
use std::collections::VecDeque;

/// Replays canned answers and records every prompt and notice.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
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
