use anyhow::Result;
use std::collections::VecDeque;

use crate::domain::Rank;
use crate::matching::Candidate;

/// One question put to the operator
#[derive(Debug)]
pub struct Prompt<'a> {
    pub rank: Rank,
    pub record_name: &'a str,
    pub candidates: &'a [Candidate],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Accept(String),
    Reject,
    /// Reject this and every later prompt of the run
    RejectAll,
}

/// Source of answers for ambiguous rankings
pub trait DecisionProvider {
    fn decide(&mut self, prompt: &Prompt<'_>) -> Result<Decision>;
}

/// Batch default: never links a guess
#[derive(Debug, Default)]
pub struct RejectingProvider;

impl DecisionProvider for RejectingProvider {
    fn decide(&mut self, _prompt: &Prompt<'_>) -> Result<Decision> {
        Ok(Decision::Reject)
    }
}

/// Replays prepared answers in order, then rejects
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    answers: VecDeque<Decision>,
    asked: Vec<String>,
}

impl ScriptedProvider {
    pub fn new<I: IntoIterator<Item = Decision>>(answers: I) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Record names prompted so far, in order
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl DecisionProvider for ScriptedProvider {
    fn decide(&mut self, prompt: &Prompt<'_>) -> Result<Decision> {
        self.asked.push(prompt.record_name.to_string());
        Ok(self.answers.pop_front().unwrap_or(Decision::Reject))
    }
}
