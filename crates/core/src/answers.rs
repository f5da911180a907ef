//! Answer extraction: pairs each stage marker with the user reply after it.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::WizardError;
use crate::message::{Role, Turn};
use crate::stage::{parse_marker, Stage};

/// Per-stage answers. Every stage is always present; unanswered stages map
/// to the empty string. Iteration follows interview order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Answers(BTreeMap<Stage, String>);

impl Default for Answers {
    fn default() -> Self {
        Self(Stage::ALL.into_iter().map(|stage| (stage, String::new())).collect())
    }
}

impl Answers {
    pub fn get(&self, stage: Stage) -> &str {
        self.0.get(&stage).map(String::as_str).unwrap_or_default()
    }

    pub fn record(&mut self, stage: Stage, answer: impl Into<String>) {
        self.0.insert(stage, answer.into());
    }

    /// `(stage, answer)` pairs in interview order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &str)> {
        self.0.iter().map(|(stage, answer)| (*stage, answer.as_str()))
    }

    /// Number of stages with a non-empty answer.
    pub fn answered(&self) -> usize {
        self.0.values().filter(|answer| !answer.is_empty()).count()
    }
}

/// Recover the answer given to each stage.
///
/// Walks the history keeping a single pending stage id. A marker sets it
/// (replacing any earlier one). The next user turn is recorded as that
/// stage's answer when the id names a known stage, and the pending id is
/// cleared either way. Assistant turns and non-marker system turns leave the
/// pending id untouched, so only the first user reply after a marker counts.
///
/// # Errors
///
/// Returns [`WizardError::MalformedMarker`] for the first marker that does
/// not parse.
pub fn extract_answers(history: &[Turn]) -> Result<Answers, WizardError> {
    let mut answers = Answers::default();
    let mut pending: Option<&str> = None;

    for (position, turn) in history.iter().enumerate() {
        if let Some(id) = parse_marker(position, turn)? {
            pending = Some(id);
            continue;
        }

        if turn.role != Role::User {
            continue;
        }

        if let Some(id) = pending.take() {
            if let Some(stage) = Stage::from_id(id) {
                answers.record(stage, turn.content.as_str());
            }
        }
    }

    Ok(answers)
}
