//! Interview prompt assembly.
//!
//! Produces the single flat prompt sent to the generation backend:
//!
//! ```text
//! <instructions>
//!
//! <history lines, role: content, one per non-system turn>
//! user: <user_prompt>
//! assistant: <next_question>
//! ```
//!
//! Assembly is deterministic: identical inputs always produce byte-identical
//! output.

use serde::Serialize;
use tracing::debug;

use crate::catalog::question_for;
use crate::error::WizardError;
use crate::message::{Role, Turn};
use crate::stage::Progress;
use crate::tracker::next_stage;

/// Fixed instruction preamble for every interview prompt.
pub const INTERVIEW_INSTRUCTIONS: &str = concat!(
    "You are a crowdsourcing challenge platform assistant. ",
    "Guide the user through defining their challenge step-by-step, one stage/question at a time."
);

/// An assembled interview prompt together with the stage it asks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterviewPrompt {
    pub prompt: String,
    pub stage: Progress,
}

/// Build the interview prompt for `user_prompt` given the prior `history`.
///
/// System turns (stage markers included) are excluded from the rendered
/// history. The returned `stage` is the one whose question closes the
/// prompt; callers record it as a marker once the reply is shown.
///
/// # Errors
///
/// Propagates [`WizardError::MalformedMarker`] from stage tracking.
pub fn build_prompt(user_prompt: &str, history: &[Turn]) -> Result<InterviewPrompt, WizardError> {
    let stage = next_stage(history)?;
    let next_question = question_for(stage);
    let history_block = render_history(history);

    let prompt = format!(
        "{INTERVIEW_INSTRUCTIONS}\n\n{history_block}\nuser: {user_prompt}\nassistant: {next_question}"
    );

    debug!(
        stage = %stage,
        turns = history.len(),
        prompt_chars = prompt.len(),
        "Assembled interview prompt"
    );

    Ok(InterviewPrompt { prompt, stage })
}

/// Render the non-system turns as `role: content` lines joined by newlines.
pub fn render_history(history: &[Turn]) -> String {
    history
        .iter()
        .filter(|turn| turn.role != Role::System)
        .map(|turn| format!("{}: {}", turn.role, turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}
