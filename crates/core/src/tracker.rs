//! Stage tracking: where the interview stands, derived from the history.

use std::collections::HashSet;

use crate::error::WizardError;
use crate::message::Turn;
use crate::stage::{parse_marker, Progress, Stage};

/// Determine the next stage to ask.
///
/// Collects the stage ids of every marker in `history`, then returns the
/// first stage in interview order that has not been asked, or
/// [`Progress::Complete`] once all seven have. Marker order is irrelevant;
/// repeated or unknown ids change nothing.
///
/// # Errors
///
/// Returns [`WizardError::MalformedMarker`] for the first marker that does
/// not split into exactly two `": "`-delimited parts.
pub fn next_stage(history: &[Turn]) -> Result<Progress, WizardError> {
    let mut asked = HashSet::new();
    for (position, turn) in history.iter().enumerate() {
        if let Some(id) = parse_marker(position, turn)? {
            asked.insert(id);
        }
    }

    Ok(Stage::ALL
        .into_iter()
        .find(|stage| !asked.contains(stage.id()))
        .map_or(Progress::Complete, Progress::Ask))
}
