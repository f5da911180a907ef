//! The fixed question catalog.

use crate::stage::{Progress, Stage};

/// Shown once every stage has been asked, and for any unrecognized stage id.
pub const COMPLETION_MESSAGE: &str =
    "All stages are complete. Would you like to review your challenge configuration?";

impl Stage {
    /// The canonical question presented for this stage.
    pub fn question(self) -> &'static str {
        match self {
            Stage::Description => "Please describe your challenge.",
            Stage::Type => {
                "What type of challenge is this (e.g., Ideation, Design, Development, Data Science)?"
            }
            Stage::Goals => {
                "How does this challenge align with your organization's innovation goals?"
            }
            Stage::Prize => concat!(
                "How would you like to set up the prize structure (e.g., single winner, tiered, milestones)? ",
                "Consider estimating prize amounts based on time, costs, effort, and expertise required. ",
                "You can also index prizes from similar challenges on platforms like Kaggle or InnoCentive."
            ),
            Stage::Timeline => concat!(
                "What are the start and end dates for the challenge? ",
                "Would you like to define intermediate milestones (e.g., registration, submission, review)?"
            ),
            Stage::Evaluation => concat!(
                "What evaluation model will you use (e.g., rolling or post-submission)? ",
                "Please define reviewer roles, criteria, and whether you'd like peer review, ",
                "automated AI review, or custom rubrics."
            ),
            Stage::Monitoring => concat!(
                "How would you like to handle announcements and updates during the challenge? ",
                "Regular updates can keep participants engaged and informed."
            ),
        }
    }
}

/// Question text for a pipeline position. Total: `Complete` yields the
/// completion message.
pub fn question_for(progress: Progress) -> &'static str {
    match progress {
        Progress::Ask(stage) => stage.question(),
        Progress::Complete => COMPLETION_MESSAGE,
    }
}

/// Question text for a raw stage id; unknown ids fall back to the
/// completion message.
pub fn question_for_id(id: &str) -> &'static str {
    Progress::from_id(id).map_or(COMPLETION_MESSAGE, question_for)
}
