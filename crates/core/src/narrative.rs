//! Narrative prompt assembly.

use crate::answers::Answers;

/// Printed in place of an empty answer.
pub const NOT_PROVIDED: &str = "Not provided";

const NARRATIVE_INSTRUCTIONS: &str = concat!(
    "You are a master storyteller and a marketing expert for a crowdsourcing platform. ",
    "Your task is to craft a compelling, inspiring, and concise narrative for a new innovation challenge. ",
    "Use the following details to create a story that excites potential participants and clearly ",
    "communicates the challenge's purpose and impact. ",
    "Focus on the 'why' and the potential for change, not just the 'what'. ",
    "Do not include any conversational elements or questions in your response, just the narrative."
);

const NARRATIVE_DIRECTIVE: &str = "Please generate the challenge narrative:";

/// Build the prompt asking the backend for a promotional challenge narrative.
pub fn build_narrative_prompt(answers: &Answers) -> String {
    let mut prompt = format!("{NARRATIVE_INSTRUCTIONS}\n\nHere are the challenge details:\n");

    for (stage, answer) in answers.iter() {
        let value = if answer.is_empty() { NOT_PROVIDED } else { answer };
        prompt.push_str(&format!("{}: {value}\n", stage.label()));
    }

    prompt.push('\n');
    prompt.push_str(NARRATIVE_DIRECTIVE);
    prompt
}
