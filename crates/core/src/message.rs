//! Conversation turn types.
//!
//! A history is a plain `&[Turn]` in chronological order. The caller owns it;
//! the engine only reads it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stage::{Stage, MARKER_TAG};

/// The role of a turn's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person defining the challenge
    User,
    /// The generation backend
    Assistant,
    /// Bookkeeping notes such as stage markers; never shown to the model
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    /// The system note recording that `stage`'s question was presented.
    pub fn marker(stage: Stage) -> Self {
        Self::system(format!("{MARKER_TAG}: {}", stage.id()))
    }
}
