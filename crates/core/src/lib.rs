//! # CrowdWiz Core
//!
//! Domain types, traits, and the interview engine for the CrowdWiz
//! challenge-definition wizard. This crate performs **no I/O**; it defines
//! the domain model that the provider, store, and gateway crates build on.
//!
//! ## The engine
//!
//! Every engine operation is a pure function of the caller-supplied
//! conversation history:
//!
//! - [`next_stage`]: which interview stage comes next
//! - [`question_for`]: the canonical question for a stage
//! - [`build_prompt`]: the flat prompt sent to the generation backend
//! - [`extract_answers`]: per-stage answers recovered from the history
//! - [`build_narrative_prompt`]: the prompt for the promotional narrative
//!
//! There is no stored cursor: the interview position is recomputed from the
//! `question_asked: <stage>` markers on every call.

pub mod error;
pub mod message;
pub mod stage;
pub mod catalog;
pub mod tracker;
pub mod prompt;
pub mod answers;
pub mod narrative;
pub mod provider;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result, ProviderError, StoreError, WizardError};
pub use message::{Role, Turn};
pub use stage::{Progress, Stage};
pub use catalog::{question_for, COMPLETION_MESSAGE};
pub use tracker::next_stage;
pub use prompt::{build_prompt, InterviewPrompt};
pub use answers::{extract_answers, Answers};
pub use narrative::build_narrative_prompt;
pub use provider::{GenerateRequest, GenerateResponse, Provider, Usage};
pub use store::{ConversationRecord, ConversationStore};
