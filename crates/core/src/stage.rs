//! Interview stages and the `question_asked` marker convention.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::error::WizardError;
use crate::message::{Role, Turn};

/// Substring that identifies a stage marker in a system turn.
pub const MARKER_TAG: &str = "question_asked";

const MARKER_SEPARATOR: &str = ": ";

const PROGRESS_IDS: &[&str] = &[
    "description",
    "type",
    "goals",
    "prize",
    "timeline",
    "evaluation",
    "monitoring",
    "complete",
];

/// One topic of the seven-step challenge interview.
///
/// Declaration order is interview order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Description,
    Type,
    Goals,
    Prize,
    Timeline,
    Evaluation,
    Monitoring,
}

impl Stage {
    /// All stages in the order they are asked.
    pub const ALL: [Stage; 7] = [
        Stage::Description,
        Stage::Type,
        Stage::Goals,
        Stage::Prize,
        Stage::Timeline,
        Stage::Evaluation,
        Stage::Monitoring,
    ];

    /// The wire identifier used in markers and API responses.
    pub fn id(self) -> &'static str {
        match self {
            Stage::Description => "description",
            Stage::Type => "type",
            Stage::Goals => "goals",
            Stage::Prize => "prize",
            Stage::Timeline => "timeline",
            Stage::Evaluation => "evaluation",
            Stage::Monitoring => "monitoring",
        }
    }

    /// Look up a stage by its wire identifier. Exact, case-sensitive match.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|stage| stage.id() == id)
    }

    /// Human-readable label used in the narrative prompt.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Description => "Description",
            Stage::Type => "Type",
            Stage::Goals => "Goals",
            Stage::Prize => "Prize Structure",
            Stage::Timeline => "Timeline",
            Stage::Evaluation => "Evaluation",
            Stage::Monitoring => "Monitoring",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Position in the interview pipeline: the next stage to ask, or done.
///
/// Serializes as the bare stage id, or `"complete"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Progress {
    Ask(Stage),
    Complete,
}

impl Progress {
    pub fn id(self) -> &'static str {
        match self {
            Progress::Ask(stage) => stage.id(),
            Progress::Complete => "complete",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        if id == "complete" {
            return Some(Progress::Complete);
        }
        Stage::from_id(id).map(Progress::Ask)
    }

    pub fn stage(self) -> Option<Stage> {
        match self {
            Progress::Ask(stage) => Some(stage),
            Progress::Complete => None,
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, Progress::Complete)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for Progress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Progress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Progress::from_id(&id).ok_or_else(|| de::Error::unknown_variant(&id, PROGRESS_IDS))
    }
}

/// Read the stage id carried by a marker turn.
///
/// Returns `Ok(None)` for turns that are not markers (any non-system turn,
/// or a system turn without `question_asked`). The id is returned raw and
/// may name an unknown stage. A marker that does not split on `": "` into
/// exactly two parts is rejected; `position` is the turn's index in the
/// history and is carried in the error.
pub fn parse_marker(position: usize, turn: &Turn) -> Result<Option<&str>, WizardError> {
    if turn.role != Role::System || !turn.content.contains(MARKER_TAG) {
        return Ok(None);
    }

    let mut parts = turn.content.split(MARKER_SEPARATOR);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(id), None) => Ok(Some(id)),
        _ => Err(WizardError::MalformedMarker {
            position,
            content: turn.content.clone(),
        }),
    }
}
