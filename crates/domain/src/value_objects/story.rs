//! Story log and player-action log entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of story-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryEntryKind {
    Narration,
    PlayerAction,
    NpcAction,
    System,
}

impl std::fmt::Display for StoryEntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Narration => "narration",
            Self::PlayerAction => "player_action",
            Self::NpcAction => "npc_action",
            Self::System => "system",
        };
        write!(f, "{s}")
    }
}

/// One entry in the append-only story log. Insertion order is the log's
/// total order; entries are never reordered or deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: StoryEntryKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

/// One entry in the append-only player-action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerActionRecord {
    pub timestamp: DateTime<Utc>,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}
