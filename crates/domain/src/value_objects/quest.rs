//! Quest lifecycle: active until completed, never both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A quest in a game session. `id` is session-scoped and assigned from a
/// monotonic counter. Completion stamps `completed_at` and preserves all
/// other fields, including caller-supplied extras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quest {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload for adding a quest; unrecognized fields are preserved
/// verbatim on the stored quest.
#[derive(Debug, Clone, Deserialize)]
pub struct NewQuest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
