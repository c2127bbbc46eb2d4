//! NPCs a character has met, with relationship tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::NpcId;

/// Default relationship label for a freshly met NPC.
pub const DEFAULT_RELATIONSHIP: &str = "neutral";

/// A character's record of an NPC they have met. At most one record
/// exists per (character, npc) pair; re-adding updates in place.
///
/// The relationship label is an open string; "friendly", "neutral" and
/// "hostile" are the conventional values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownNpc {
    pub npc_id: NpcId,
    pub name: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub location_met: String,
    pub relationship: String,
    #[serde(default)]
    pub notes: String,
    pub met_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
}

/// Payload for recording a met NPC.
#[derive(Debug, Clone, Deserialize)]
pub struct KnownNpcSummary {
    pub npc_id: NpcId,
    pub name: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub occupation: String,
    /// Defaults to the character's current location when absent.
    #[serde(default)]
    pub location_met: Option<String>,
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub notes: String,
}
