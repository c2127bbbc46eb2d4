//! Non-player characters owned by a game session.
//!
//! NPCs carry personality data for the LLM, append-only memory and
//! interaction logs, and evolve stochastically through an injected
//! random source so the probability branches are testable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::attributes::Attributes;
use crate::ids::{NpcId, SessionId};
use crate::random::RandomSource;

/// Skills an NPC can pick up through evolution.
pub const EVOLUTION_SKILLS: [&str; 6] = [
    "Observation",
    "Persuasion",
    "Stealth",
    "Combat",
    "Magic",
    "Crafting",
];

/// Moods an NPC can shift into.
pub const NPC_MOODS: [&str; 6] = [
    "happy",
    "neutral",
    "sad",
    "irritated",
    "excited",
    "thoughtful",
];

/// Reputation bounds; every mutation clamps into this range.
pub const REPUTATION_MIN: i32 = -100;
pub const REPUTATION_MAX: i32 = 100;

/// Default activity for a freshly created NPC.
pub const DEFAULT_ACTIVITY: &str = "Exploring";

/// Memory-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub timestamp: DateTime<Utc>,
    pub event: String,
}

/// Interaction-history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub timestamp: DateTime<Utc>,
    pub interaction: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Npc {
    pub id: NpcId,
    pub session_id: SessionId,
    pub name: String,
    pub race: String,
    pub occupation: String,
    pub attributes: Attributes,
    pub personality_traits: Vec<String>,
    pub goals_short_term: Vec<String>,
    pub goals_long_term: Vec<String>,
    pub fears: Vec<String>,
    /// Relationship map: entity name -> free-form descriptor.
    pub relationships: Map<String, Value>,
    pub memory_log: Vec<MemoryEntry>,
    pub interaction_history: Vec<InteractionEntry>,
    pub current_location: String,
    pub current_activity: String,
    pub mood: String,
    pub reputation: i32,
    pub skill_points: i32,
    pub learned_skills: Vec<String>,
    pub physical_description: String,
    pub clothing_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_interaction: DateTime<Utc>,
}

/// Creation payload. Attribute overrides apply only to recognized
/// attribute names; unknown names are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewNpc {
    pub name: String,
    #[serde(default = "default_race")]
    pub race: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub attributes: HashMap<String, i32>,
    #[serde(default)]
    pub personality_traits: Vec<String>,
    #[serde(default)]
    pub goals_short_term: Vec<String>,
    #[serde(default)]
    pub goals_long_term: Vec<String>,
    #[serde(default)]
    pub fears: Vec<String>,
    /// Defaults to the session's current location when absent.
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub current_activity: Option<String>,
    #[serde(default)]
    pub physical_description: String,
    #[serde(default)]
    pub clothing_description: String,
}

fn default_race() -> String {
    "human".to_string()
}

impl Npc {
    pub fn new(
        session_id: SessionId,
        req: NewNpc,
        session_location: &str,
        now: DateTime<Utc>,
    ) -> Self {
        let mut attributes = Attributes::default();
        for (name, value) in &req.attributes {
            if let Some(attr) = crate::attributes::AttributeName::parse(name) {
                attributes.set(attr, *value);
            }
        }
        Self {
            id: NpcId::new(),
            session_id,
            name: req.name,
            race: req.race,
            occupation: req.occupation,
            attributes,
            personality_traits: req.personality_traits,
            goals_short_term: req.goals_short_term,
            goals_long_term: req.goals_long_term,
            fears: req.fears,
            relationships: Map::new(),
            memory_log: Vec::new(),
            interaction_history: Vec::new(),
            current_location: req
                .current_location
                .unwrap_or_else(|| session_location.to_string()),
            current_activity: req
                .current_activity
                .unwrap_or_else(|| DEFAULT_ACTIVITY.to_string()),
            mood: "neutral".to_string(),
            reputation: 0,
            skill_points: 0,
            learned_skills: Vec::new(),
            physical_description: req.physical_description,
            clothing_description: req.clothing_description,
            created_at: now,
            updated_at: now,
            last_interaction: now,
        }
    }

    /// Append a memory-log entry, stamped with the current time.
    pub fn add_memory(&mut self, event: impl Into<String>, now: DateTime<Utc>) {
        self.memory_log.push(MemoryEntry {
            timestamp: now,
            event: event.into(),
        });
        self.updated_at = now;
    }

    /// Append an interaction-history entry.
    pub fn add_interaction(&mut self, interaction: impl Into<String>, now: DateTime<Utc>) {
        self.interaction_history.push(InteractionEntry {
            timestamp: now,
            interaction: interaction.into(),
        });
        self.updated_at = now;
    }

    /// Learn a skill; idempotent. Returns true when newly learned.
    pub fn learn_skill(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        if self.learned_skills.contains(&skill) {
            return false;
        }
        self.learned_skills.push(skill);
        true
    }

    /// Adjust reputation, clamping to [-100, 100].
    pub fn adjust_reputation(&mut self, delta: i32) {
        self.reputation = (self.reputation + delta).clamp(REPUTATION_MIN, REPUTATION_MAX);
    }

    /// One evolution step: three independent probability checks against
    /// the injected random source, in a fixed draw order (skill point,
    /// new skill, mood). Returns a description for each check that fired.
    pub fn evolve(&mut self, rng: &dyn RandomSource, now: DateTime<Utc>) -> Vec<String> {
        let mut changes = Vec::new();

        if rng.roll() < 0.10 {
            self.skill_points += 1;
            changes.push(format!("{} gained a skill point", self.name));
        }

        if rng.roll() < 0.05 {
            let available: Vec<&str> = EVOLUTION_SKILLS
                .iter()
                .copied()
                .filter(|s| !self.learned_skills.iter().any(|k| k == s))
                .collect();
            if !available.is_empty() {
                let skill = available[rng.pick(available.len())];
                self.learn_skill(skill);
                changes.push(format!("{} learned {}", self.name, skill));
            }
        }

        if rng.roll() < 0.20 {
            self.mood = NPC_MOODS[rng.pick(NPC_MOODS.len())].to_string();
            changes.push(format!("{} is feeling {}", self.name, self.mood));
        }

        if !changes.is_empty() {
            self.updated_at = now;
        }
        changes
    }
}
