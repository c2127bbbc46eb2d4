//! Game session: the narrative state of one adventure.
//!
//! Owns the append-only story log, the player-action log, the world
//! state, and the quest lifecycle. A quest id is never present in both
//! the active and completed lists.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ids::{CharacterId, SessionId, UserId};
use crate::value_objects::quest::{NewQuest, Quest};
use crate::value_objects::story::{PlayerActionRecord, StoryEntry, StoryEntryKind};

#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    pub id: SessionId,
    pub user_id: UserId,
    pub character_id: CharacterId,
    pub name: String,
    pub world_setting: String,
    pub difficulty: String,
    pub current_scene: String,
    pub current_location: String,
    pub story_context: String,
    pub story_log: Vec<StoryEntry>,
    pub player_actions: Vec<PlayerActionRecord>,
    pub world_state: Map<String, Value>,
    pub active_quests: Vec<Quest>,
    pub completed_quests: Vec<Quest>,
    /// Next quest id; monotonic across completions and removals.
    pub next_quest_id: u32,
    /// Narrator personality passed to the LLM (creative, balanced, logical).
    pub narrator_personality: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_played: DateTime<Utc>,
}

/// Creation payload for a game session.
#[derive(Debug, Clone, Deserialize)]
pub struct NewGameSession {
    #[serde(alias = "session_name")]
    pub name: String,
    pub character_id: CharacterId,
    #[serde(default = "default_world_setting")]
    pub world_setting: String,
    #[serde(alias = "difficulty_level", default = "default_difficulty")]
    pub difficulty: String,
    #[serde(alias = "ai_personality", default = "default_personality")]
    pub narrator_personality: String,
}

fn default_world_setting() -> String {
    "fantasy".to_string()
}

fn default_difficulty() -> String {
    "normal".to_string()
}

fn default_personality() -> String {
    "balanced".to_string()
}

impl GameSession {
    pub fn new(user_id: UserId, req: NewGameSession, now: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::new(),
            user_id,
            character_id: req.character_id,
            name: req.name,
            world_setting: req.world_setting,
            difficulty: req.difficulty,
            current_scene: String::new(),
            current_location: String::new(),
            story_context: String::new(),
            story_log: Vec::new(),
            player_actions: Vec::new(),
            world_state: Map::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
            next_quest_id: 1,
            narrator_personality: req.narrator_personality,
            created_at: now,
            updated_at: now,
            last_played: now,
        }
    }

    /// Append a story entry; insertion order is the log's total order.
    pub fn add_story_entry(
        &mut self,
        kind: StoryEntryKind,
        content: impl Into<String>,
        actor: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.story_log.push(StoryEntry {
            timestamp: now,
            kind,
            content: content.into(),
            actor,
        });
        self.updated_at = now;
    }

    /// Append a player action to the action log.
    pub fn add_player_action(
        &mut self,
        action: impl Into<String>,
        result: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.player_actions.push(PlayerActionRecord {
            timestamp: now,
            action: action.into(),
            result,
        });
        self.updated_at = now;
    }

    /// The last `n` story entries, oldest first.
    pub fn recent_story(&self, n: usize) -> &[StoryEntry] {
        let start = self.story_log.len().saturating_sub(n);
        &self.story_log[start..]
    }

    /// Single-key world-state upsert; last write wins.
    pub fn update_world_state(
        &mut self,
        key: impl Into<String>,
        value: Value,
        now: DateTime<Utc>,
    ) {
        self.world_state.insert(key.into(), value);
        self.updated_at = now;
    }

    /// Add a quest with a fresh session-scoped id; returns the id.
    pub fn add_quest(&mut self, quest: NewQuest, now: DateTime<Utc>) -> u32 {
        let id = self.next_quest_id;
        self.next_quest_id += 1;
        self.active_quests.push(Quest {
            id,
            name: quest.name,
            description: quest.description,
            extra: quest.extra,
            created_at: now,
            completed_at: None,
        });
        self.updated_at = now;
        id
    }

    /// Move a quest from active to completed, stamping the completion
    /// time. Returns false (no-op) when the id is not active.
    pub fn complete_quest(&mut self, quest_id: u32, now: DateTime<Utc>) -> bool {
        match self.active_quests.iter().position(|q| q.id == quest_id) {
            Some(pos) => {
                let mut quest = self.active_quests.remove(pos);
                quest.completed_at = Some(now);
                self.completed_quests.push(quest);
                self.updated_at = now;
                true
            }
            None => false,
        }
    }

    /// Stamp the last-played time.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_played = now;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid")
    }

    fn session() -> GameSession {
        GameSession::new(
            UserId::new(),
            NewGameSession {
                name: "The Sunken Keep".to_string(),
                character_id: CharacterId::new(),
                world_setting: default_world_setting(),
                difficulty: default_difficulty(),
                narrator_personality: default_personality(),
            },
            now(),
        )
    }

    #[test]
    fn story_entries_preserve_call_order() {
        let mut s = session();
        let before = s.story_log.len();
        s.add_story_entry(StoryEntryKind::Narration, "You arrive at the gate.", None, now());
        s.add_story_entry(
            StoryEntryKind::PlayerAction,
            "I knock twice.",
            Some("Player".to_string()),
            now(),
        );
        assert_eq!(s.story_log.len(), before + 2);
        assert_eq!(s.story_log[0].content, "You arrive at the gate.");
        assert_eq!(s.story_log[1].content, "I knock twice.");
        assert_eq!(s.story_log[1].kind, StoryEntryKind::PlayerAction);
    }

    #[test]
    fn recent_story_returns_tail() {
        let mut s = session();
        for i in 0..8 {
            s.add_story_entry(StoryEntryKind::Narration, format!("entry {i}"), None, now());
        }
        let recent = s.recent_story(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].content, "entry 3");
        assert_eq!(recent[4].content, "entry 7");
        // Asking for more than exists returns everything.
        assert_eq!(s.recent_story(100).len(), 8);
    }

    #[test]
    fn complete_quest_moves_exactly_one() {
        let mut s = session();
        let first = s.add_quest(
            NewQuest {
                name: "Find the relic".to_string(),
                description: String::new(),
                extra: Map::new(),
            },
            now(),
        );
        let second = s.add_quest(
            NewQuest {
                name: "Clear the cellar".to_string(),
                description: String::new(),
                extra: Map::new(),
            },
            now(),
        );

        assert!(s.complete_quest(first, now()));
        assert_eq!(s.active_quests.len(), 1);
        assert_eq!(s.completed_quests.len(), 1);
        assert_eq!(s.completed_quests[0].id, first);
        assert!(s.completed_quests[0].completed_at.is_some());
        assert_eq!(s.active_quests[0].id, second);

        // Never present in both lists.
        assert!(!s.active_quests.iter().any(|q| q.id == first));
    }

    #[test]
    fn complete_unknown_quest_is_noop() {
        let mut s = session();
        assert!(!s.complete_quest(42, now()));
        assert!(s.active_quests.is_empty());
        assert!(s.completed_quests.is_empty());
    }

    #[test]
    fn quest_ids_stay_monotonic_after_completion() {
        let mut s = session();
        let first = s.add_quest(
            NewQuest {
                name: "A".to_string(),
                description: String::new(),
                extra: Map::new(),
            },
            now(),
        );
        s.complete_quest(first, now());
        let second = s.add_quest(
            NewQuest {
                name: "B".to_string(),
                description: String::new(),
                extra: Map::new(),
            },
            now(),
        );
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn quest_extra_fields_survive_completion() {
        let mut s = session();
        let mut extra = Map::new();
        extra.insert("reward".to_string(), Value::from(250));
        let id = s.add_quest(
            NewQuest {
                name: "Escort the caravan".to_string(),
                description: "To the capital".to_string(),
                extra,
            },
            now(),
        );
        s.complete_quest(id, now());
        assert_eq!(s.completed_quests[0].extra["reward"], Value::from(250));
        assert_eq!(s.completed_quests[0].description, "To the capital");
    }

    #[test]
    fn world_state_last_write_wins() {
        let mut s = session();
        s.update_world_state("weather", Value::from("rain"), now());
        s.update_world_state("weather", Value::from("storm"), now());
        assert_eq!(s.world_state["weather"], Value::from("storm"));
        assert_eq!(s.world_state.len(), 1);
    }
}
