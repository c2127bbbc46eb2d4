//! JSON response shapes.
//!
//! Entities serialize through DTOs so the wire format stays stable and
//! internal-only fields (password hashes, id counters) never leak.

use serde::Serialize;
use serde_json::{Map, Value};

use fableforge_domain::{
    Attributes, Character, GameSession, InteractionEntry, InventoryItem, KnownNpc, MemoryEntry,
    Npc, PlayerActionRecord, Quest, StoryEntry, User,
};

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            created_at: user.created_at.to_rfc3339(),
            last_login: user.last_login.map(|t| t.to_rfc3339()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthDto {
    pub current_hp: i32,
    pub max_hp: i32,
    pub current_mp: i32,
    pub max_mp: i32,
}

#[derive(Debug, Serialize)]
pub struct CharacterDto {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub race: String,
    pub character_class: String,
    pub level: i32,
    pub experience: i32,
    pub attributes: Attributes,
    pub health: HealthDto,
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub equipment: Map<String, Value>,
    pub inventory: Vec<InventoryItem>,
    pub gold: i64,
    pub known_npcs: Vec<KnownNpc>,
    pub background: String,
    pub notes: String,
    pub current_location: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Character> for CharacterDto {
    fn from(c: &Character) -> Self {
        Self {
            id: c.id.to_string(),
            user_id: c.user_id.to_string(),
            name: c.name.clone(),
            race: c.race.clone(),
            character_class: c.class.clone(),
            level: c.level,
            experience: c.experience,
            attributes: c.attributes,
            health: HealthDto {
                current_hp: c.current_hp,
                max_hp: c.max_hp,
                current_mp: c.current_mp,
                max_mp: c.max_mp,
            },
            advantages: c.advantages.clone(),
            disadvantages: c.disadvantages.clone(),
            equipment: c.equipment.clone(),
            inventory: c.inventory.clone(),
            gold: c.gold,
            known_npcs: c.known_npcs.clone(),
            background: c.background.clone(),
            notes: c.notes.clone(),
            current_location: c.current_location.clone(),
            created_at: c.created_at.to_rfc3339(),
            updated_at: c.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub id: String,
    pub user_id: String,
    pub character_id: String,
    pub session_name: String,
    pub world_setting: String,
    pub difficulty_level: String,
    pub current_scene: String,
    pub current_location: String,
    pub story_context: String,
    pub story_log: Vec<StoryEntry>,
    pub player_actions: Vec<PlayerActionRecord>,
    pub world_state: Map<String, Value>,
    pub active_quests: Vec<Quest>,
    pub completed_quests: Vec<Quest>,
    pub narrator_personality: String,
    pub created_at: String,
    pub updated_at: String,
    pub last_played: String,
}

impl From<&GameSession> for SessionDto {
    fn from(s: &GameSession) -> Self {
        Self {
            id: s.id.to_string(),
            user_id: s.user_id.to_string(),
            character_id: s.character_id.to_string(),
            session_name: s.name.clone(),
            world_setting: s.world_setting.clone(),
            difficulty_level: s.difficulty.clone(),
            current_scene: s.current_scene.clone(),
            current_location: s.current_location.clone(),
            story_context: s.story_context.clone(),
            story_log: s.story_log.clone(),
            player_actions: s.player_actions.clone(),
            world_state: s.world_state.clone(),
            active_quests: s.active_quests.clone(),
            completed_quests: s.completed_quests.clone(),
            narrator_personality: s.narrator_personality.clone(),
            created_at: s.created_at.to_rfc3339(),
            updated_at: s.updated_at.to_rfc3339(),
            last_played: s.last_played.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NpcPersonalityDto {
    pub traits: Vec<String>,
    pub goals_short_term: Vec<String>,
    pub goals_long_term: Vec<String>,
    pub fears: Vec<String>,
    pub relationships: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct NpcStatusDto {
    pub current_location: String,
    pub current_activity: String,
    pub mood: String,
    pub reputation: i32,
}

#[derive(Debug, Serialize)]
pub struct NpcAppearanceDto {
    pub physical_description: String,
    pub clothing_description: String,
}

#[derive(Debug, Serialize)]
pub struct NpcDto {
    pub id: String,
    pub game_session_id: String,
    pub name: String,
    pub race: String,
    pub occupation: String,
    pub attributes: Attributes,
    pub personality: NpcPersonalityDto,
    pub status: NpcStatusDto,
    pub appearance: NpcAppearanceDto,
    pub memory_log: Vec<MemoryEntry>,
    pub interaction_history: Vec<InteractionEntry>,
    pub learned_skills: Vec<String>,
    pub skill_points: i32,
    pub created_at: String,
    pub updated_at: String,
    pub last_interaction: String,
}

impl From<&Npc> for NpcDto {
    fn from(n: &Npc) -> Self {
        Self {
            id: n.id.to_string(),
            game_session_id: n.session_id.to_string(),
            name: n.name.clone(),
            race: n.race.clone(),
            occupation: n.occupation.clone(),
            attributes: n.attributes,
            personality: NpcPersonalityDto {
                traits: n.personality_traits.clone(),
                goals_short_term: n.goals_short_term.clone(),
                goals_long_term: n.goals_long_term.clone(),
                fears: n.fears.clone(),
                relationships: n.relationships.clone(),
            },
            status: NpcStatusDto {
                current_location: n.current_location.clone(),
                current_activity: n.current_activity.clone(),
                mood: n.mood.clone(),
                reputation: n.reputation,
            },
            appearance: NpcAppearanceDto {
                physical_description: n.physical_description.clone(),
                clothing_description: n.clothing_description.clone(),
            },
            memory_log: n.memory_log.clone(),
            interaction_history: n.interaction_history.clone(),
            learned_skills: n.learned_skills.clone(),
            skill_points: n.skill_points,
            created_at: n.created_at.to_rfc3339(),
            updated_at: n.updated_at.to_rfc3339(),
            last_interaction: n.last_interaction.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fableforge_domain::NewCharacter;

    #[test]
    fn character_dto_mirrors_entity() {
        let character = Character::create(
            fableforge_domain::UserId::new(),
            NewCharacter {
                name: "Sylvara".to_string(),
                race: "elf".to_string(),
                class: "mage".to_string(),
                attribute_points: Default::default(),
                advantages: vec!["lucky".to_string()],
                disadvantages: vec![],
                background: String::new(),
                notes: String::new(),
            },
            Utc::now(),
        )
        .expect("valid");

        let dto = CharacterDto::from(&character);
        let json = serde_json::to_value(&dto).expect("serializes");

        assert_eq!(json["character_class"], "mage");
        assert_eq!(json["health"]["max_mp"], 36);
        assert_eq!(json["attributes"]["dexterity"], 12);
        assert_eq!(json["advantages"][0], "lucky");
        // The id counter is internal and must not appear.
        assert!(json.get("next_item_id").is_none());
    }
}
