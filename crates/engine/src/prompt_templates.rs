//! Prompt templates and generation parameters for the LLM collaborator.
//!
//! The prompts describe WHAT the narrator should produce; the
//! temperature and token tables pick how loose each response type is
//! allowed to be.

use fableforge_domain::{Character, GameSession, Npc};

/// System prompt for the game master across all narrative calls.
pub const GAME_MASTER_SYSTEM_PROMPT: &str = "\
You are an experienced tabletop RPG game master running an immersive \
medieval fantasy adventure.

Core principles:
1. Total realism: treat every aspect of the world naturally and maturely.
2. NPCs are complete people with desires, fears, ambitions, secrets, and \
vulnerabilities.
3. Every action has logical, natural consequences.
4. The world is alive: events happen independently of the player, and \
NPCs lead their own lives.
5. Relationships evolve dynamically; let chemistry, rivalry, and \
misunderstandings develop naturally.
6. Be surprising but always coherent with established personalities.

Narration style: sensory detail, focus on motivations and emotions, \
natural expressive dialogue, a dynamic rhythm between action and \
character development.";

/// System prompt for shop catalog generation; the reply must be strict JSON.
pub const SHOP_SYSTEM_PROMPT: &str = "\
You are an expert at creating items for a medieval fantasy RPG. \
Always reply with valid JSON only.";

/// Temperatures per response type.
pub mod temperature {
    /// Creative narration
    pub const NARRATIVE: f32 = 0.8;
    /// NPC dialogue
    pub const DIALOGUE: f32 = 0.7;
    /// World events happening off-screen
    pub const WORLD_EVENTS: f32 = 0.9;
    /// Logical consequences
    pub const CONSEQUENCES: f32 = 0.5;
    /// Shop catalog generation
    pub const SHOP_CATALOG: f32 = 0.8;
}

/// Max-token budgets per response type.
pub mod max_tokens {
    pub const SHORT_RESPONSE: u32 = 300;
    pub const MEDIUM_RESPONSE: u32 = 600;
    pub const LONG_RESPONSE: u32 = 1000;
    pub const DETAILED_SCENE: u32 = 1200;
    pub const SHOP_CATALOG: u32 = 1500;
}

/// Opening scene for a freshly created session.
pub fn opening_scene_prompt(character: &Character, session: &GameSession) -> String {
    format!(
        "Create the introduction for a new RPG adventure.\n\
         Character: {} (level {} {} {})\n\
         Setting: {}\n\
         Difficulty: {}\n\n\
         Write an engaging opening scene that establishes the setting and \
         presents the first challenge or opportunity.",
        character.name,
        character.level,
        character.race,
        character.class,
        session.world_setting,
        session.difficulty,
    )
}

/// Context block for a player-action narration call: story context,
/// scene, location, and the last five story-log entries.
pub fn session_context(session: &GameSession) -> String {
    let recent = session
        .recent_story(5)
        .iter()
        .map(|e| {
            format!(
                "[{}] {}: {}",
                e.kind,
                e.actor.as_deref().unwrap_or("narrator"),
                e.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Story context: {}\n\
         Current scene: {}\n\
         Location: {}\n\
         Recent log entries:\n{}",
        session.story_context, session.current_scene, session.current_location, recent,
    )
}

/// Instruction for narrating the consequence of a player action.
pub fn player_action_prompt(action: &str) -> String {
    format!(
        "The player performed the following action: \"{action}\"\n\n\
         As the game master, respond to this action:\n\
         1. Describe the result of the action\n\
         2. Advance the narrative\n\
         3. Present the new situation\n\
         4. Offer options or challenges for the next move\n\n\
         Keep the response engaging and between 100-200 words."
    )
}

/// Context block describing an NPC for autonomous-action generation.
pub fn npc_context(npc: &Npc, session: &GameSession) -> String {
    format!(
        "NPC: {} ({}, {})\n\
         Personality: {}\n\
         Short-term goals: {}\n\
         Long-term goals: {}\n\
         Current location: {}\n\
         Current activity: {}\n\
         Mood: {}\n\
         Relationships: {}\n\n\
         Game context: {}\n\
         Current story location: {}",
        npc.name,
        npc.race,
        npc.occupation,
        npc.personality_traits.join(", "),
        npc.goals_short_term.join(", "),
        npc.goals_long_term.join(", "),
        npc.current_location,
        npc.current_activity,
        npc.mood,
        serde_json::Value::Object(npc.relationships.clone()),
        session.story_context,
        session.current_location,
    )
}

/// Instruction for one autonomous NPC action.
pub const NPC_ACTION_INSTRUCTION: &str = "\
Based on the NPC context above, generate one realistic autonomous action \
this NPC would take. The NPC is a complete person with real desires, \
fears, passions, and needs; complex and sometimes contradictory \
motivations; and personal relationships and conflicts. The action must \
be consistent with their personality and situation, realistic for a \
medieval world, potentially surprising but always logical, and able to \
create new interaction opportunities. Reply with only the action \
description, in 2-3 detailed sentences.";

/// Generic action used when the LLM cannot be reached.
pub fn npc_fallback_action(npc_name: &str) -> String {
    format!(
        "{npc_name} continues their usual activities, lost in thought \
         about their own desires and concerns."
    )
}

/// Degraded narration used when the LLM cannot be reached.
pub const NARRATION_FALLBACK: &str = "\
The world seems to hold its breath for a moment. Your action is noted, \
but its consequences remain unclear for now. Try again shortly.";

/// Degraded opening scene used when the LLM cannot be reached.
pub const OPENING_SCENE_FALLBACK: &str = "\
Your adventure begins on a quiet road at the edge of a small village, \
the air thick with the promise of things to come. A weathered signpost \
points toward the village square, where voices and woodsmoke rise.";

/// Prompt for generating a shop catalog as strict JSON.
pub fn shop_catalog_prompt(location: &str, character_level: i32, shop_type: &str) -> String {
    format!(
        "You are an RPG game master stocking a shop in a medieval fantasy \
         world.\n\n\
         Location: {location}\n\
         Character level: {character_level}\n\
         Shop type: {shop_type}\n\n\
         Create 8-12 unique, interesting items for this shop. Items must \
         suit the location, the character's level (stronger items for \
         higher levels), and the medieval fantasy setting.\n\n\
         For each item provide: a creative thematic name, a detailed \
         description (2-3 sentences), a type (weapon, armor, potion, \
         scroll, misc, accessory), a gold price balanced for the level, a \
         rarity (common, uncommon, rare, epic, legendary), and any special \
         properties.\n\n\
         Reply ONLY with valid JSON in this format:\n\
         {{\n  \"items\": [\n    {{\n      \"name\": \"Item Name\",\n      \
         \"description\": \"Detailed item description\",\n      \
         \"type\": \"weapon\",\n      \"price\": 150,\n      \
         \"rarity\": \"uncommon\",\n      \"properties\": {{\n        \
         \"damage\": \"+2\"\n      }}\n    }}\n  ]\n}}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use fableforge_domain::{NewCharacter, NewGameSession, StoryEntryKind, UserId};

    fn fixtures() -> (Character, GameSession) {
        let character = Character::create(
            UserId::new(),
            NewCharacter {
                name: "Aldric".to_string(),
                race: "human".to_string(),
                class: "warrior".to_string(),
                attribute_points: Default::default(),
                advantages: vec![],
                disadvantages: vec![],
                background: String::new(),
                notes: String::new(),
            },
            Utc::now(),
        )
        .expect("valid");
        let session = GameSession::new(
            character.user_id,
            NewGameSession {
                name: "Test".to_string(),
                character_id: character.id,
                world_setting: "fantasy".to_string(),
                difficulty: "normal".to_string(),
                narrator_personality: "balanced".to_string(),
            },
            Utc::now(),
        );
        (character, session)
    }

    #[test]
    fn opening_scene_mentions_character() {
        let (character, session) = fixtures();
        let prompt = opening_scene_prompt(&character, &session);
        assert!(prompt.contains("Aldric"));
        assert!(prompt.contains("warrior"));
    }

    #[test]
    fn session_context_includes_only_recent_entries() {
        let (_, mut session) = fixtures();
        for i in 0..7 {
            session.add_story_entry(StoryEntryKind::Narration, format!("entry {i}"), None, Utc::now());
        }
        let context = session_context(&session);
        assert!(!context.contains("entry 1"));
        assert!(context.contains("entry 2"));
        assert!(context.contains("entry 6"));
    }

    #[test]
    fn shop_prompt_embeds_parameters() {
        let prompt = shop_catalog_prompt("Dustfall Capital", 4, "blacksmith");
        assert!(prompt.contains("Dustfall Capital"));
        assert!(prompt.contains("blacksmith"));
        assert!(prompt.contains("\"items\""));
    }
}
