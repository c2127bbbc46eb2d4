//! Fableforge domain layer.
//!
//! Entities, value objects, and the static reference catalogs for the
//! RPG session backend. This crate is synchronous and side-effect free:
//! time is passed in by callers and randomness is injected through
//! [`RandomSource`], so every rule in here is deterministic under test.

pub mod attributes;
pub mod entities;
pub mod error;
pub mod ids;
pub mod random;
pub mod reference;
pub mod value_objects;

pub use attributes::{AttributeName, Attributes};
pub use entities::character::{Character, CharacterUpdate, NewCharacter};
pub use entities::game_session::{GameSession, NewGameSession};
pub use entities::npc::{
    InteractionEntry, MemoryEntry, NewNpc, Npc, EVOLUTION_SKILLS, NPC_MOODS,
};
pub use entities::user::User;
pub use error::DomainError;
pub use ids::{CharacterId, NpcId, SessionId, UserId};
pub use random::{RandomSource, ScriptedRandom};
pub use value_objects::inventory::{InventoryItem, ItemRarity, NewItem};
pub use value_objects::known_npc::{KnownNpc, KnownNpcSummary};
pub use value_objects::quest::{NewQuest, Quest};
pub use value_objects::story::{PlayerActionRecord, StoryEntry, StoryEntryKind};
