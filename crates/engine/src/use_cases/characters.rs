//! Character ledger operations.

use std::sync::Arc;

use crate::infrastructure::ports::{CharacterRepo, ClockPort, RepoError};
use crate::use_cases::locks::CharacterLocks;
use fableforge_domain::{
    Character, CharacterId, CharacterUpdate, DomainError, KnownNpcSummary, NewCharacter, NpcId,
    UserId,
};

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct CharacterService {
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    locks: CharacterLocks,
}

impl CharacterService {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        locks: CharacterLocks,
    ) -> Self {
        Self {
            characters,
            clock,
            locks,
        }
    }

    /// Create a character with derived stats and persist it.
    pub async fn create(
        &self,
        user_id: UserId,
        req: NewCharacter,
    ) -> Result<Character, CharacterError> {
        let character = Character::create(user_id, req, self.clock.now())?;
        self.characters.save(&character).await?;
        tracing::info!(character_id = %character.id, "created character");
        Ok(character)
    }

    pub async fn list(&self, user_id: UserId) -> Result<Vec<Character>, CharacterError> {
        Ok(self.characters.list_for_user(user_id).await?)
    }

    /// Fetch a character, treating another user's character as absent.
    pub async fn get(
        &self,
        user_id: UserId,
        id: CharacterId,
    ) -> Result<Character, CharacterError> {
        match self.characters.get(id).await? {
            Some(character) if character.user_id == user_id => Ok(character),
            _ => Err(DomainError::not_found("Character", id).into()),
        }
    }

    /// Whitelist partial update; collection fields replace wholesale.
    pub async fn update(
        &self,
        user_id: UserId,
        id: CharacterId,
        update: CharacterUpdate,
    ) -> Result<Character, CharacterError> {
        let _guard = self.locks.acquire(id).await;
        let mut character = self.get(user_id, id).await?;
        character.apply_update(update, self.clock.now());
        self.characters.save(&character).await?;
        Ok(character)
    }

    pub async fn delete(&self, user_id: UserId, id: CharacterId) -> Result<(), CharacterError> {
        self.get(user_id, id).await?;
        self.characters.delete(id).await?;
        Ok(())
    }

    /// Record a met NPC; re-adding an already-known NPC updates the
    /// existing record.
    pub async fn add_known_npc(
        &self,
        user_id: UserId,
        id: CharacterId,
        summary: KnownNpcSummary,
    ) -> Result<Character, CharacterError> {
        let _guard = self.locks.acquire(id).await;
        let mut character = self.get(user_id, id).await?;
        character.add_known_npc(summary, self.clock.now());
        self.characters.save(&character).await?;
        Ok(character)
    }

    /// Update the relationship label for a known NPC; unknown NPC ids
    /// are a silent no-op.
    pub async fn update_npc_relationship(
        &self,
        user_id: UserId,
        id: CharacterId,
        npc_id: NpcId,
        relationship: String,
        notes: Option<String>,
    ) -> Result<Character, CharacterError> {
        let _guard = self.locks.acquire(id).await;
        let mut character = self.get(user_id, id).await?;
        character.update_npc_relationship(npc_id, relationship, notes, self.clock.now());
        self.characters.save(&character).await?;
        Ok(character)
    }
}
