//! Repository port traits for database access.
//!
//! One port per entity type. Every mutating operation persists the
//! entity's full state in one atomic write; `SessionRepo::save_with_npcs`
//! commits a whole player-action turn or nothing.

use async_trait::async_trait;

use fableforge_domain::{
    Character, CharacterId, GameSession, Npc, NpcId, SessionId, User, UserId,
};

use super::error::RepoError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;
    /// Matches either field; used for duplicate checks at registration.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepoError>;
    async fn save(&self, user: &User) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Character>, RepoError>;
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepo: Send + Sync {
    async fn get(&self, id: SessionId) -> Result<Option<GameSession>, RepoError>;
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<GameSession>, RepoError>;
    async fn save(&self, session: &GameSession) -> Result<(), RepoError>;
    /// Persist a session and the touched NPCs as one transaction.
    async fn save_with_npcs(
        &self,
        session: &GameSession,
        npcs: &[Npc],
    ) -> Result<(), RepoError>;
    /// Delete the session and cascade-delete its NPCs.
    async fn delete(&self, id: SessionId) -> Result<(), RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NpcRepo: Send + Sync {
    async fn get(&self, id: NpcId) -> Result<Option<Npc>, RepoError>;
    /// NPCs of a session in creation order.
    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<Npc>, RepoError>;
    async fn save(&self, npc: &Npc) -> Result<(), RepoError>;
    async fn save_all(&self, npcs: &[Npc]) -> Result<(), RepoError>;
}
