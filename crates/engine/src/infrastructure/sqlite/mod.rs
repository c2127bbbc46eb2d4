//! SQLite-backed repositories.
//!
//! Collection-shaped fields (inventory, logs, quests, world state) are
//! stored as JSON text columns; scalars get their own columns. Every
//! save writes the entity's full row in one statement, and multi-entity
//! writes (a player-action turn, a cascade delete) run in explicit
//! transactions.

mod character_repo;
mod npc_repo;
mod session_repo;
mod user_repo;

pub use character_repo::SqliteCharacterRepo;
pub use npc_repo::SqliteNpcRepo;
pub use session_repo::SqliteSessionRepo;
pub use user_repo::SqliteUserRepo;

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use super::ports::RepoError;

/// Open (or create) the database at `db_path` with foreign keys on.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
        .map_err(|e| RepoError::database("connect", e))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and indexes if they do not exist.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_login TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS characters (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            name TEXT NOT NULL,
            race TEXT NOT NULL,
            class TEXT NOT NULL,
            level INTEGER NOT NULL,
            experience INTEGER NOT NULL,
            attributes_json TEXT NOT NULL,
            current_hp INTEGER NOT NULL,
            max_hp INTEGER NOT NULL,
            current_mp INTEGER NOT NULL,
            max_mp INTEGER NOT NULL,
            gold INTEGER NOT NULL,
            next_item_id INTEGER NOT NULL,
            inventory_json TEXT NOT NULL,
            equipment_json TEXT NOT NULL,
            advantages_json TEXT NOT NULL,
            disadvantages_json TEXT NOT NULL,
            known_npcs_json TEXT NOT NULL,
            background TEXT NOT NULL,
            notes TEXT NOT NULL,
            current_location TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_characters_user ON characters(user_id)
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS game_sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id),
            character_id TEXT NOT NULL REFERENCES characters(id),
            name TEXT NOT NULL,
            world_setting TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            current_scene TEXT NOT NULL,
            current_location TEXT NOT NULL,
            story_context TEXT NOT NULL,
            story_log_json TEXT NOT NULL,
            player_actions_json TEXT NOT NULL,
            world_state_json TEXT NOT NULL,
            active_quests_json TEXT NOT NULL,
            completed_quests_json TEXT NOT NULL,
            next_quest_id INTEGER NOT NULL,
            narrator_personality TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_played TEXT NOT NULL
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_sessions_user ON game_sessions(user_id)
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS npcs (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL REFERENCES game_sessions(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            race TEXT NOT NULL,
            occupation TEXT NOT NULL,
            attributes_json TEXT NOT NULL,
            personality_json TEXT NOT NULL,
            goals_short_json TEXT NOT NULL,
            goals_long_json TEXT NOT NULL,
            fears_json TEXT NOT NULL,
            relationships_json TEXT NOT NULL,
            memory_json TEXT NOT NULL,
            interactions_json TEXT NOT NULL,
            current_location TEXT NOT NULL,
            current_activity TEXT NOT NULL,
            mood TEXT NOT NULL,
            reputation INTEGER NOT NULL,
            skill_points INTEGER NOT NULL,
            learned_skills_json TEXT NOT NULL,
            physical_description TEXT NOT NULL,
            clothing_description TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_interaction TEXT NOT NULL
        )
        "#,
        r#"
        CREATE INDEX IF NOT EXISTS idx_npcs_session ON npcs(session_id)
        "#,
    ];

    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}

/// Bundle of all SQLite repositories over one pool.
pub struct SqliteRepositories {
    pub users: Arc<SqliteUserRepo>,
    pub characters: Arc<SqliteCharacterRepo>,
    pub sessions: Arc<SqliteSessionRepo>,
    pub npcs: Arc<SqliteNpcRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            users: Arc::new(SqliteUserRepo::new(pool.clone())),
            characters: Arc::new(SqliteCharacterRepo::new(pool.clone())),
            sessions: Arc::new(SqliteSessionRepo::new(pool.clone())),
            npcs: Arc::new(SqliteNpcRepo::new(pool)),
        }
    }
}

// =============================================================================
// Column helpers shared by the repositories
// =============================================================================

pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, RepoError> {
    serde_json::to_string(value).map_err(|e| RepoError::serialization(e))
}

pub(crate) fn from_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T, RepoError> {
    serde_json::from_str(json).map_err(|e| RepoError::serialization(e))
}

pub(crate) fn ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339()
}

pub(crate) fn parse_ts(value: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| RepoError::serialization(e))
}

pub(crate) fn parse_opt_ts(value: Option<String>) -> Result<Option<DateTime<Utc>>, RepoError> {
    value.as_deref().map(parse_ts).transpose()
}

/// In-memory pool for repository tests. A single connection keeps the
/// whole test on one `:memory:` database.
#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid options")
        .foreign_keys(true);
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory pool");
    ensure_schema(&pool).await.expect("schema");
    pool
}
