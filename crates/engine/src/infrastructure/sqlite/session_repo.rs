//! SQLite storage for game sessions.
//!
//! `save_with_npcs` persists a whole player-action turn in one
//! transaction; `delete` removes the session and its NPCs together.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use fableforge_domain::{CharacterId, GameSession, Npc, SessionId, UserId};

use super::npc_repo::upsert_npc;
use super::{from_json, parse_ts, to_json, ts};
use crate::infrastructure::ports::{RepoError, SessionRepo};

pub struct SqliteSessionRepo {
    pool: SqlitePool,
}

impl SqliteSessionRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_session(row: &SqliteRow) -> Result<GameSession, RepoError> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let character_id: String = row.get("character_id");
    Ok(GameSession {
        id: id
            .parse::<SessionId>()
            .map_err(|e| RepoError::serialization(format!("session id: {e}")))?,
        user_id: user_id
            .parse::<UserId>()
            .map_err(|e| RepoError::serialization(format!("user id: {e}")))?,
        character_id: character_id
            .parse::<CharacterId>()
            .map_err(|e| RepoError::serialization(format!("character id: {e}")))?,
        name: row.get("name"),
        world_setting: row.get("world_setting"),
        difficulty: row.get("difficulty"),
        current_scene: row.get("current_scene"),
        current_location: row.get("current_location"),
        story_context: row.get("story_context"),
        story_log: from_json(&row.get::<String, _>("story_log_json"))?,
        player_actions: from_json(&row.get::<String, _>("player_actions_json"))?,
        world_state: from_json(&row.get::<String, _>("world_state_json"))?,
        active_quests: from_json(&row.get::<String, _>("active_quests_json"))?,
        completed_quests: from_json(&row.get::<String, _>("completed_quests_json"))?,
        next_quest_id: row.get::<i64, _>("next_quest_id") as u32,
        narrator_personality: row.get("narrator_personality"),
        created_at: parse_ts(&row.get::<String, _>("created_at"))?,
        updated_at: parse_ts(&row.get::<String, _>("updated_at"))?,
        last_played: parse_ts(&row.get::<String, _>("last_played"))?,
    })
}

/// Upsert one session through any executor (pool or open transaction).
async fn upsert_session<'e, E>(executor: E, session: &GameSession) -> Result<(), RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO game_sessions (
            id, user_id, character_id, name, world_setting, difficulty,
            current_scene, current_location, story_context,
            story_log_json, player_actions_json, world_state_json,
            active_quests_json, completed_quests_json, next_quest_id,
            narrator_personality, created_at, updated_at, last_played
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            world_setting = excluded.world_setting,
            difficulty = excluded.difficulty,
            current_scene = excluded.current_scene,
            current_location = excluded.current_location,
            story_context = excluded.story_context,
            story_log_json = excluded.story_log_json,
            player_actions_json = excluded.player_actions_json,
            world_state_json = excluded.world_state_json,
            active_quests_json = excluded.active_quests_json,
            completed_quests_json = excluded.completed_quests_json,
            next_quest_id = excluded.next_quest_id,
            narrator_personality = excluded.narrator_personality,
            updated_at = excluded.updated_at,
            last_played = excluded.last_played
        "#,
    )
    .bind(session.id.to_string())
    .bind(session.user_id.to_string())
    .bind(session.character_id.to_string())
    .bind(&session.name)
    .bind(&session.world_setting)
    .bind(&session.difficulty)
    .bind(&session.current_scene)
    .bind(&session.current_location)
    .bind(&session.story_context)
    .bind(to_json(&session.story_log)?)
    .bind(to_json(&session.player_actions)?)
    .bind(to_json(&session.world_state)?)
    .bind(to_json(&session.active_quests)?)
    .bind(to_json(&session.completed_quests)?)
    .bind(session.next_quest_id as i64)
    .bind(&session.narrator_personality)
    .bind(ts(session.created_at))
    .bind(ts(session.updated_at))
    .bind(ts(session.last_played))
    .execute(executor)
    .await
    .map_err(|e| RepoError::database("sessions.save", e))?;
    Ok(())
}

#[async_trait]
impl SessionRepo for SqliteSessionRepo {
    async fn get(&self, id: SessionId) -> Result<Option<GameSession>, RepoError> {
        let row = sqlx::query("SELECT * FROM game_sessions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("sessions.get", e))?;
        row.as_ref().map(row_to_session).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<GameSession>, RepoError> {
        let rows =
            sqlx::query("SELECT * FROM game_sessions WHERE user_id = ? ORDER BY created_at, id")
                .bind(user_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::database("sessions.list_for_user", e))?;
        rows.iter().map(row_to_session).collect()
    }

    async fn save(&self, session: &GameSession) -> Result<(), RepoError> {
        upsert_session(&self.pool, session).await
    }

    async fn save_with_npcs(
        &self,
        session: &GameSession,
        npcs: &[Npc],
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("sessions.save_with_npcs", e))?;
        upsert_session(&mut *tx, session).await?;
        for npc in npcs {
            upsert_npc(&mut *tx, npc).await?;
        }
        tx.commit()
            .await
            .map_err(|e| RepoError::database("sessions.save_with_npcs", e))?;
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("sessions.delete", e))?;
        sqlx::query("DELETE FROM npcs WHERE session_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("sessions.delete", e))?;
        let result = sqlx::query("DELETE FROM game_sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("sessions.delete", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("GameSession", id));
        }
        tx.commit()
            .await
            .map_err(|e| RepoError::database("sessions.delete", e))?;
        Ok(())
    }
}
