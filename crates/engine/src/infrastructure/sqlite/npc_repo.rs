//! SQLite storage for NPCs.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use fableforge_domain::{Npc, NpcId, SessionId};

use super::{from_json, parse_ts, to_json, ts};
use crate::infrastructure::ports::{NpcRepo, RepoError};

pub struct SqliteNpcRepo {
    pool: SqlitePool,
}

impl SqliteNpcRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) fn row_to_npc(row: &SqliteRow) -> Result<Npc, RepoError> {
    let id: String = row.get("id");
    let session_id: String = row.get("session_id");
    Ok(Npc {
        id: id
            .parse::<NpcId>()
            .map_err(|e| RepoError::serialization(format!("npc id: {e}")))?,
        session_id: session_id
            .parse::<SessionId>()
            .map_err(|e| RepoError::serialization(format!("session id: {e}")))?,
        name: row.get("name"),
        race: row.get("race"),
        occupation: row.get("occupation"),
        attributes: from_json(&row.get::<String, _>("attributes_json"))?,
        personality_traits: from_json(&row.get::<String, _>("personality_json"))?,
        goals_short_term: from_json(&row.get::<String, _>("goals_short_json"))?,
        goals_long_term: from_json(&row.get::<String, _>("goals_long_json"))?,
        fears: from_json(&row.get::<String, _>("fears_json"))?,
        relationships: from_json(&row.get::<String, _>("relationships_json"))?,
        memory_log: from_json(&row.get::<String, _>("memory_json"))?,
        interaction_history: from_json(&row.get::<String, _>("interactions_json"))?,
        current_location: row.get("current_location"),
        current_activity: row.get("current_activity"),
        mood: row.get("mood"),
        reputation: row.get("reputation"),
        skill_points: row.get("skill_points"),
        learned_skills: from_json(&row.get::<String, _>("learned_skills_json"))?,
        physical_description: row.get("physical_description"),
        clothing_description: row.get("clothing_description"),
        created_at: parse_ts(&row.get::<String, _>("created_at"))?,
        updated_at: parse_ts(&row.get::<String, _>("updated_at"))?,
        last_interaction: parse_ts(&row.get::<String, _>("last_interaction"))?,
    })
}

/// Upsert one NPC through any executor (pool or open transaction).
pub(super) async fn upsert_npc<'e, E>(executor: E, npc: &Npc) -> Result<(), RepoError>
where
    E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO npcs (
            id, session_id, name, race, occupation, attributes_json,
            personality_json, goals_short_json, goals_long_json, fears_json,
            relationships_json, memory_json, interactions_json,
            current_location, current_activity, mood, reputation,
            skill_points, learned_skills_json, physical_description,
            clothing_description, created_at, updated_at, last_interaction
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            race = excluded.race,
            occupation = excluded.occupation,
            attributes_json = excluded.attributes_json,
            personality_json = excluded.personality_json,
            goals_short_json = excluded.goals_short_json,
            goals_long_json = excluded.goals_long_json,
            fears_json = excluded.fears_json,
            relationships_json = excluded.relationships_json,
            memory_json = excluded.memory_json,
            interactions_json = excluded.interactions_json,
            current_location = excluded.current_location,
            current_activity = excluded.current_activity,
            mood = excluded.mood,
            reputation = excluded.reputation,
            skill_points = excluded.skill_points,
            learned_skills_json = excluded.learned_skills_json,
            physical_description = excluded.physical_description,
            clothing_description = excluded.clothing_description,
            updated_at = excluded.updated_at,
            last_interaction = excluded.last_interaction
        "#,
    )
    .bind(npc.id.to_string())
    .bind(npc.session_id.to_string())
    .bind(&npc.name)
    .bind(&npc.race)
    .bind(&npc.occupation)
    .bind(to_json(&npc.attributes)?)
    .bind(to_json(&npc.personality_traits)?)
    .bind(to_json(&npc.goals_short_term)?)
    .bind(to_json(&npc.goals_long_term)?)
    .bind(to_json(&npc.fears)?)
    .bind(to_json(&npc.relationships)?)
    .bind(to_json(&npc.memory_log)?)
    .bind(to_json(&npc.interaction_history)?)
    .bind(&npc.current_location)
    .bind(&npc.current_activity)
    .bind(&npc.mood)
    .bind(npc.reputation)
    .bind(npc.skill_points)
    .bind(to_json(&npc.learned_skills)?)
    .bind(&npc.physical_description)
    .bind(&npc.clothing_description)
    .bind(ts(npc.created_at))
    .bind(ts(npc.updated_at))
    .bind(ts(npc.last_interaction))
    .execute(executor)
    .await
    .map_err(|e| RepoError::database("npcs.save", e))?;
    Ok(())
}

#[async_trait]
impl NpcRepo for SqliteNpcRepo {
    async fn get(&self, id: NpcId) -> Result<Option<Npc>, RepoError> {
        let row = sqlx::query("SELECT * FROM npcs WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("npcs.get", e))?;
        row.as_ref().map(row_to_npc).transpose()
    }

    async fn list_for_session(&self, session_id: SessionId) -> Result<Vec<Npc>, RepoError> {
        let rows =
            sqlx::query("SELECT * FROM npcs WHERE session_id = ? ORDER BY created_at, id")
                .bind(session_id.to_string())
                .fetch_all(&self.pool)
                .await
                .map_err(|e| RepoError::database("npcs.list_for_session", e))?;
        rows.iter().map(row_to_npc).collect()
    }

    async fn save(&self, npc: &Npc) -> Result<(), RepoError> {
        upsert_npc(&self.pool, npc).await
    }

    async fn save_all(&self, npcs: &[Npc]) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("npcs.save_all", e))?;
        for npc in npcs {
            upsert_npc(&mut *tx, npc).await?;
        }
        tx.commit()
            .await
            .map_err(|e| RepoError::database("npcs.save_all", e))?;
        Ok(())
    }
}
