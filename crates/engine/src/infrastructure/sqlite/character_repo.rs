//! SQLite storage for characters.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use fableforge_domain::{Character, CharacterId, UserId};

use super::{from_json, parse_ts, to_json, ts};
use crate::infrastructure::ports::{CharacterRepo, RepoError};

pub struct SqliteCharacterRepo {
    pool: SqlitePool,
}

impl SqliteCharacterRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_character(row: &SqliteRow) -> Result<Character, RepoError> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    Ok(Character {
        id: id
            .parse::<CharacterId>()
            .map_err(|e| RepoError::serialization(format!("character id: {e}")))?,
        user_id: user_id
            .parse::<UserId>()
            .map_err(|e| RepoError::serialization(format!("user id: {e}")))?,
        name: row.get("name"),
        race: row.get("race"),
        class: row.get("class"),
        level: row.get("level"),
        experience: row.get("experience"),
        attributes: from_json(&row.get::<String, _>("attributes_json"))?,
        current_hp: row.get("current_hp"),
        max_hp: row.get("max_hp"),
        current_mp: row.get("current_mp"),
        max_mp: row.get("max_mp"),
        gold: row.get("gold"),
        next_item_id: row.get::<i64, _>("next_item_id") as u32,
        inventory: from_json(&row.get::<String, _>("inventory_json"))?,
        equipment: from_json(&row.get::<String, _>("equipment_json"))?,
        advantages: from_json(&row.get::<String, _>("advantages_json"))?,
        disadvantages: from_json(&row.get::<String, _>("disadvantages_json"))?,
        known_npcs: from_json(&row.get::<String, _>("known_npcs_json"))?,
        background: row.get("background"),
        notes: row.get("notes"),
        current_location: row.get("current_location"),
        created_at: parse_ts(&row.get::<String, _>("created_at"))?,
        updated_at: parse_ts(&row.get::<String, _>("updated_at"))?,
    })
}

#[async_trait]
impl CharacterRepo for SqliteCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("characters.get", e))?;
        row.as_ref().map(row_to_character).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Character>, RepoError> {
        let rows = sqlx::query("SELECT * FROM characters WHERE user_id = ? ORDER BY created_at, id")
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("characters.list_for_user", e))?;
        rows.iter().map(row_to_character).collect()
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO characters (
                id, user_id, name, race, class, level, experience,
                attributes_json, current_hp, max_hp, current_mp, max_mp,
                gold, next_item_id, inventory_json, equipment_json,
                advantages_json, disadvantages_json, known_npcs_json,
                background, notes, current_location, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                race = excluded.race,
                class = excluded.class,
                level = excluded.level,
                experience = excluded.experience,
                attributes_json = excluded.attributes_json,
                current_hp = excluded.current_hp,
                max_hp = excluded.max_hp,
                current_mp = excluded.current_mp,
                max_mp = excluded.max_mp,
                gold = excluded.gold,
                next_item_id = excluded.next_item_id,
                inventory_json = excluded.inventory_json,
                equipment_json = excluded.equipment_json,
                advantages_json = excluded.advantages_json,
                disadvantages_json = excluded.disadvantages_json,
                known_npcs_json = excluded.known_npcs_json,
                background = excluded.background,
                notes = excluded.notes,
                current_location = excluded.current_location,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(character.id.to_string())
        .bind(character.user_id.to_string())
        .bind(&character.name)
        .bind(&character.race)
        .bind(&character.class)
        .bind(character.level)
        .bind(character.experience)
        .bind(to_json(&character.attributes)?)
        .bind(character.current_hp)
        .bind(character.max_hp)
        .bind(character.current_mp)
        .bind(character.max_mp)
        .bind(character.gold)
        .bind(character.next_item_id as i64)
        .bind(to_json(&character.inventory)?)
        .bind(to_json(&character.equipment)?)
        .bind(to_json(&character.advantages)?)
        .bind(to_json(&character.disadvantages)?)
        .bind(to_json(&character.known_npcs)?)
        .bind(&character.background)
        .bind(&character.notes)
        .bind(&character.current_location)
        .bind(ts(character.created_at))
        .bind(ts(character.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("characters.save", e))?;
        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM characters WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("characters.delete", e))?;
        if result.rows_affected() == 0 {
            return Err(RepoError::not_found("Character", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::sqlite::memory_pool;
    use crate::infrastructure::sqlite::user_repo::SqliteUserRepo;
    use crate::infrastructure::ports::UserRepo;
    use chrono::Utc;
    use fableforge_domain::{NewCharacter, NewItem, User};

    async fn seeded_repo() -> (SqliteCharacterRepo, UserId) {
        let pool = memory_pool().await;
        let users = SqliteUserRepo::new(pool.clone());
        let user = User::new("owner", "owner@example.com", "$argon2id$fake", Utc::now());
        users.save(&user).await.expect("save user");
        (SqliteCharacterRepo::new(pool), user.id)
    }

    fn new_character(user_id: UserId, name: &str) -> Character {
        Character::create(
            user_id,
            NewCharacter {
                name: name.to_string(),
                race: "elf".to_string(),
                class: "mage".to_string(),
                attribute_points: Default::default(),
                advantages: vec!["lucky".to_string()],
                disadvantages: vec![],
                background: "raised in the woods".to_string(),
                notes: String::new(),
            },
            Utc::now(),
        )
        .expect("valid character")
    }

    #[tokio::test]
    async fn save_and_get_round_trip() {
        let (repo, user_id) = seeded_repo().await;
        let mut c = new_character(user_id, "Sylvara");
        c.add_item(
            NewItem {
                name: "Staff".to_string(),
                description: String::new(),
                item_type: "weapon".to_string(),
                quantity: 1,
                value: 40,
                rarity: Default::default(),
                properties: serde_json::Value::Null,
            },
            Utc::now(),
        );

        repo.save(&c).await.expect("save");
        let loaded = repo.get(c.id).await.expect("get").expect("present");

        assert_eq!(loaded.name, "Sylvara");
        assert_eq!(loaded.attributes, c.attributes);
        assert_eq!(loaded.inventory, c.inventory);
        assert_eq!(loaded.advantages, vec!["lucky".to_string()]);
        assert_eq!(loaded.next_item_id, c.next_item_id);
    }

    #[tokio::test]
    async fn updates_overwrite_in_place() {
        let (repo, user_id) = seeded_repo().await;
        let mut c = new_character(user_id, "Sylvara");
        repo.save(&c).await.expect("save");

        c.earn_gold(50, Utc::now());
        repo.save(&c).await.expect("save again");

        let loaded = repo.get(c.id).await.expect("get").expect("present");
        assert_eq!(loaded.gold, c.gold);
        let all = repo.list_for_user(user_id).await.expect("list");
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let (repo, _) = seeded_repo().await;
        let err = repo.delete(CharacterId::new()).await.expect_err("missing");
        assert!(err.is_not_found());
    }
}
