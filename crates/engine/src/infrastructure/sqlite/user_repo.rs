//! SQLite storage for user accounts.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use fableforge_domain::{User, UserId};

use super::{parse_opt_ts, parse_ts, ts};
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, RepoError> {
    let id: String = row.get("id");
    Ok(User {
        id: UserId::from_uuid(
            id.parse()
                .map_err(|e| RepoError::serialization(format!("user id: {e}")))?,
        ),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: parse_ts(&row.get::<String, _>("created_at"))?,
        last_login: parse_opt_ts(row.get("last_login"))?,
    })
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.get", e))?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.find_by_username", e))?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, RepoError> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ? OR email = ?")
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.find_by_username_or_email", e))?;
        row.as_ref().map(row_to_user).transpose()
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at, last_login)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                email = excluded.email,
                password_hash = excluded.password_hash,
                last_login = excluded.last_login
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(ts(user.created_at))
        .bind(user.last_login.map(ts))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let message = e.to_string();
            if message.contains("UNIQUE") {
                RepoError::ConstraintViolation(message)
            } else {
                RepoError::database("users.save", message)
            }
        })?;
        Ok(())
    }
}
