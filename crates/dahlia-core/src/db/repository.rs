//! User repository
//!
//! Abstracts database operations for testability using trait-based dependency injection.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::error::{Error, Result};
use crate::models::User;

/// User repository trait - abstracts database operations for testability
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Create a new user and return its assigned id.
    /// Fails with `UserAlreadyExists` if the username is taken.
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64>;

    /// Replace (or clear, with `None`) the user's stored refresh token
    async fn set_refresh_token(&self, id: i64, token: Option<&str>) -> Result<()>;
}

/// SQLite implementation of UserRepository
#[derive(Clone)]
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        let now = chrono::Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => Error::UserAlreadyExists,
            other => Error::Database(other),
        })?;

        Ok(result.last_insert_rowid())
    }

    async fn set_refresh_token(&self, id: i64, token: Option<&str>) -> Result<()> {
        let result = sqlx::query("UPDATE users SET refresh_token = ?, updated_at = ? WHERE id = ?")
            .bind(token)
            .bind(chrono::Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::UserNotFound);
        }
        Ok(())
    }
}
