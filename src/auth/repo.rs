use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String, // argon2 PHC string, never exposed in JSON
    pub role: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: Option<String>,
    pub username: String,
    pub password_hash: String,
    pub role: Option<String>,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, sqlx::Error>;
    /// Oldest user with this username, if any.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, user: NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (full_name, username, password, role)
            VALUES ($1, $2, $3, COALESCE($4, 'user'))
            RETURNING id, full_name, username, password, role
            "#,
        )
        .bind(user.full_name)
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.role)
        .fetch_one(&self.db)
        .await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, full_name, username, password, role
            FROM users
            WHERE username = $1
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
    }
}
