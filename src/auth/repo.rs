use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub last_login: Option<OffsetDateTime>,
}

impl User {
    /// Find a user by username (case-sensitive, unique).
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_active, is_staff, last_login
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_active, is_staff, last_login
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with a hashed password.
    pub async fn create(db: &PgPool, username: &str, password_hash: &str) -> sqlx::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, is_active, is_staff, last_login
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// List users in creation order with offset/limit pagination.
    pub async fn list(db: &PgPool, skip: i64, limit: i64) -> sqlx::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, is_active, is_staff, last_login
            FROM users
            ORDER BY id
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(skip)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(users)
    }

    /// Stamp `last_login` on a successful login.
    pub async fn touch_last_login(db: &PgPool, id: i64) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn grant_staff(db: &PgPool, username: &str) -> sqlx::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET is_staff = TRUE
            WHERE username = $1
            RETURNING id, username, password_hash, is_active, is_staff, last_login
            "#,
        )
        .bind(username)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
