use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::models::User;

const COLUMNS: &str =
    "id, email, username, password_hash, is_active, is_staff, is_superuser, created_at, updated_at";

/// Fields required to create a user row. The password arrives pre-hashed;
/// this layer never sees plaintext credentials.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Email lookup is case-insensitive; email is the login identifier.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn email_taken(&self, email: &str) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1))")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;
        Ok(taken)
    }

    pub async fn username_taken(&self, username: &str) -> Result<bool, sqlx::Error> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(username) = lower($1))",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;
        Ok(taken)
    }

    /// Insert inside a caller-owned transaction so user and profile creation
    /// commit together.
    pub async fn insert(conn: &mut PgConnection, new_user: &NewUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, username, password_hash, is_staff, is_superuser)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(new_user.is_staff)
        .bind(new_user.is_superuser)
        .fetch_one(conn)
        .await
    }
}
