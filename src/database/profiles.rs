use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::database::models::Profile;

const COLUMNS: &str = "id, user_id, full_name, bio, image, verified, created_at, updated_at";

/// Owner-editable profile fields; absent fields are left unchanged.
/// `verified` is deliberately not here, it is operator-only.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn update_own(
        &self,
        user_id: Uuid,
        changes: &ProfileChanges,
    ) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles
             SET full_name = COALESCE($2, full_name),
                 bio = COALESCE($3, bio),
                 image = COALESCE($4, image),
                 updated_at = now()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(changes.full_name.as_deref())
        .bind(changes.bio.as_deref())
        .bind(changes.image.as_deref())
        .fetch_optional(&self.pool)
        .await
    }

    /// Operator-only toggle; returns None when the target user has no profile
    pub async fn set_verified(
        &self,
        user_id: Uuid,
        verified: bool,
    ) -> Result<Option<Profile>, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET verified = $2, updated_at = now()
             WHERE user_id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(verified)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert inside the registration transaction; every user gets exactly
    /// one profile, enforced here plus the unique index on user_id.
    pub async fn insert(conn: &mut PgConnection, user_id: Uuid) -> Result<Profile, sqlx::Error> {
        sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (user_id) VALUES ($1) RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(conn)
        .await
    }
}
