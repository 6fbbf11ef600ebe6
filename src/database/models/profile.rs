use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One-to-one display metadata for a user. Created in the same transaction
/// as the user row; `verified` is only ever set by a staff operator.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub bio: String,
    pub image: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire representation of a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileBody {
    pub full_name: String,
    pub bio: String,
    pub image: String,
    pub verified: bool,
}

impl From<Profile> for ProfileBody {
    fn from(profile: Profile) -> Self {
        Self {
            full_name: profile.full_name,
            bio: profile.bio,
            image: profile.image,
            verified: profile.verified,
        }
    }
}
