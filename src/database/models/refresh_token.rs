use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted refresh credential. A token is usable while its row exists,
/// `revoked_at` is null and `expires_at` is in the future; rotation revokes
/// the presented row and inserts its successor.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRow {
    pub jti: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRow {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}
