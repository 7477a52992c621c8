//! Session entity for refresh token tracking.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the sessions table.
///
/// Refresh tokens are stored as SHA-256 digests; a session is valid while
/// it is unexpired and unrevoked.
#[derive(Debug, Clone, FromRow)]
pub struct SessionEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub refresh_token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl SessionEntity {
    /// Whether this session can still be used to refresh tokens.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: i64, revoked: bool) -> SessionEntity {
        let now = Utc::now();
        SessionEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            refresh_token_hash: "abc".into(),
            expires_at: now + Duration::seconds(expires_in),
            revoked_at: revoked.then_some(now),
            created_at: now,
        }
    }

    #[test]
    fn test_session_valid() {
        assert!(session(3600, false).is_valid(Utc::now()));
    }

    #[test]
    fn test_session_expired() {
        assert!(!session(-1, false).is_valid(Utc::now()));
    }

    #[test]
    fn test_session_revoked() {
        assert!(!session(3600, true).is_valid(Utc::now()));
    }
}
