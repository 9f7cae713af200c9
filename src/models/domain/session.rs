use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access tokens are treated as expired this long before Spotify says so.
const ACCESS_TOKEN_SKEW_SECS: i64 = 60;

/// Server-side login session holding the user's Spotify tokens.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub refresh_token: String,
    pub access_token: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub access_expires_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(
        user_id: &str,
        access_token: &str,
        refresh_token: &str,
        access_expires_in_secs: i64,
        lifetime_hours: i64,
    ) -> Self {
        let now = Utc::now();

        Session {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            refresh_token: refresh_token.to_string(),
            access_token: access_token.to_string(),
            access_expires_at: now + Duration::seconds(access_expires_in_secs),
            created_at: now,
            expires_at: now + Duration::hours(lifetime_hours),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn access_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_expires_at <= now + Duration::seconds(ACCESS_TOKEN_SKEW_SECS)
    }

    /// Stores a refreshed grant. Spotify only sometimes rotates the refresh token.
    pub fn apply_refresh(&mut self, access_token: &str, expires_in_secs: i64, refresh_token: Option<&str>) {
        self.access_token = access_token.to_string();
        self.access_expires_at = Utc::now() + Duration::seconds(expires_in_secs);
        if let Some(rotated) = refresh_token {
            self.refresh_token = rotated.to_string();
        }
    }
}
