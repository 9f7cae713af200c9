use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Spotify user id
    pub sid: String, // Server-side session id
    pub exp: usize,  // Expiration time (as UTC timestamp)
    pub iat: usize,  // Issued at (as UTC timestamp)
}

impl Claims {
    pub fn new(session: &Session, expiration_hours: i64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiration_hours)).min(session.expires_at);

        Self {
            sub: session.user_id.clone(),
            sid: session.id.clone(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        }
    }
}
