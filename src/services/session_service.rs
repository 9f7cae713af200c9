use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::Session, dto::request::safe_redirect_path},
    repositories::SessionRepository,
    spotify::SpotifyAccounts,
};

/// Spotify logins and the server-side sessions that keep their tokens.
pub struct SessionService {
    sessions: Arc<dyn SessionRepository>,
    accounts: Arc<dyn SpotifyAccounts>,
    lifetime_hours: i64,
}

impl SessionService {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        accounts: Arc<dyn SpotifyAccounts>,
        lifetime_hours: i64,
    ) -> Self {
        Self {
            sessions,
            accounts,
            lifetime_hours,
        }
    }

    /// Spotify's consent page. `next` comes back as the OAuth `state` and is
    /// where the user lands after logging in.
    pub fn authorize_url(&self, next: Option<&str>) -> AppResult<String> {
        self.accounts.authorize_url(&safe_redirect_path(next))
    }

    /// Trades an authorization code for tokens and opens a session.
    pub async fn complete_login(&self, code: &str) -> AppResult<Session> {
        let grant = self.accounts.exchange_code(code).await?;
        let refresh_token = grant.refresh_token.ok_or_else(|| {
            log::warn!("Spotify granted tokens without a refresh token");
            AppError::Unauthorized("Spotify did not grant a refresh token".to_string())
        })?;

        let user_id = self.accounts.current_user_id(&grant.access_token).await?;
        let session = Session::new(
            &user_id,
            &grant.access_token,
            &refresh_token,
            grant.expires_in,
            self.lifetime_hours,
        );
        let session = self.sessions.create(session).await?;

        log::info!("User {} logged in", user_id);
        Ok(session)
    }

    /// The live session with this id. Expired sessions are removed.
    pub async fn session(&self, session_id: &str) -> AppResult<Session> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Session not found".to_string()))?;

        if session.is_expired(Utc::now()) {
            self.sessions.delete(&session.id).await?;
            return Err(AppError::Unauthorized("Session has expired".to_string()));
        }

        Ok(session)
    }

    /// A usable Spotify access token for the session, refreshed first if
    /// the stored one has expired.
    pub async fn access_token(&self, session_id: &str) -> AppResult<String> {
        let mut session = self.session(session_id).await?;
        if !session.access_token_expired(Utc::now()) {
            return Ok(session.access_token);
        }

        let grant = self.accounts.refresh(&session.refresh_token).await?;
        session.apply_refresh(
            &grant.access_token,
            grant.expires_in,
            grant.refresh_token.as_deref(),
        );
        self.sessions.replace(&session).await?;

        log::info!("Refreshed Spotify access token for {}", session.user_id);
        Ok(session.access_token)
    }

    pub async fn logout(&self, session_id: &str) -> AppResult<()> {
        if self.sessions.delete(session_id).await? {
            log::info!("Session {} ended", session_id);
        }
        Ok(())
    }

    pub async fn purge_expired(&self) -> AppResult<u64> {
        let purged = self.sessions.delete_expired(Utc::now()).await?;
        if purged > 0 {
            log::info!("Purged {} expired sessions", purged);
        }
        Ok(purged)
    }

    /// Purges expired sessions every `interval` for as long as the runtime lives.
    pub fn spawn_purge_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.purge_expired().await {
                    log::error!("Failed to purge expired sessions: {}", e);
                }
            }
        })
    }
}
