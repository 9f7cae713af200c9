use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    spotify::SCOPES,
};

/// Token grant from the accounts service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    id: String,
}

/// The Spotify accounts service: the authorization-code flow and the
/// identity lookup that follows it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpotifyAccounts: Send + Sync {
    fn authorize_url(&self, state: &str) -> AppResult<String>;
    async fn exchange_code(&self, code: &str) -> AppResult<TokenGrant>;
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenGrant>;
    async fn current_user_id(&self, access_token: &str) -> AppResult<String>;
}

pub struct SpotifyAccountsClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    accounts_url: String,
    api_url: String,
}

impl SpotifyAccountsClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            client_id: config.spotify_client_id.clone(),
            client_secret: config.spotify_client_secret.clone(),
            redirect_uri: config.spotify_redirect_uri.clone(),
            accounts_url: config.spotify_accounts_url.trim_end_matches('/').to_string(),
            api_url: config.spotify_api_url.trim_end_matches('/').to_string(),
        }
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> AppResult<TokenGrant> {
        let response = self
            .http
            .post(format!("{}/api/token", self.accounts_url))
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(form)
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to reach the Spotify accounts service: {}", e);
                AppError::ExternalApi(format!("Failed to request token: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Spotify rejected the token request ({}): {}", status, body);
            return Err(AppError::Unauthorized(
                "Spotify rejected the authorization grant".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(AppError::ExternalApi(format!(
                "Token request returned {}",
                status
            )));
        }

        Ok(response.json::<TokenGrant>().await?)
    }
}

#[async_trait]
impl SpotifyAccounts for SpotifyAccountsClient {
    fn authorize_url(&self, state: &str) -> AppResult<String> {
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.accounts_url),
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", SCOPES),
                ("state", state),
                ("show_dialog", "true"),
            ],
        )
        .map_err(|e| AppError::InternalError(format!("Invalid accounts URL: {}", e)))?;

        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> AppResult<TokenGrant> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ])
        .await
    }

    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenGrant> {
        self.request_token(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn current_user_id(&self, access_token: &str) -> AppResult<String> {
        let response = self
            .http
            .get(format!("{}/v1/me", self.api_url))
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::ExternalApi(format!(
                "GET /v1/me returned {}",
                response.status()
            )));
        }

        let user = response.json::<CurrentUser>().await?;
        Ok(user.id)
    }
}
