use std::env;

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

const DEFAULT_JWT_SECRET: &str = "dev_secret_key_change_in_production";
const DEFAULT_CLIENT_ID: &str = "spotify_client_id";
const DEFAULT_CLIENT_SECRET: &str = "spotify_client_secret";

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: SecretString,
    pub spotify_redirect_uri: String,
    pub spotify_accounts_url: String,
    pub spotify_api_url: String,
    pub public_base_url: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub session_expiration_hours: i64,
    pub session_purge_interval_secs: u64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: var_or("MONGO_CONN_STRING", "mongodb://localhost:27017"),
            mongo_db_name: var_or("MONGO_DB_NAME", "spoton-local"),
            spotify_client_id: var_or("SPOTIFY_CLIENT_ID", DEFAULT_CLIENT_ID),
            spotify_client_secret: SecretString::from(var_or(
                "SPOTIFY_CLIENT_SECRET",
                DEFAULT_CLIENT_SECRET,
            )),
            spotify_redirect_uri: var_or(
                "SPOTIFY_REDIRECT_URI",
                "http://localhost:8080/logged_in",
            ),
            spotify_accounts_url: var_or("SPOTIFY_ACCOUNTS_URL", "https://accounts.spotify.com"),
            spotify_api_url: var_or("SPOTIFY_API_URL", "https://api.spotify.com"),
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:8080"),
            web_server_host: var_or("WEB_SERVER_HOST", "localhost"),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(var_or("JWT_SECRET", DEFAULT_JWT_SECRET)),
            session_expiration_hours: env::var("SESSION_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24 * 14),
            session_purge_interval_secs: env::var("SESSION_PURGE_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
        }
    }

    /// Refuses to run with the development secrets.
    pub fn validate_for_production(&self) -> AppResult<()> {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::InternalError(
                "JWT_SECRET is using the default value".to_string(),
            ));
        }

        if jwt_secret.len() < 32 {
            return Err(AppError::InternalError(format!(
                "JWT_SECRET is too short ({}), it must be at least 32 characters",
                jwt_secret.len()
            )));
        }

        if self.spotify_client_secret.expose_secret() == DEFAULT_CLIENT_SECRET {
            return Err(AppError::InternalError(
                "SPOTIFY_CLIENT_SECRET is using the default value".to_string(),
            ));
        }

        if self.spotify_client_id == DEFAULT_CLIENT_ID {
            return Err(AppError::InternalError(
                "SPOTIFY_CLIENT_ID is using the default value".to_string(),
            ));
        }

        Ok(())
    }

    /// Cookies are only marked secure when the site is served over https.
    pub fn secure_cookies(&self) -> bool {
        self.public_base_url.starts_with("https://")
    }

    pub fn share_url(&self, quiz_id: &str) -> String {
        format!("{}/quiz/{}", self.public_base_url.trim_end_matches('/'), quiz_id)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "spoton-test".to_string(),
            spotify_client_id: "test-client-id".to_string(),
            spotify_client_secret: SecretString::from("test-client-secret".to_string()),
            spotify_redirect_uri: "http://localhost:8080/logged_in".to_string(),
            spotify_accounts_url: "http://accounts.test".to_string(),
            spotify_api_url: "http://api.test".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            session_expiration_hours: 1,
            session_purge_interval_secs: 60,
        }
    }
}
