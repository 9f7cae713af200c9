use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    errors::{AppError, AppResult},
    spotify::models::Paging,
};

/// Read access to the Spotify Web API on behalf of one user.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// GET a path relative to the API base, e.g. `/v1/me`.
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Value>;

    /// GET an absolute URL, used to follow `next` links.
    async fn get_url(&self, url: &str) -> AppResult<Value>;
}

pub struct SpotifyClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(http: reqwest::Client, base_url: &str, access_token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, label: &str) -> AppResult<Value> {
        let response = request.bearer_auth(&self.access_token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("Spotify GET {} returned {}: {}", label, status, body);
            return Err(AppError::ExternalApi(format!(
                "GET {} returned {}",
                label, status
            )));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl SpotifyApi for SpotifyClient {
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Value> {
        let request = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(query);
        self.send(request, path).await
    }

    async fn get_url(&self, url: &str) -> AppResult<Value> {
        self.send(self.http.get(url), url).await
    }
}

/// Hands out an API client bound to one user's access token.
pub trait SpotifyConnector: Send + Sync {
    fn connect(&self, access_token: &str) -> Box<dyn SpotifyApi>;
}

pub struct HttpSpotifyConnector {
    http: reqwest::Client,
    base_url: String,
}

impl HttpSpotifyConnector {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
        }
    }
}

impl SpotifyConnector for HttpSpotifyConnector {
    fn connect(&self, access_token: &str) -> Box<dyn SpotifyApi> {
        Box::new(SpotifyClient::new(self.http.clone(), &self.base_url, access_token))
    }
}

/// Reads a Web API payload into `T`. A payload of the wrong shape is a
/// Spotify failure, not ours.
pub fn from_payload<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::ExternalApi(format!("Unexpected response shape: {}", e)))
}

pub async fn get_json<T: DeserializeOwned>(
    api: &dyn SpotifyApi,
    path: &str,
    query: &[(&str, &str)],
) -> AppResult<T> {
    from_payload(api.get(path, query).await?)
}

/// Concatenates the items of `first` and every page reachable through `next`.
pub async fn collect_pages<T: DeserializeOwned>(
    api: &dyn SpotifyApi,
    first: Paging<T>,
) -> AppResult<Vec<T>> {
    let mut items = first.items;
    let mut next = first.next;

    while let Some(url) = next {
        let page: Paging<T> = from_payload(api.get_url(&url).await?)?;
        items.extend(page.items);
        next = page.next;
    }

    Ok(items)
}
