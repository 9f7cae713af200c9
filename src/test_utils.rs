#[cfg(test)]
pub mod fake_spotify {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::{
        errors::{AppError, AppResult},
        spotify::{SpotifyApi, SpotifyConnector},
    };

    /// Spotify API stand-in serving canned JSON.
    ///
    /// Requests are keyed by `path` or `path?k=v&k2=v2` (query pairs in the
    /// order the caller passes them), and by the raw URL for `next` links.
    /// Clones share their call counts.
    #[derive(Clone, Default)]
    pub struct FakeSpotify {
        responses: HashMap<String, Value>,
        calls: Arc<Mutex<HashMap<String, usize>>>,
    }

    impl FakeSpotify {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, key: &str, body: Value) -> Self {
            self.responses.insert(key.to_string(), body);
            self
        }

        pub fn calls(&self, key: &str) -> usize {
            self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
        }

        pub fn total_calls(&self) -> usize {
            self.calls.lock().unwrap().values().sum()
        }

        fn respond(&self, key: String) -> AppResult<Value> {
            *self.calls.lock().unwrap().entry(key.clone()).or_insert(0) += 1;
            self.responses
                .get(&key)
                .cloned()
                .ok_or_else(|| AppError::ExternalApi(format!("GET {} returned 404 Not Found", key)))
        }
    }

    #[async_trait]
    impl SpotifyApi for FakeSpotify {
        async fn get(&self, path: &str, query: &[(&str, &str)]) -> AppResult<Value> {
            let key = if query.is_empty() {
                path.to_string()
            } else {
                let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                format!("{}?{}", path, pairs.join("&"))
            };
            self.respond(key)
        }

        async fn get_url(&self, url: &str) -> AppResult<Value> {
            self.respond(url.to_string())
        }
    }

    /// Connects every access token to the same fake, recording the tokens.
    pub struct FakeConnector {
        pub api: FakeSpotify,
        pub tokens: Mutex<Vec<String>>,
    }

    impl FakeConnector {
        pub fn new(api: FakeSpotify) -> Self {
            Self {
                api,
                tokens: Mutex::new(Vec::new()),
            }
        }
    }

    impl SpotifyConnector for FakeConnector {
        fn connect(&self, access_token: &str) -> Box<dyn SpotifyApi> {
            self.tokens.lock().unwrap().push(access_token.to_string());
            Box::new(self.api.clone())
        }
    }
}

#[cfg(test)]
pub mod fixtures {
    use serde_json::{json, Value};

    use super::fake_spotify::FakeSpotify;
    use crate::models::domain::{Choice, Question, Quiz};

    fn album_images(i: usize) -> Value {
        json!([
            { "url": format!("http://img.test/al{}-640.jpg", i), "height": 640, "width": 640 },
            { "url": format!("http://img.test/al{}-64.jpg", i), "height": 64, "width": 64 }
        ])
    }

    pub fn track_json(i: usize) -> Value {
        json!({
            "id": format!("t{}", i),
            "name": format!("Track {}", i),
            "artists": [{ "id": format!("a{}", i), "name": format!("Artist {}", i) }],
            "album": {
                "id": format!("al{}", i),
                "name": format!("Album {}", i),
                "artists": [{ "id": format!("a{}", i), "name": format!("Artist {}", i) }],
                "images": album_images(i),
                "release_date": format!("{}-01-01", 2000 + i)
            },
            "explicit": i % 2 == 0,
            "duration_ms": 180_000 + i * 1000,
            "popularity": 40 + i
        })
    }

    pub fn album_json(i: usize) -> Value {
        json!({
            "id": format!("al{}", i),
            "name": format!("Album {}", i),
            "artists": [{ "id": format!("a{}", i), "name": format!("Artist {}", i) }],
            "images": album_images(i),
            "release_date": format!("{}-01-01", 2000 + i),
            "genres": [],
            "popularity": 50
        })
    }

    pub fn artist_json(i: usize, genres: &[&str]) -> Value {
        json!({
            "id": format!("a{}", i),
            "name": format!("Artist {}", i),
            "genres": genres,
            "images": [{ "url": format!("http://img.test/a{}.jpg", i), "height": 300, "width": 300 }],
            "popularity": 60
        })
    }

    pub fn playlist_json(i: usize, public: bool, total: u32) -> Value {
        let name = if public {
            format!("Playlist {}", i)
        } else {
            format!("Private Playlist {}", i)
        };
        json!({
            "id": format!("p{}", i),
            "name": name,
            "public": public,
            "images": [{ "url": format!("http://img.test/p{}.jpg", i), "height": null, "width": null }],
            "tracks": { "total": total }
        })
    }

    pub fn audio_features_json(i: usize) -> Value {
        json!({
            "id": format!("t{}", i),
            "energy": 0.5,
            "valence": 0.5,
            "danceability": 0.5,
            "acousticness": 0.25
        })
    }

    pub fn paging(items: Vec<Value>, next: Option<&str>) -> Value {
        json!({ "items": items, "next": next })
    }

    /// A user with enough data for every question generator.
    pub fn rich_library() -> FakeSpotify {
        let tracks = |range: std::ops::RangeInclusive<usize>| -> Value {
            paging(range.map(track_json).collect(), None)
        };
        let artists: Vec<Value> = (1..=6)
            .map(|i| {
                let genres = [format!("genre {}a", i), format!("genre {}b", i)];
                artist_json(i, &[genres[0].as_str(), genres[1].as_str()])
            })
            .collect();

        let feature_ids: Vec<String> = (1..=12).map(|i| format!("t{}", i)).collect();
        let mut features: Vec<Value> = (1..=11).map(audio_features_json).collect();
        features.push(Value::Null);

        let mut playlists: Vec<Value> = (1..=5).map(|i| playlist_json(i, true, 5)).collect();
        playlists.push(playlist_json(6, false, 5));

        let mut api = FakeSpotify::new()
            .with(
                "/v1/me",
                json!({
                    "id": "user-1",
                    "display_name": "Test User",
                    "followers": { "total": 42 },
                    "images": []
                }),
            )
            .with("/v1/me/top/tracks?limit=50&time_range=long_term", tracks(1..=6))
            .with("/v1/me/top/tracks?limit=50&time_range=medium_term", tracks(4..=9))
            .with("/v1/me/top/tracks?limit=50&time_range=short_term", tracks(7..=12))
            .with(
                &format!("/v1/audio-features?ids={}", feature_ids.join(",")),
                json!({ "audio_features": features }),
            )
            .with(
                "/v1/me/tracks?limit=50",
                paging(
                    vec![json!({ "track": track_json(1) }), json!({ "track": track_json(2) })],
                    Some("http://api.test/v1/me/tracks?offset=2&limit=50"),
                ),
            )
            .with(
                "http://api.test/v1/me/tracks?offset=2&limit=50",
                paging(vec![json!({ "track": track_json(3) })], None),
            )
            .with(
                "/v1/me/albums?limit=50",
                paging(
                    vec![json!({ "album": album_json(1) }), json!({ "album": album_json(2) })],
                    None,
                ),
            )
            .with(
                "/v1/me/following?type=artist&limit=50",
                json!({ "artists": paging(vec![artist_json(1, &[]), artist_json(2, &[])], None) }),
            )
            .with("/v1/me/playlists?limit=50", paging(playlists, None))
            .with(
                "/v1/me/player/recently-played?limit=50",
                paging(
                    vec![
                        json!({ "track": track_json(2), "played_at": "2024-01-01T10:00:00Z" }),
                        json!({ "track": track_json(5), "played_at": "2024-01-01T09:00:00Z" }),
                    ],
                    None,
                ),
            );

        for range in ["long_term", "medium_term", "short_term"] {
            api = api.with(
                &format!("/v1/me/top/artists?limit=50&time_range={}", range),
                paging(artists.clone(), None),
            );
        }

        for (i, followers) in [(1, 10), (2, 3), (3, 2), (4, 1), (5, 0), (6, 50)] {
            api = api.with(
                &format!("/v1/playlists/p{}?fields=followers", i),
                json!({ "followers": { "href": null, "total": followers } }),
            );
        }

        for i in 1..=5 {
            let items: Vec<Value> = (1..=5).map(|t| json!({ "track": track_json(t) })).collect();
            api = api.with(
                &format!("/v1/playlists/p{}/tracks?limit=100", i),
                paging(items, None),
            );
        }

        api
    }

    /// A quiz with a single-select question, a multiselect question and a
    /// slider from 0 to 100 answered 50, in that order.
    pub fn sample_quiz(user_id: &str) -> Quiz {
        let single = Question::checkbox(
            "Single",
            false,
            vec![
                Choice::new("Right", None, None, true),
                Choice::new("Wrong 1", None, None, false),
                Choice::new("Wrong 2", None, None, false),
                Choice::new("Wrong 3", None, None, false),
            ],
        );
        let multi = Question::checkbox(
            "Multi",
            true,
            vec![
                Choice::new("Right 1", None, None, true),
                Choice::new("Right 2", None, None, true),
                Choice::new("Wrong 1", None, None, false),
                Choice::new("Wrong 2", None, None, false),
            ],
        );
        let slider = Question::slider("Slider", 0, 100, 50);

        let questions = [single, multi, slider].into_iter().flatten().collect();
        Quiz::new(user_id, "Test User", questions)
    }

    /// Ids of the correct choices of a checkbox question.
    pub fn correct_choice_ids(question: &Question) -> Vec<String> {
        question
            .choices()
            .iter()
            .filter(|c| c.answer)
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn wrong_choice_ids(question: &Question) -> Vec<String> {
        question
            .choices()
            .iter()
            .filter(|c| !c.answer)
            .map(|c| c.id.clone())
            .collect()
    }
}

#[cfg(test)]
pub mod memory {
    use std::{collections::HashMap, sync::Arc};

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tokio::sync::RwLock;

    use crate::{
        errors::{AppError, AppResult},
        models::domain::{Quiz, Response, Session},
        repositories::{QuizRepository, ResponseRepository, SessionRepository},
    };

    #[derive(Clone, Default)]
    pub struct InMemoryQuizRepository {
        pub quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
    }

    #[async_trait]
    impl QuizRepository for InMemoryQuizRepository {
        async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
            let mut quizzes = self.quizzes.write().await;
            if quizzes.contains_key(&quiz.id) {
                return Err(AppError::AlreadyExists(format!("Quiz '{}' already exists", quiz.id)));
            }
            quizzes.insert(quiz.id.clone(), quiz.clone());
            Ok(quiz)
        }

        async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
            Ok(self.quizzes.read().await.get(id).cloned())
        }

        async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Quiz>> {
            let quizzes = self.quizzes.read().await;
            let mut found: Vec<Quiz> = quizzes
                .values()
                .filter(|q| q.user_id == user_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(found)
        }

        async fn delete_by_ids(&self, ids: &[String]) -> AppResult<u64> {
            let mut quizzes = self.quizzes.write().await;
            let before = quizzes.len();
            quizzes.retain(|id, _| !ids.contains(id));
            Ok((before - quizzes.len()) as u64)
        }
    }

    #[derive(Clone, Default)]
    pub struct InMemoryResponseRepository {
        pub responses: Arc<RwLock<Vec<Response>>>,
    }

    #[async_trait]
    impl ResponseRepository for InMemoryResponseRepository {
        async fn create(&self, response: Response) -> AppResult<Response> {
            self.responses.write().await.push(response.clone());
            Ok(response)
        }

        async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Response>> {
            let responses = self.responses.read().await;
            let mut found: Vec<Response> = responses
                .iter()
                .filter(|r| r.quiz_id == quiz_id)
                .cloned()
                .collect();
            found.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
            Ok(found)
        }

        async fn delete_by_quiz_ids(&self, quiz_ids: &[String]) -> AppResult<u64> {
            let mut responses = self.responses.write().await;
            let before = responses.len();
            responses.retain(|r| !quiz_ids.contains(&r.quiz_id));
            Ok((before - responses.len()) as u64)
        }
    }

    #[derive(Clone, Default)]
    pub struct InMemorySessionRepository {
        pub sessions: Arc<RwLock<HashMap<String, Session>>>,
    }

    #[async_trait]
    impl SessionRepository for InMemorySessionRepository {
        async fn create(&self, session: Session) -> AppResult<Session> {
            self.sessions
                .write()
                .await
                .insert(session.id.clone(), session.clone());
            Ok(session)
        }

        async fn find_by_id(&self, id: &str) -> AppResult<Option<Session>> {
            Ok(self.sessions.read().await.get(id).cloned())
        }

        async fn replace(&self, session: &Session) -> AppResult<()> {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(&session.id) {
                Some(existing) => {
                    *existing = session.clone();
                    Ok(())
                }
                None => Err(AppError::NotFound("Session not found".to_string())),
            }
        }

        async fn delete(&self, id: &str) -> AppResult<bool> {
            Ok(self.sessions.write().await.remove(id).is_some())
        }

        async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, s| s.expires_at >= now);
            Ok((before - sessions.len()) as u64)
        }
    }
}

#[cfg(test)]
pub mod state {
    use std::sync::Arc;

    use actix_web::cookie::Cookie;
    use async_trait::async_trait;

    use super::{
        fake_spotify::{FakeConnector, FakeSpotify},
        memory::{InMemoryQuizRepository, InMemoryResponseRepository, InMemorySessionRepository},
    };
    use crate::{
        app_state::AppState,
        auth::SESSION_COOKIE,
        config::Config,
        db::HealthCheck,
        errors::{AppError, AppResult},
        models::domain::Session,
        repositories::SessionRepository,
        spotify::accounts::MockSpotifyAccounts,
    };

    pub struct StubHealth(pub bool);

    #[async_trait]
    impl HealthCheck for StubHealth {
        async fn health_check(&self) -> AppResult<()> {
            if self.0 {
                Ok(())
            } else {
                Err(AppError::DatabaseError("ping failed".to_string()))
            }
        }
    }

    /// Application state over in-memory stores, with handles on each store.
    pub struct TestState {
        pub state: AppState,
        pub quizzes: InMemoryQuizRepository,
        pub responses: InMemoryResponseRepository,
        pub sessions: InMemorySessionRepository,
        pub connector: Arc<FakeConnector>,
    }

    impl TestState {
        pub fn new(accounts: MockSpotifyAccounts, api: FakeSpotify) -> Self {
            Self::with_health(accounts, api, true)
        }

        pub fn with_health(accounts: MockSpotifyAccounts, api: FakeSpotify, healthy: bool) -> Self {
            let quizzes = InMemoryQuizRepository::default();
            let responses = InMemoryResponseRepository::default();
            let sessions = InMemorySessionRepository::default();
            let connector = Arc::new(FakeConnector::new(api));

            let state = AppState::from_parts(
                Config::test_config(),
                Arc::new(quizzes.clone()),
                Arc::new(responses.clone()),
                Arc::new(sessions.clone()),
                Arc::new(accounts),
                connector.clone(),
                Arc::new(StubHealth(healthy)),
            );

            Self {
                state,
                quizzes,
                responses,
                sessions,
                connector,
            }
        }

        /// Stores a live session for `user_id` and returns its cookie.
        pub async fn login(&self, user_id: &str) -> (Session, Cookie<'static>) {
            let session = Session::new(user_id, "access-token", "refresh-token", 3600, 1);
            let session = self.sessions.create(session).await.unwrap();
            let token = self.state.jwt_service.create_token(&session).unwrap();

            (session, Cookie::new(SESSION_COOKIE, token))
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{fake_spotify::FakeSpotify, fixtures::*};
    use crate::{models::domain::QuestionKind, spotify::SpotifyApi};

    #[test]
    fn test_sample_quiz_shape() {
        let quiz = sample_quiz("owner");

        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(correct_choice_ids(&quiz.questions[0]).len(), 1);
        assert_eq!(correct_choice_ids(&quiz.questions[1]).len(), 2);
        assert!(matches!(quiz.questions[2].kind, QuestionKind::Slider { answer: 50, .. }));
    }

    #[tokio::test]
    async fn test_fake_spotify_keys_queries_in_order() {
        let api = FakeSpotify::new().with("/v1/x?a=1&b=2", serde_json::json!({ "ok": true }));

        assert!(api.get("/v1/x", &[("a", "1"), ("b", "2")]).await.is_ok());
        assert!(api.get("/v1/x", &[("b", "2"), ("a", "1")]).await.is_err());
        assert_eq!(api.calls("/v1/x?a=1&b=2"), 1);
        assert_eq!(api.total_calls(), 2);
    }
}
