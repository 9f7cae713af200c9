use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::{Database, HealthCheck},
    errors::{AppError, AppResult},
    repositories::{
        MongoQuizRepository, MongoResponseRepository, MongoSessionRepository, QuizRepository,
        ResponseRepository, SessionRepository,
    },
    services::{QuizService, ResponseService, SessionService},
    spotify::{HttpSpotifyConnector, SpotifyAccounts, SpotifyAccountsClient, SpotifyConnector},
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub response_service: Arc<ResponseService>,
    pub session_service: Arc<SessionService>,
    pub jwt_service: Arc<JwtService>,
    pub spotify: Arc<dyn SpotifyConnector>,
    pub health: Arc<dyn HealthCheck>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;
        let response_repository = Arc::new(MongoResponseRepository::new(&db));
        response_repository.ensure_indexes().await?;
        let session_repository = Arc::new(MongoSessionRepository::new(&db));
        session_repository.ensure_indexes().await?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("spoton-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        let accounts = Arc::new(SpotifyAccountsClient::new(http.clone(), &config));
        let spotify = Arc::new(HttpSpotifyConnector::new(http, &config.spotify_api_url));

        Ok(Self::from_parts(
            config,
            quiz_repository,
            response_repository,
            session_repository,
            accounts,
            spotify,
            Arc::new(db),
        ))
    }

    /// Wires the services over already built stores and Spotify clients.
    pub fn from_parts(
        config: Config,
        quizzes: Arc<dyn QuizRepository>,
        responses: Arc<dyn ResponseRepository>,
        sessions: Arc<dyn SessionRepository>,
        accounts: Arc<dyn SpotifyAccounts>,
        spotify: Arc<dyn SpotifyConnector>,
        health: Arc<dyn HealthCheck>,
    ) -> Self {
        let quiz_service = Arc::new(QuizService::new(quizzes.clone(), responses.clone()));
        let response_service = Arc::new(ResponseService::new(quizzes, responses));
        let session_service = Arc::new(SessionService::new(
            sessions,
            accounts,
            config.session_expiration_hours,
        ));
        let jwt_service = Arc::new(JwtService::new(
            &config.jwt_secret,
            config.session_expiration_hours,
        ));

        Self {
            quiz_service,
            response_service,
            session_service,
            jwt_service,
            spotify,
            health,
            config: Arc::new(config),
        }
    }
}
