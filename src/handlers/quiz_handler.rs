use actix_web::{get, post, web, HttpResponse};
use rand::{rngs::StdRng, SeedableRng};

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, Claims},
    errors::AppError,
    models::{
        domain::Quiz,
        dto::{QuizCreatedResponse, QuizDto, ResponseListDto, ResponseResultDto},
    },
};

/// Rebuilds the logged-in user's quiz from their current Spotify data.
pub(crate) async fn rebuild_quiz(state: &AppState, claims: &Claims) -> Result<Quiz, AppError> {
    let access_token = state.session_service.access_token(&claims.sid).await?;
    let api = state.spotify.connect(&access_token);

    let mut rng = StdRng::from_os_rng();
    state
        .quiz_service
        .create_quiz(api.as_ref(), &claims.sub, &mut rng)
        .await
        .inspect_err(|e| log::warn!("Could not build a quiz for {}: {}", claims.sub, e))
}

#[post("/api/quiz")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = rebuild_quiz(&state, &user.0).await?;
    let share_url = state.config.share_url(&quiz.id);

    Ok(HttpResponse::Created().json(QuizCreatedResponse::new(&quiz, share_url)))
}

#[get("/api/quiz/mine/responses")]
pub async fn my_responses(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (quiz_id, responses) = state
        .response_service
        .responses_for_owner(&user.0.sub)
        .await?;

    Ok(HttpResponse::Ok().json(ResponseListDto {
        quiz_id,
        responses: responses.iter().map(ResponseResultDto::from).collect(),
    }))
}

/// The quiz as quiz takers see it, without answers.
#[get("/api/quiz/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    Ok(HttpResponse::Ok().json(QuizDto::from(&quiz)))
}
