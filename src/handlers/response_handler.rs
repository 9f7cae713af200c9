use actix_web::{post, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{ResponseResultDto, SubmitResponseRequest},
};

/// Grades and stores a quiz taker's answers. No login needed.
#[post("/api/response")]
pub async fn submit_response(
    state: web::Data<AppState>,
    request: web::Json<SubmitResponseRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.response_service.submit(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ResponseResultDto::from(&response)))
}
