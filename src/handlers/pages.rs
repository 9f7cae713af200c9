//! HTML shells for the browser client. Each page embeds its data as JSON
//! for the client script to pick up.

use actix_web::{get, http::header::ContentType, web, HttpResponse, HttpResponseBuilder};
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde_json::{json, Value};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    handlers::{auth_handler::redirect, quiz_handler::rebuild_quiz},
    models::dto::QuizDto,
};

/// JSON that can sit inside a `<script>` element without closing it.
fn script_json(data: &Value) -> Result<String, AppError> {
    Ok(serde_json::to_string(data)
        .map_err(|e| AppError::InternalError(format!("Failed to encode page data: {}", e)))?
        .replace('<', "\\u003c"))
}

fn shell(title: &str, data: &Value) -> Result<Markup, AppError> {
    let data = script_json(data)?;

    Ok(html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                div id="root" {}
                script id="page-data" type="application/json" { (PreEscaped(data)) }
                script src="/static/app.js" {}
            }
        }
    })
}

fn html_response(mut builder: HttpResponseBuilder, page: Markup) -> HttpResponse {
    builder.content_type(ContentType::html()).body(page.into_string())
}

#[get("/")]
pub async fn index(user: Option<AuthenticatedUser>) -> Result<HttpResponse, AppError> {
    let data = json!({ "logged_in": user.is_some() });
    Ok(html_response(HttpResponse::Ok(), shell("SpotOn", &data)?))
}

/// Rebuilds the user's quiz on every visit and shows where to share it.
#[get("/dashboard")]
pub async fn dashboard(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
    let Some(AuthenticatedUser(claims)) = user else {
        return Ok(redirect("/login?next=/dashboard"));
    };

    let quiz = match rebuild_quiz(&state, &claims).await {
        Ok(quiz) => quiz,
        Err(AppError::Unauthorized(_)) => return Ok(redirect("/login?next=/dashboard")),
        Err(AppError::InsufficientData(message)) => {
            let data = json!({ "error": message });
            return Ok(html_response(
                HttpResponse::UnprocessableEntity(),
                shell("SpotOn", &data)?,
            ));
        }
        Err(e) => return Err(e),
    };

    let data = json!({
        "quiz_id": quiz.id,
        "display_name": quiz.display_name,
        "share_url": state.config.share_url(&quiz.id),
    });
    Ok(html_response(HttpResponse::Ok(), shell("Your SpotOn quiz", &data)?))
}

#[get("/quiz/{id}")]
pub async fn quiz_page(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&id).await?;
    let title = format!("How well do you know {}?", quiz.display_name);
    let data = json!({ "quiz": QuizDto::from(&quiz) });

    Ok(html_response(HttpResponse::Ok(), shell(&title, &data)?))
}
