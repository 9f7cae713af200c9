use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    get,
    http::header::LOCATION,
    web, HttpResponse,
};

use crate::{
    app_state::AppState,
    auth::{AuthenticatedUser, SESSION_COOKIE},
    errors::AppError,
    models::dto::{request::safe_redirect_path, CallbackParams, LoginParams},
};

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((LOCATION, location.to_string()))
        .finish()
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(state.config.secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::hours(state.config.session_expiration_hours))
        .finish()
}

/// Sends the browser to Spotify's consent page.
#[get("/login")]
pub async fn login(
    state: web::Data<AppState>,
    web::Query(params): web::Query<LoginParams>,
) -> Result<HttpResponse, AppError> {
    let url = state.session_service.authorize_url(params.next.as_deref())?;
    Ok(redirect(&url))
}

/// Spotify's redirect back after the consent page.
#[get("/logged_in")]
pub async fn logged_in(
    state: web::Data<AppState>,
    web::Query(params): web::Query<CallbackParams>,
) -> Result<HttpResponse, AppError> {
    if let Some(error) = params.error {
        log::warn!("Spotify login was not completed: {}", error);
        return Ok(redirect("/"));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::ValidationError("Missing authorization code".to_string()))?;

    let session = state
        .session_service
        .complete_login(&code)
        .await
        .inspect_err(|e| log::warn!("Spotify login failed: {}", e))?;
    let token = state.jwt_service.create_token(&session)?;

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, safe_redirect_path(params.state.as_deref())))
        .cookie(session_cookie(&state, token))
        .finish())
}

#[get("/logout")]
pub async fn logout(
    state: web::Data<AppState>,
    user: Option<AuthenticatedUser>,
) -> Result<HttpResponse, AppError> {
    if let Some(AuthenticatedUser(claims)) = user {
        state.session_service.logout(&claims.sid).await?;
    }

    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();

    Ok(HttpResponse::Found()
        .insert_header((LOCATION, "/"))
        .cookie(removal)
        .finish())
}
