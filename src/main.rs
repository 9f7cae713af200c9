use std::time::Duration;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use spoton_server::{
    app_state::AppState, auth::AuthMiddleware, config::Config, handlers,
    middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();

    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config
            .validate_for_production()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    }

    let state = AppState::new(config.clone())
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let _purge = state
        .session_service
        .clone()
        .spawn_purge_task(Duration::from_secs(config.session_purge_interval_secs));

    log::info!(
        "starting HTTP server on {}:{}",
        config.web_server_host,
        config.web_server_port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::from(state.jwt_service.clone()))
            .wrap(AuthMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new("%a \"%r\" %s %b %Dms %{x-request-id}o"))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .configure(handlers::configure)
    })
    .bind((config.web_server_host.as_str(), config.web_server_port))?
    .run()
    .await
}
