use actix_web::web;

#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .app_data(actix_web::web::Data::from($state.jwt_service.clone()))
                .wrap(crate::auth::AuthMiddleware)
                .configure(crate::handlers::configure),
        )
    };
}

pub mod auth_handler;
pub mod health_handler;
pub mod pages;
pub mod quiz_handler;
pub mod response_handler;

pub use auth_handler::{logged_in, login, logout};
pub use health_handler::{health_check, health_check_live, health_check_ready};
pub use pages::{dashboard, index, quiz_page};
pub use quiz_handler::{create_quiz, get_quiz, my_responses};
pub use response_handler::submit_response;

/// Registers every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(health_check_ready)
        .service(login)
        .service(logged_in)
        .service(logout)
        .service(create_quiz)
        .service(my_responses)
        .service(get_quiz)
        .service(submit_response)
        .service(index)
        .service(dashboard)
        .service(quiz_page);
}
