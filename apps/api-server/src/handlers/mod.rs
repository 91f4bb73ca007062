//! HTTP handlers and route configuration.

/// Initialise the full route table over `state` for an actix test.
#[cfg(test)]
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure($crate::handlers::configure_routes),
        )
        .await
    };
}

mod auth;
mod health;
mod posts;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    // Public routes
    .route("/", web::get().to(health::health_check))
    .route("/health", web::get().to(health::health_check))
    // Auth routes
    .service(
        web::resource("/login")
            .route(web::get().to(auth::login_form))
            .route(web::post().to(auth::login)),
    )
    .route("/register", web::post().to(auth::register))
    .route("/me", web::get().to(auth::me))
    // Post resource
    .service(
        web::resource("/posts")
            .route(web::get().to(posts::index))
            .route(web::post().to(posts::store)),
    )
    .service(
        web::resource("/posts/{id}")
            .route(web::get().to(posts::show))
            .route(web::put().to(posts::update))
            .route(web::delete().to(posts::destroy)),
    );
}
