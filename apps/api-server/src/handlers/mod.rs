//! HTTP handlers and route configuration.

mod health;
mod moderation;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::resource("/moderate-content")
                    .route(web::post().to(moderation::moderate_content))
                    .default_service(web::to(moderation::method_not_allowed)),
            ),
    );
}
