use crate::http;
use actix_web::web;

/// Mount every HTTP sub-module under `/api`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(http::leagues::init_routes)
            .configure(http::games::init_routes)
            .configure(http::bases::init_routes)
            .configure(http::activities::init_routes)
            .configure(http::overview::init_routes)
            .configure(http::health::init_routes),
    );
}
