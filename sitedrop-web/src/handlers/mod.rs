//! HTTP handlers

pub mod health;
pub mod website;

use actix_web::guard::{self, Guard, GuardContext};
use actix_web::http::header;
use actix_web::web;

/// Paths answering the publishing endpoint.
pub const WEBSITE_PATHS: [&str; 2] = ["/api/create-website", "/"];

/// Mounts every route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health::health)))
        .service(
            web::resource(WEBSITE_PATHS)
                .route(web::get().to(website::list_domains))
                .route(web::post().guard(multipart()).to(website::publish))
                .route(web::post().to(website::admin))
                .default_service(web::to(website::method_not_allowed)),
        );
}

fn multipart() -> impl Guard {
    guard::fn_guard(|ctx: &GuardContext<'_>| {
        ctx.head()
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
    })
}
