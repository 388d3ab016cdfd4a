//! Cross-origin headers for browser clients.
//!
//! The API is public and carries no cookies, so every response allows any
//! origin and preflight requests are answered without touching a handler.

use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpResponse, guard, web};

pub(crate) const ALLOW_ORIGIN: &str = "*";
pub(crate) const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub(crate) const ALLOW_HEADERS: &str = "Content-Type,Authorization";
pub(crate) const MAX_AGE_SECONDS: &str = "3600";

/// Middleware adding the CORS headers to every response, errors included.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", ALLOW_ORIGIN))
        .add(("Access-Control-Allow-Methods", ALLOW_METHODS))
        .add(("Access-Control-Allow-Headers", ALLOW_HEADERS))
        .add(("Access-Control-Max-Age", MAX_AGE_SECONDS))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Answer `OPTIONS` for any path under the scope this is registered on.
pub fn configure_preflight(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .guard(guard::Options())
            .to(preflight),
    );
}
