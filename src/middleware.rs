//! Server-wide middleware constructors.
//!
//! Keeps the Actix application setup focused by providing reusable
//! constructors for the request logger and CORS layers. Admission control
//! (the origin allow-list) is not middleware: it runs inside the handler,
//! after token verification, per the fixed request pipeline.

use actix_cors::Cors;
use actix_web::middleware;

/// Build the request logger middleware.
pub fn request_logger() -> middleware::Logger {
    middleware::Logger::default()
}

/// Build the CORS middleware.
///
/// The gateway authenticates with bearer tokens, never cookies, so a
/// permissive policy is safe here.
pub fn build_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}
