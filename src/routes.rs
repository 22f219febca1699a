//! API routes configuration

use crate::handlers;
use actix_web::{web, HttpResponse};
use serde_json::json;

/// Configure gateway routes:
/// - GET /execute     — execute the SQL statement carried by the bearer token
/// - GET /healthcheck — liveness probe for load balancers
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::execute_query)
        .route("/healthcheck", web::get().to(healthcheck_handler));
}

async fn healthcheck_handler() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_healthcheck() {
        let app = test::init_service(App::new().configure(|cfg| {
            cfg.route("/healthcheck", web::get().to(healthcheck_handler));
        }))
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/healthcheck").to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body["status"], "healthy");
    }
}
