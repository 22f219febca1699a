//! Query execution handler for the `GET /execute` endpoint.
//!
//! The handler walks a fixed sequence of states, each a potential terminal
//! exit with one external status:
//!
//! 1. ParseAuth         — bearer header missing/malformed → 401
//! 2. VerifyToken       — expired/invalid → 401, incomplete claims → 400
//! 3. AuthorizeOrigin   — source address not allow-listed → 403
//! 4. ResolveBackend    — unknown identifier → 404
//! 5. AcquireConnection — connection failure → 404
//! 6. Execute           — rows/affected → 200, database error → 500
//!
//! No state is revisited; every exit produces exactly one response.

use actix_web::http::header;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::{error, info};
use std::sync::Arc;

use crate::auth::JwtAuth;
use crate::authorizer::OriginAllowList;
use crate::error::GatewayError;
use crate::executor::{ExecutionOutcome, QueryExecutor};
use crate::models::ExecuteResponse;
use crate::provider::ConnectionProvider;
use crate::registry::BackendRegistry;

#[get("/execute")]
pub async fn execute_query(
    http_req: HttpRequest,
    jwt: web::Data<Arc<JwtAuth>>,
    allowlist: web::Data<Arc<OriginAllowList>>,
    registry: web::Data<Arc<BackendRegistry>>,
    provider: web::Data<Arc<ConnectionProvider>>,
    executor: web::Data<Arc<QueryExecutor>>,
) -> impl Responder {
    // ParseAuth
    let auth_header = match http_req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    {
        Some(value) => value,
        None => return terminal(GatewayError::AuthHeaderMissing),
    };
    let token = match JwtAuth::extract_token(auth_header) {
        Ok(token) => token,
        Err(e) => return terminal(e.into()),
    };

    // VerifyToken
    let claims = match jwt.verify(token) {
        Ok(claims) => claims,
        Err(e) => return terminal(e.into()),
    };
    let origin = http_req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_default();
    let request = match claims.into_request(origin) {
        Ok(request) => request,
        Err(e) => return terminal(e.into()),
    };
    info!("SQL: '{}'", request.sql);

    // AuthorizeOrigin
    if !allowlist.is_allowed(&request.origin) {
        error!("Unauthorized IP address: {}", request.origin);
        return GatewayError::OriginDenied(request.origin).to_response();
    }

    // ResolveBackend
    let backend = match registry.resolve(&request.backend) {
        Some(backend) => backend,
        None => return terminal(GatewayError::BackendNotFound(request.backend)),
    };

    // AcquireConnection
    let conn = match provider.acquire(backend).await {
        Ok(conn) => conn,
        Err(e) => return terminal(e.into()),
    };

    // Execute
    match executor.execute(conn, &request.sql).await {
        ExecutionOutcome::RowSet(rows) => HttpResponse::Ok().json(ExecuteResponse::rows(rows)),
        ExecutionOutcome::AffectedCount(count) => {
            HttpResponse::Ok().json(ExecuteResponse::affected(count))
        }
        ExecutionOutcome::Failure(detail) => terminal(GatewayError::ExecutionFailed(detail)),
    }
}

/// Log the failure and convert it into its terminal response.
fn terminal(err: GatewayError) -> HttpResponse {
    error!("{}", err);
    err.to_response()
}
