// Error types module
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;

use crate::auth::JwtError;
use crate::models::ExecuteResponse;
use crate::provider::ConnectError;

/// Request-terminal errors, one per pipeline stage.
///
/// Each kind maps to exactly one external status and is converted into a
/// terminal response at the point of detection. Only the database driver's
/// error text is ever exposed; internal details stay in the logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Authorization header missing or invalid")]
    AuthHeaderMissing,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    TokenInvalid(String),

    #[error("Connection and SQL query are required")]
    ClaimsIncomplete(&'static str),

    #[error("Unauthorized IP address")]
    OriginDenied(String),

    #[error("Invalid connection or database configuration not found")]
    BackendNotFound(String),

    #[error("Could not connect to backend: {0}")]
    ConnectionFailed(String),

    #[error("{0}")]
    ExecutionFailed(String),
}

impl GatewayError {
    /// External status for this error kind.
    ///
    /// BackendNotFound and ConnectionFailed intentionally share 404: a
    /// backend that cannot be reached is reported the same as one that is
    /// not configured.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthHeaderMissing
            | GatewayError::TokenExpired
            | GatewayError::TokenInvalid(_) => StatusCode::UNAUTHORIZED,
            GatewayError::ClaimsIncomplete(_) => StatusCode::BAD_REQUEST,
            GatewayError::OriginDenied(_) => StatusCode::FORBIDDEN,
            GatewayError::BackendNotFound(_) | GatewayError::ConnectionFailed(_) => {
                StatusCode::NOT_FOUND
            }
            GatewayError::ExecutionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the terminal response for this error.
    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ExecuteResponse::failure(self.to_string()))
    }
}

impl From<JwtError> for GatewayError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::MissingToken | JwtError::InvalidFormat => GatewayError::AuthHeaderMissing,
            JwtError::Expired => GatewayError::TokenExpired,
            JwtError::InvalidSignature(msg) => GatewayError::TokenInvalid(msg),
            JwtError::UnsupportedAlgorithm => {
                GatewayError::TokenInvalid("unsupported algorithm".to_string())
            }
            JwtError::MissingClaims(field) => GatewayError::ClaimsIncomplete(field),
        }
    }
}

impl From<ConnectError> for GatewayError {
    fn from(err: ConnectError) -> Self {
        GatewayError::ConnectionFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GatewayError::AuthHeaderMissing.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::TokenExpired.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            GatewayError::ClaimsIncomplete("sql").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::OriginDenied("1.2.3.4".to_string()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            GatewayError::BackendNotFound("x".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::ConnectionFailed("refused".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GatewayError::ExecutionFailed("no such table".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_jwt_error_conversion() {
        let err: GatewayError = JwtError::Expired.into();
        assert!(matches!(err, GatewayError::TokenExpired));

        let err: GatewayError = JwtError::MissingClaims("conn").into();
        assert!(matches!(err, GatewayError::ClaimsIncomplete("conn")));

        let err: GatewayError = JwtError::InvalidFormat.into();
        assert!(matches!(err, GatewayError::AuthHeaderMissing));
    }

    #[test]
    fn test_execution_failed_exposes_driver_text_only() {
        let err = GatewayError::ExecutionFailed("no such table: missing".to_string());
        assert_eq!(err.to_string(), "no such table: missing");
    }
}
