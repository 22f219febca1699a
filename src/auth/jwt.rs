//! JWT verification and claims extraction
//!
//! The access token both authenticates the caller and carries the
//! operation's parameters: the target backend identifier and the SQL
//! statement to run. Claims are never read before the signature has been
//! verified.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ExecutionRequest;

/// Token verification errors
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token is missing from the Authorization header
    #[error("Missing bearer token")]
    MissingToken,

    /// Header is not of the form "Bearer <token>"
    #[error("Invalid authorization format (expected 'Bearer <token>')")]
    InvalidFormat,

    /// Signature verification failed or the token is structurally invalid
    #[error("Invalid token: {0}")]
    InvalidSignature(String),

    /// Token validity window has passed
    #[error("Token expired")]
    Expired,

    /// Token was signed with an algorithm other than the fixed one
    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,

    /// Claims are missing a required field
    #[error("Missing required claim: {0}")]
    MissingClaims(&'static str),
}

/// Decoded token payload.
///
/// `conn` and `sql` are optional at the serde level so that their absence
/// surfaces as a distinct incomplete-claims error instead of a decode
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Target backend identifier
    #[serde(default)]
    pub conn: Option<String>,

    /// SQL statement to execute
    #[serde(default)]
    pub sql: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    /// Combine verified claims with the caller's observed source address.
    ///
    /// Both operation parameters must be present and non-empty.
    pub fn into_request(self, origin: String) -> Result<ExecutionRequest, JwtError> {
        let backend = match self.conn {
            Some(conn) if !conn.is_empty() => conn,
            _ => return Err(JwtError::MissingClaims("conn")),
        };
        let sql = match self.sql {
            Some(sql) if !sql.is_empty() => sql,
            _ => return Err(JwtError::MissingClaims("sql")),
        };
        Ok(ExecutionRequest { backend, sql, origin })
    }
}

/// Access token verifier with a single shared secret and a fixed HS256
/// signing algorithm.
pub struct JwtAuth {
    secret: String,
    validation: Validation,
}

impl JwtAuth {
    pub fn new(secret: String) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // No clock-skew leeway: an expired token is expired.
        validation.leeway = 0;

        Self { secret, validation }
    }

    /// Verify a raw token and return its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::InvalidSignature(e.to_string()))?;
        if header.alg != self.validation.algorithms[0] {
            return Err(JwtError::UnsupportedAlgorithm);
        }

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::InvalidSignature(e.to_string()),
        })?;

        Ok(token_data.claims)
    }

    /// Extract the raw token from an Authorization header value.
    pub fn extract_token(auth_header: &str) -> Result<&str, JwtError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(JwtError::InvalidFormat);
        }

        let token = &auth_header[7..];
        if token.is_empty() {
            return Err(JwtError::MissingToken);
        }

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn create_test_token(
        secret: &str,
        conn: Option<&str>,
        sql: Option<&str>,
        exp_offset: i64,
    ) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            conn: conn.map(str::to_string),
            sql: sql.map(str::to_string),
            exp: (now + exp_offset) as u64,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_verify_valid_token() {
        let auth = JwtAuth::new("gateway-secret".to_string());
        let token = create_test_token("gateway-secret", Some("main"), Some("SELECT 1"), 3600);

        let claims = auth.verify(&token).unwrap();
        assert_eq!(claims.conn.as_deref(), Some("main"));
        assert_eq!(claims.sql.as_deref(), Some("SELECT 1"));
    }

    #[test]
    fn test_verify_expired_token() {
        let auth = JwtAuth::new("gateway-secret".to_string());
        let token = create_test_token("gateway-secret", Some("main"), Some("SELECT 1"), -100);

        assert!(matches!(auth.verify(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn test_verify_wrong_secret() {
        let auth = JwtAuth::new("secret1".to_string());
        let token = create_test_token("secret2", Some("main"), Some("SELECT 1"), 3600);

        assert!(matches!(
            auth.verify(&token),
            Err(JwtError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_verify_garbage_token() {
        let auth = JwtAuth::new("gateway-secret".to_string());
        assert!(matches!(
            auth.verify("not-a-jwt"),
            Err(JwtError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_into_request_complete_claims() {
        let claims = Claims {
            conn: Some("main".to_string()),
            sql: Some("SELECT 1".to_string()),
            exp: 0,
        };
        let request = claims.into_request("10.0.0.1".to_string()).unwrap();
        assert_eq!(request.backend, "main");
        assert_eq!(request.sql, "SELECT 1");
        assert_eq!(request.origin, "10.0.0.1");
    }

    #[test]
    fn test_into_request_missing_conn() {
        let claims = Claims {
            conn: None,
            sql: Some("SELECT 1".to_string()),
            exp: 0,
        };
        assert!(matches!(
            claims.into_request(String::new()),
            Err(JwtError::MissingClaims("conn"))
        ));
    }

    #[test]
    fn test_into_request_empty_sql() {
        let claims = Claims {
            conn: Some("main".to_string()),
            sql: Some(String::new()),
            exp: 0,
        };
        assert!(matches!(
            claims.into_request(String::new()),
            Err(JwtError::MissingClaims("sql"))
        ));
    }

    #[test]
    fn test_extract_token() {
        let token = JwtAuth::extract_token("Bearer abc.def.ghi").unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_extract_token_invalid_format() {
        assert!(matches!(
            JwtAuth::extract_token("Token abc"),
            Err(JwtError::InvalidFormat)
        ));
    }

    #[test]
    fn test_extract_token_missing() {
        assert!(matches!(
            JwtAuth::extract_token("Bearer "),
            Err(JwtError::MissingToken)
        ));
    }
}
