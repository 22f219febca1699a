//! Execution request model

/// The verified operation tuple, assembled by the gateway handler after
/// token verification and passed by value through the pipeline.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    /// Target backend identifier from the token claims.
    pub backend: String,
    /// Caller-supplied SQL, executed verbatim.
    pub sql: String,
    /// Observed source address of the caller.
    pub origin: String,
}
