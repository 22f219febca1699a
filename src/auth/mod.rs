//! Access token verification

pub mod jwt;

pub use jwt::{Claims, JwtAuth, JwtError};
