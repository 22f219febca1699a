//! kvery-agent library
//!
//! Exposes the gateway modules for integration testing.

pub mod auth;
pub mod authorizer;
pub mod config;
pub mod error;
pub mod executor;
pub mod handlers;
pub mod lifecycle;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod provider;
pub mod registry;
pub mod routes;
