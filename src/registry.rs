//! Backend registry: the set of named database targets.
//!
//! The registry is built once at startup from configuration and is
//! read-only afterwards, so it can be shared across concurrently handled
//! requests without locking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Supported database engine families.
///
/// This is a closed set: configuration entries with any other value fail
/// deserialization at load time instead of falling through to a default
/// backend at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Mysql,
    #[serde(alias = "postgres")]
    Pgsql,
    Sqlite,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Mysql => write!(f, "mysql"),
            EngineKind::Pgsql => write!(f, "pgsql"),
            EngineKind::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Connection parameters for one named database target.
///
/// Immutable once loaded. SQLite targets use `database` as the file path
/// and ignore the network and credential fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: EngineKind,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
}

/// Name → connection-parameter mapping resolved per request.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, BackendConfig>,
}

impl BackendRegistry {
    pub fn new(backends: HashMap<String, BackendConfig>) -> Self {
        Self { backends }
    }

    /// Resolve a backend identifier to its connection parameters.
    ///
    /// Unknown identifiers yield `None`, never a default backend.
    pub fn resolve(&self, name: &str) -> Option<&BackendConfig> {
        self.backends.get(name)
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}
