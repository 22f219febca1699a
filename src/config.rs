// Configuration module
use crate::registry::BackendConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main gateway configuration, loaded once at startup and treated as
/// immutable for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    pub server: ServerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub limits: LimitsSettings,
    /// Named database targets, keyed by backend identifier.
    #[serde(default)]
    pub backends: HashMap<String, BackendConfig>,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Worker count; 0 means one per CPU core.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout: u64,
    #[serde(default = "default_client_request_timeout")]
    pub client_request_timeout: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_file")]
    pub file_path: String,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            file_path: default_log_file(),
            log_to_console: true,
            format: default_log_format(),
        }
    }
}

/// Authentication and authorization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// Shared HS256 signing secret for access tokens.
    pub secret_key: String,
    /// Exact source addresses permitted to call the gateway.
    #[serde(default)]
    pub ip_allowlist: Vec<String>,
}

/// Bounds on the two operations that block on backend I/O.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsSettings {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
}

impl Default for LimitsSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            query_timeout_secs: default_query_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_keepalive_timeout() -> u64 {
    75
}

fn default_client_request_timeout() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/kvery-agent.log".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_query_timeout() -> u64 {
    60
}

impl GatewayConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let mut config: GatewayConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides for sensitive configuration.
    ///
    /// Environment variables take precedence over config file values:
    /// - KVERY_SECRET_KEY: Override auth.secret_key
    /// - KVERY_HOST: Override server.host
    /// - KVERY_PORT: Override server.port (ignored when unparseable)
    fn apply_env_overrides(&mut self) {
        use std::env;

        if let Ok(secret) = env::var("KVERY_SECRET_KEY") {
            self.auth.secret_key = secret;
        }
        if let Ok(host) = env::var("KVERY_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("KVERY_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
    }

    /// Validate configuration settings
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            return Err(anyhow::anyhow!("Server port cannot be 0"));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        if self.auth.secret_key.is_empty() {
            return Err(anyhow::anyhow!("auth.secret_key cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::EngineKind;

    const SAMPLE: &str = r#"
        [server]
        port = 5001

        [auth]
        secret_key = "gateway-secret"
        ip_allowlist = ["10.0.0.1", "10.0.0.2"]

        [backends.reporting]
        kind = "pgsql"
        host = "db.internal"
        port = 5432
        username = "reporter"
        password = "hunter2"
        database = "reports"

        [backends.archive]
        kind = "sqlite"
        database = "/var/lib/archive.db"
    "#;

    #[test]
    fn test_parse_sample_config() {
        let config: GatewayConfig = toml::from_str(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.auth.ip_allowlist.len(), 2);
        assert_eq!(config.limits.connect_timeout_secs, 10);

        let reporting = &config.backends["reporting"];
        assert_eq!(reporting.kind, EngineKind::Pgsql);
        assert_eq!(reporting.port, 5432);

        // SQLite entries may omit host/port/credentials
        let archive = &config.backends["archive"];
        assert_eq!(archive.kind, EngineKind::Sqlite);
        assert_eq!(archive.database, "/var/lib/archive.db");
    }

    #[test]
    fn test_unknown_engine_kind_rejected() {
        let raw = r#"
            [server]
            port = 5001

            [auth]
            secret_key = "s"

            [backends.bad]
            kind = "oracle"
            database = "x"
        "#;
        let result: Result<GatewayConfig, _> = toml::from_str(raw);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let raw = r#"
            [server]
            port = 5001

            [auth]
            secret_key = ""
        "#;
        let config: GatewayConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_port_zero_rejected() {
        let raw = r#"
            [server]
            port = 0

            [auth]
            secret_key = "s"
        "#;
        let config: GatewayConfig = toml::from_str(raw).unwrap();
        assert!(config.validate().is_err());
    }
}
