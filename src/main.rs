// kvery-agent entrypoint
//!
//! The heavy lifting (component bootstrap, server wiring, graceful shutdown)
//! lives in dedicated modules so this file remains a thin orchestrator.

use anyhow::Result;
use kvery_agent::config::GatewayConfig;
use kvery_agent::{lifecycle, logging};
use log::info;
use std::env;

#[actix_web::main]
async fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());

    let config = match GatewayConfig::from_file(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("FATAL: failed to load {}: {}", config_path, e);
            std::process::exit(1);
        }
    };

    // Logging before any other side effects
    logging::init_logging(&config.logging)?;
    info!("Successfully loaded '{}' configuration file", config_path);
    info!(
        "kvery-agent v{} listening on {}:{}",
        env!("CARGO_PKG_VERSION"),
        config.server.host,
        config.server.port
    );

    let components = lifecycle::bootstrap(&config)?;
    lifecycle::run(&config, components).await
}
