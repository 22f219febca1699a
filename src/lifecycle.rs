//! Server lifecycle management helpers.
//!
//! Encapsulates the heavy lifting otherwise handled in `main.rs`:
//! building the shared components, wiring the HTTP server, and
//! coordinating graceful shutdown.

use crate::auth::JwtAuth;
use crate::authorizer::OriginAllowList;
use crate::config::GatewayConfig;
use crate::executor::QueryExecutor;
use crate::provider::ConnectionProvider;
use crate::registry::BackendRegistry;
use crate::{middleware, routes};
use actix_web::{web, App, HttpServer};
use anyhow::Result;
use log::{info, warn};
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

/// Shared components wired into every HTTP worker.
///
/// All of them are read-only after bootstrap, so they are shared across
/// concurrently handled requests without locking.
#[derive(Clone)]
pub struct GatewayComponents {
    pub jwt: Arc<JwtAuth>,
    pub allowlist: Arc<OriginAllowList>,
    pub registry: Arc<BackendRegistry>,
    pub provider: Arc<ConnectionProvider>,
    pub executor: Arc<QueryExecutor>,
}

/// Build the request pipeline components from validated configuration.
pub fn bootstrap(config: &GatewayConfig) -> Result<GatewayComponents> {
    let registry = Arc::new(BackendRegistry::new(config.backends.clone()));
    info!("Backend registry loaded with {} target(s)", registry.len());

    let allowlist = Arc::new(OriginAllowList::new(config.auth.ip_allowlist.iter().cloned()));
    if allowlist.is_empty() {
        warn!("IP allow-list is empty - every request will be rejected");
    }

    Ok(GatewayComponents {
        jwt: Arc::new(JwtAuth::new(config.auth.secret_key.clone())),
        allowlist,
        registry,
        provider: Arc::new(ConnectionProvider::new(Duration::from_secs(
            config.limits.connect_timeout_secs,
        ))),
        executor: Arc::new(QueryExecutor::new(Duration::from_secs(
            config.limits.query_timeout_secs,
        ))),
    })
}

/// Start the HTTP server and manage graceful shutdown.
pub async fn run(config: &GatewayConfig, components: GatewayComponents) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting HTTP server on {}", bind_addr);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors())
            .app_data(web::Data::new(components.jwt.clone()))
            .app_data(web::Data::new(components.allowlist.clone()))
            .app_data(web::Data::new(components.registry.clone()))
            .app_data(web::Data::new(components.provider.clone()))
            .app_data(web::Data::new(components.executor.clone()))
            .configure(routes::configure)
    })
    .workers(if config.server.workers == 0 {
        num_cpus::get()
    } else {
        config.server.workers
    })
    .keep_alive(Duration::from_secs(config.server.keepalive_timeout))
    .client_request_timeout(Duration::from_secs(config.server.client_request_timeout))
    .bind(&bind_addr)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    tokio::select! {
        result = server_task => {
            if let Err(e) = result {
                log::error!("Server task failed: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
            server_handle.stop(true).await;
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// A running HTTP server instance intended for integration tests.
///
/// Starts the same Actix app wiring as the production server (middleware
/// stack, route registration, app_data wiring) but binds to an ephemeral
/// port and provides an explicit shutdown handle.
pub struct RunningTestHttpServer {
    pub base_url: String,
    pub bind_addr: SocketAddr,
    server_handle: actix_web::dev::ServerHandle,
    server_task: tokio::task::JoinHandle<std::io::Result<()>>,
}

impl RunningTestHttpServer {
    pub async fn shutdown(self) {
        self.server_handle.stop(false).await;
        let _ = self.server_task.await;
    }
}

/// Start the HTTP server for integration tests on a random available port.
///
/// Does not install Ctrl+C handling; the caller must invoke `shutdown()`.
pub async fn run_for_tests(
    config: &GatewayConfig,
    components: GatewayComponents,
) -> Result<RunningTestHttpServer> {
    let bind_ip = if config.server.host.is_empty() {
        "127.0.0.1"
    } else {
        config.server.host.as_str()
    };

    let listener = TcpListener::bind((bind_ip, 0))?;
    let bind_addr = listener.local_addr()?;

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::request_logger())
            .wrap(middleware::build_cors())
            .app_data(web::Data::new(components.jwt.clone()))
            .app_data(web::Data::new(components.allowlist.clone()))
            .app_data(web::Data::new(components.registry.clone()))
            .app_data(web::Data::new(components.provider.clone()))
            .app_data(web::Data::new(components.executor.clone()))
            .configure(routes::configure)
    })
    .workers(1)
    .listen(listener)?
    .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);
    let base_url = format!("http://{}", bind_addr);

    Ok(RunningTestHttpServer {
        base_url,
        bind_addr,
        server_handle,
        server_task,
    })
}
