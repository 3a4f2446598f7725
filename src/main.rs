//! Product API - an in-memory product catalogue over HTTP.
//!
//! This binary parses configuration, sets up logging and runs the server
//! until Ctrl+C or SIGTERM.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use product_api::{
    config::Config,
    product::ProductStore,
    server::{auth::AuthPolicy, create_router, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    run_serve(config).await
}

// =============================================================================
// Serve
// =============================================================================

async fn run_serve(config: Config) -> ExitCode {
    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let auth = config.auth_policy();

    info!("Product API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");

    // Auth status with warning if disabled
    match auth {
        AuthPolicy::None => {
            warn!("  Auth: DISABLED - all product routes are publicly writable");
            warn!("        Enable for production: --auth-mode api-key|bearer");
        }
        AuthPolicy::ApiKey { .. } => info!("  Auth: api-key (x-api-key header, all methods)"),
        AuthPolicy::BearerPresence => info!("  Auth: bearer (Authorization header, writes only)"),
    }

    // Create the store
    let store = if config.seed {
        ProductStore::with_sample_data()
    } else {
        ProductStore::new()
    };
    info!("  Products: {} loaded", store.len().await);

    // Build router configuration
    let router_config = build_router_config(&config, auth);

    // Create router
    let router = create_router(Arc::new(store), router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("  Server listening on: http://{}", addr);
    info!("    curl http://{}/products", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server shutdown complete");
    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "product_api=debug,tower_http=debug"
    } else {
        "product_api=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config, auth: AuthPolicy) -> RouterConfig {
    let mut router_config = RouterConfig::new(auth);

    // Apply CORS origins
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Apply tracing setting
    router_config.with_tracing(!config.no_tracing)
}

/// Resolve when the process is asked to stop.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
