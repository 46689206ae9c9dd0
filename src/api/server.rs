//! API Server
//!
//! Builds the shared game state from configuration and serves the router
//! behind the middleware stack until a shutdown signal arrives.

use super::{
    handlers::AppState,
    middleware::{create_cors_layer, request_id_middleware},
    routes::create_router,
};
use crate::{config::PlinkoConfig, economy::AccountLedger, game::PrizeBoard};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Game API server
pub struct ApiServer {
    config: PlinkoConfig,
}

impl ApiServer {
    pub fn new(config: PlinkoConfig) -> Self {
        Self { config }
    }

    /// Start the API server
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🚀 Starting Plinko API Server");

        if self.config.auth.skip_verification {
            warn!("⚠️  Init-data signature verification is DISABLED (DEV_SKIP_VERIFY)");
            warn!("   Never run production traffic in this mode");
        }

        let app = self.create_app();
        let addr = self.get_socket_addr()?;

        info!("   Listen: http://{}", addr);
        self.log_server_info();

        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("✅ API Server running");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("🛑 API Server stopped gracefully");
        Ok(())
    }

    /// Create the application with the middleware stack
    fn create_app(&self) -> axum::Router {
        let state = Arc::new(AppState {
            ledger: AccountLedger::new(self.config.economy.clone()),
            board: PrizeBoard::new(self.config.board.bins.clone()),
            bot_token: self.config.auth.bot_token.clone(),
            skip_verification: self.config.auth.skip_verification,
        });

        create_router(state)
            // Request ID middleware (first for tracing)
            .layer(axum::middleware::from_fn(request_id_middleware))
            // CORS layer (before timeout to handle preflight)
            .layer(create_cors_layer(&self.config.server.allowed_origins))
            // Timeout layer
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.server.request_timeout_secs,
            )))
            // Tracing layer (last for complete request tracing)
            .layer(TraceLayer::new_for_http())
    }

    /// Get socket address from config
    fn get_socket_addr(&self) -> Result<SocketAddr, Box<dyn std::error::Error>> {
        Ok(SocketAddr::from((
            self.config.server.host.parse::<std::net::IpAddr>()?,
            self.config.server.port,
        )))
    }

    /// Log server information
    fn log_server_info(&self) {
        info!("📋 Server Configuration:");
        info!("   CORS: {:?}", self.config.server.allowed_origins);
        info!(
            "   Request timeout: {}s",
            self.config.server.request_timeout_secs
        );

        info!("🎯 Game Settings:");
        info!(
            "   Balls: {} cap, +{} every {}s",
            self.config.economy.start_balls,
            self.config.economy.refill_amount,
            self.config.economy.refill_every_secs
        );
        info!("   Prize bins: {:?}", self.config.board.bins);

        info!("📊 Available endpoints:");
        info!("   GET  /health         - Health check");
        info!("   POST /api/bootstrap  - Session bootstrap");
        info!("   POST /api/drop       - Drop a ball");
        info!("   POST /api/records    - Current totals");
    }
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }
}
