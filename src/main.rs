//! Plinko API Server Binary
//!
//! HTTP backend for the chat mini-app game. The bot token comes from the
//! `BOT_TOKEN` environment variable; everything else has sensible defaults
//! or lives in an optional TOML file.

use clap::Parser;
use plinko::api::ApiServer;
use plinko::config::PlinkoConfig;

#[derive(Parser, Debug)]
#[command(name = "plinko-api")]
#[command(about = "Plinko Mini-App API Server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// API server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// API server port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long)]
    cors_origins: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plinko=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = PlinkoConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(origins) = args.cors_origins {
        config.server.allowed_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();
    }
    if let Some(timeout) = args.timeout {
        config.server.request_timeout_secs = timeout;
    }
    config.validate()?;

    ApiServer::new(config).run().await
}
