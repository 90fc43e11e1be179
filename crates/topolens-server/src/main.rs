//! Topolens backend — topology aggregator for a federated enterprise
//! deployment.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use topolens_server::routes;
use topolens_server::{AppConfig, AppState};

/// Enterprise topology aggregation backend.
#[derive(Parser, Debug)]
#[command(name = "topolens-server", about = "Enterprise topology aggregation backend")]
struct Args {
    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
    /// Accept invalid upstream TLS certificates (dev deployments).
    #[arg(long)]
    insecure_tls: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging (controlled via RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Missing required configuration is fatal: refuse to serve.
    let mut config = AppConfig::from_env().context("configuration")?;
    if let Some(port) = args.port {
        config.listen_port = port;
    }
    if args.insecure_tls {
        config.accept_invalid_certs = true;
    }

    let state = AppState::new(config).context("building shared state")?;

    // The portal base address is the identity anchor; failing to resolve it
    // at startup is not recoverable per-request.
    state
        .enterprise
        .resolve_urls()
        .await
        .context("resolving subsystem URLs")?;

    let app = routes::router(state.clone());
    let addr = format!("0.0.0.0:{}", state.config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(address = %addr, "topolens backend listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
