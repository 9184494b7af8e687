use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tokio::time::Duration;
use tower_http::cors::{Any, CorsLayer};

mod config;
mod error;
mod handlers;
mod models;
mod services;
mod state;

use config::Config;
use services::rounds::RoundResolver;
use services::rpc_client::RpcClient;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter("presale_backend=debug,tower_http=debug")
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let chain = RpcClient::new(config.chain.clone());
    let state = AppState {
        resolver: Arc::new(RoundResolver::new(chain.clone())),
        chain,
        kyc_poll_tries: config.kyc_poll_tries,
        kyc_poll_delay: Duration::from_millis(config.kyc_poll_delay_ms),
    };

    // Build application
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/api/presale/active-round", get(handlers::presale::active_round))
        .route("/api/presale/vesting", get(handlers::presale::vesting))
        .route("/api/presale/quote", post(handlers::presale::quote))
        .route("/api/format/decimal", post(handlers::display::format_decimal))
        .route("/api/kyc/status/:address", get(handlers::kyc::status))
        .route("/api/kyc/await-verification", post(handlers::kyc::await_verification))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST])
                .allow_headers(Any),
        );

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        "🚀 Presale backend running on http://{} (chain id {})",
        addr,
        config.chain.chain_id
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
