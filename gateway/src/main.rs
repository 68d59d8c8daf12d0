use anyhow::Result;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relief_services::{ChatClient, SearchClient, WeatherClient};

mod config;
mod routes;

use config::GatewayConfig;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchClient>,
    pub weather: Arc<WeatherClient>,
    pub chat: Arc<ChatClient>,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> relief_services::Result<Self> {
        Ok(Self {
            search: Arc::new(SearchClient::new(config.search.clone())?),
            weather: Arc::new(WeatherClient::new(config.weather.clone())?),
            chat: Arc::new(ChatClient::new(config.chat.clone())?),
        })
    }
}

/// Full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", routes::api_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "relief_gateway=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env();

    if config.search.is_configured() {
        tracing::info!(
            "   Search indexes: {} / {}",
            config.search.relief_index,
            config.search.disaster_index
        );
    } else {
        tracing::warn!("   Search not configured - relief and alert lists will be empty");
    }
    if config.weather.api_key.is_none() {
        tracing::warn!("   Weather not configured - safety view shows placeholders");
    }
    tracing::info!("   Chat endpoint: {}", config.chat.endpoint);

    let state = AppState::from_config(&config)?;
    let addr = format!("0.0.0.0:{}", config.port);

    tracing::info!("Relief Gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "relief-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
