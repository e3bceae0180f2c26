mod config;
mod domain;
mod services;
mod state;
mod web;

use crate::services::ai::HttpChatBackend;
use crate::services::diet_plan::DietPlanService;
use crate::state::{AppState, SharedState};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::AppConfig::from_env()?;
    if config.api_key.is_none() {
        tracing::warn!("AI_GATEWAY_API_KEY missing; diet plan requests will fail until it is set");
    }

    let backend = Arc::new(HttpChatBackend::new(
        config.gateway_url.clone(),
        config.request_timeout,
    )?);
    let diet_plans = DietPlanService::new(backend, config.api_key.clone(), config.model.clone());
    tracing::info!(
        "AI gateway: {} (model {}, timeout {}s, configured: {})",
        config.gateway_url,
        config.model,
        config.request_timeout.as_secs(),
        diet_plans.is_configured()
    );

    let shared: SharedState = Arc::new(AppState {
        diet_plans: Arc::new(diet_plans),
    });

    let app = web::routes(shared).layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
