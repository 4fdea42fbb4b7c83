use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use meetspot_api::sources::{DataApiClient, HttpReranker};
use meetspot_api::{build_router, AppState};
use meetspot_common::Config;
use meetspot_engine::{EngineDeps, InMemoryCache, RecommendEngine, Reranker};
use rerank_client::RerankClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting meetspot-api");

    let config = Config::from_env();
    let http = reqwest::Client::new();

    let data_api = Arc::new(DataApiClient::new(http, config.data_api_base.clone()));
    let reranker: Option<Arc<dyn Reranker>> = if config.rerank_url.is_empty() {
        tracing::info!("RERANK_URL not set, reranking disabled");
        None
    } else {
        let client = Arc::new(RerankClient::new(
            config.rerank_url.clone(),
            config.rerank_api_key.clone(),
        ));
        Some(Arc::new(HttpReranker::new(client)))
    };

    let engine = RecommendEngine::new(EngineDeps {
        places: data_api.clone(),
        cameras: data_api.clone(),
        reports: data_api,
        reranker,
        cache: Arc::new(InMemoryCache::new()),
    });

    let state = Arc::new(AppState { engine });
    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    tracing::info!(addr = %addr, "Listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
