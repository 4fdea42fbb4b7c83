use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the data API serving places, cameras, and report cells.
    pub data_api_base: String,

    /// Rerank collaborator endpoint. Empty string disables reranking.
    pub rerank_url: String,
    pub rerank_api_key: Option<String>,

    // Web server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            data_api_base: required_env("DATA_API_BASE"),
            rerank_url: env::var("RERANK_URL").unwrap_or_default(),
            rerank_api_key: env::var("RERANK_API_KEY").ok(),
            web_host: env::var("WEB_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_port: env::var("WEB_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("WEB_PORT must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
