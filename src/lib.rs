// src/lib.rs

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod mcp;
pub mod poi;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration, read-only after startup
    pub config: Arc<config::Config>,
    /// Client for the Proof of Invention upload API
    pub poi_client: poi::PoiClient,
}

impl AppState {
    pub fn new(config: config::Config) -> reqwest::Result<Self> {
        let poi_client = poi::PoiClient::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            poi_client,
        })
    }
}
