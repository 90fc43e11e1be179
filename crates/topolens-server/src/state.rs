//! Shared application state.

use std::sync::Arc;

use topolens_client::{ClientError, TokenClient, build_http_client};

use crate::config::AppConfig;
use crate::enterprise::Enterprise;
use crate::session::SessionStore;

/// State shared across all Axum handlers.
#[derive(Debug)]
pub struct AppState {
    /// Global configuration.
    pub config: AppConfig,
    /// Shared outbound HTTP client.
    pub http: reqwest::Client,
    /// Live sessions, keyed by cookie.
    pub sessions: SessionStore,
    /// Resolved URLs and cached subsystem metadata.
    pub enterprise: Enterprise,
}

impl AppState {
    /// Build the shared state from configuration.
    pub fn new(config: AppConfig) -> Result<Arc<Self>, ClientError> {
        let http = build_http_client(config.accept_invalid_certs)?;
        let enterprise = Enterprise::new(
            http.clone(),
            &config.portal_base_url,
            &config.server_base_url,
        );
        Ok(Arc::new(Self {
            config,
            http,
            sessions: SessionStore::new(),
            enterprise,
        }))
    }

    /// A token client bound to the portal's current public URL.
    pub async fn token_client(&self) -> TokenClient {
        TokenClient::new(
            self.http.clone(),
            self.enterprise.portal_url().await,
            self.config.client_id.clone(),
            self.config.client_secret.clone(),
        )
    }
}
