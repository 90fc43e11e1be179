//! Enterprise context: resolved base URLs and cached subsystem metadata.
//!
//! This replaces an implicit startup singleton with an explicit context
//! object shared via [`std::sync::Arc`]. URL resolution is its own
//! initialization step ([`Enterprise::resolve_urls`]); after that the caches
//! are effectively write-once-then-read — per-request fetches update them,
//! but re-resolution of base URLs is an administrative operation, not a
//! per-request one.

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use topolens_client::{
    ClientError, PortalAdminClient, ServerAdminClient, portal, server,
};
use topolens_models::{DataStoreItem, WebAdaptorInfo};

/// Cached state for one subsystem (portal or server).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemState {
    /// The pre-configured base address.
    pub base_url: String,
    /// The resolved externally-reachable URL.
    pub url: String,
    /// Last fetched product version.
    pub version: Option<String>,
    /// Last fetched build number.
    pub build: Option<String>,
    /// Last fetched web-adaptor registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_adaptor: Option<WebAdaptorInfo>,
}

impl SubsystemState {
    fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            url: base_url.trim_end_matches('/').to_string(),
            version: None,
            build: None,
            web_adaptor: None,
        }
    }
}

/// Shared enterprise context.
#[derive(Debug)]
pub struct Enterprise {
    http: reqwest::Client,
    portal: RwLock<SubsystemState>,
    server: RwLock<SubsystemState>,
    data_stores: RwLock<Vec<DataStoreItem>>,
}

impl Enterprise {
    /// Build an unresolved context from the configured base addresses.
    pub fn new(http: reqwest::Client, portal_base_url: &str, server_base_url: &str) -> Self {
        Self {
            http,
            portal: RwLock::new(SubsystemState::new(portal_base_url)),
            server: RwLock::new(SubsystemState::new(server_base_url)),
            data_stores: RwLock::new(Vec::new()),
        }
    }

    /// Resolve the public portal and server URLs from the base addresses.
    ///
    /// The portal is the identity anchor: failure to resolve it is returned
    /// to the caller (fatal at startup). The server URL is only a heuristic
    /// guess at this point — a failed verification probe is logged and the
    /// guess kept, because the web-adaptor fetch later installs the
    /// authoritative URL anyway.
    pub async fn resolve_urls(&self) -> Result<(), ClientError> {
        let portal_base = self.portal.read().await.base_url.clone();
        let portal_url = portal::owning_system_url(&self.http, &portal_base).await?;
        info!(url = %portal_url, "portal public URL resolved");
        self.portal.write().await.url = portal_url;

        let server_base = self.server.read().await.base_url.clone();
        if let Some(guess) = server::guess_public_url(&server_base) {
            let probe = ServerAdminClient::new(self.http.clone(), guess.clone());
            match probe.health_check().await {
                Ok(_) => info!(url = %guess, "server public URL guessed and verified"),
                Err(e) => warn!(url = %guess, error = %e, "server URL guess not verifiable"),
            }
            self.server.write().await.url = guess;
        } else {
            warn!(base_url = %server_base, "server base address does not match the rewrite rule; using it as-is");
        }
        Ok(())
    }

    /// Install explicit public URLs, bypassing resolution.
    ///
    /// Administrative operation; also used by tests to point the context at
    /// a mock deployment.
    pub async fn override_urls(&self, portal_url: &str, server_url: &str) {
        self.portal.write().await.url = portal_url.to_string();
        self.server.write().await.url = server_url.to_string();
    }

    /// The portal's current public URL.
    pub async fn portal_url(&self) -> String {
        self.portal.read().await.url.clone()
    }

    /// A portal admin client bound to the current portal URL.
    pub async fn portal_client(&self) -> PortalAdminClient {
        PortalAdminClient::new(self.http.clone(), self.portal_url().await)
    }

    /// A server admin client bound to the current server URL.
    pub async fn server_client(&self) -> ServerAdminClient {
        let url = self.server.read().await.url.clone();
        ServerAdminClient::new(self.http.clone(), url)
    }

    /// Snapshot of the cached portal metadata.
    pub async fn portal_meta(&self) -> SubsystemState {
        self.portal.read().await.clone()
    }

    /// Snapshot of the cached server metadata.
    pub async fn server_meta(&self) -> SubsystemState {
        self.server.read().await.clone()
    }

    /// Snapshot of the cached data-store items.
    pub async fn data_stores(&self) -> Vec<DataStoreItem> {
        self.data_stores.read().await.clone()
    }

    pub(crate) async fn set_portal_version(&self, version: Option<String>, build: Option<String>) {
        let mut portal = self.portal.write().await;
        portal.version = version;
        portal.build = build;
    }

    pub(crate) async fn set_server_version(&self, version: Option<String>, build: Option<String>) {
        let mut server = self.server.write().await;
        server.version = version;
        server.build = build;
    }

    /// Cache a portal web-adaptor registration; its URL is authoritative and
    /// overwrites the resolved one.
    pub(crate) async fn set_portal_adaptor(&self, adaptor: WebAdaptorInfo) {
        let mut portal = self.portal.write().await;
        portal.url = adaptor.url.clone();
        portal.web_adaptor = Some(adaptor);
    }

    /// Cache a server web-adaptor registration; its URL overwrites the
    /// heuristic guess.
    pub(crate) async fn set_server_adaptor(&self, adaptor: WebAdaptorInfo) {
        let mut server = self.server.write().await;
        server.url = adaptor.url.clone();
        server.web_adaptor = Some(adaptor);
    }

    pub(crate) async fn set_data_stores(&self, items: Vec<DataStoreItem>) {
        *self.data_stores.write().await = items;
    }
}
