//! Backend configuration.
//!
//! Built from environment variables at startup and injected into Axum
//! handlers via [`axum::extract::State`]. A missing required base address is
//! fatal: the service refuses to start rather than serve without its
//! identity anchor.

/// Global configuration shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Pre-configured portal base address (e.g. `https://host:7443/arcgis`).
    pub portal_base_url: String,
    /// Pre-configured server base address (e.g. `https://host:6443/arcgis`).
    pub server_base_url: String,
    /// OAuth2 application client id registered with the portal.
    pub client_id: String,
    /// OAuth2 application client secret.
    pub client_secret: String,
    /// Redirect URI sent on the authorization-code exchange.
    pub redirect_uri: String,
    /// Port to listen on (default `3000`).
    pub listen_port: u16,
    /// Accept self-signed upstream certificates (dev deployments).
    pub accept_invalid_certs: bool,
}

/// Configuration errors. All of them prevent serving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable was absent or empty.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable          | Required | Description                             |
    /// |-------------------|----------|-----------------------------------------|
    /// | `PORTAL_BASE_URL` | yes      | Portal base address                     |
    /// | `SERVER_BASE_URL` | yes      | Server base address                     |
    /// | `CLIENT_ID`       | yes      | OAuth2 client id                        |
    /// | `CLIENT_SECRET`   | yes      | OAuth2 client secret                    |
    /// | `FRONTEND_URL`    | yes      | UI origin; redirect URI is derived      |
    /// | `PORT`            | no       | Listen port (default 3000)              |
    /// | `INSECURE_TLS`    | no       | `1`/`true` accepts invalid upstream TLS |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            vars(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let frontend_url = required("FRONTEND_URL")?;
        let listen_port = vars("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(3000);
        let accept_invalid_certs = vars("INSECURE_TLS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            portal_base_url: required("PORTAL_BASE_URL")?,
            server_base_url: required("SERVER_BASE_URL")?,
            client_id: required("CLIENT_ID")?,
            client_secret: required("CLIENT_SECRET")?,
            redirect_uri: format!("{frontend_url}/oauthCallback"),
            listen_port,
            accept_invalid_certs,
        })
    }
}
