//! Shared helpers for the integration tests: an [`AppState`] pointed at a
//! wiremock deployment, plus credential builders.

use std::sync::Arc;

use chrono::{Duration, Utc};

use topolens_models::Credential;
use topolens_server::{AppConfig, AppState};

/// Configuration pointing every base address at the mock upstream.
pub fn test_config(upstream: &str) -> AppConfig {
    AppConfig {
        portal_base_url: format!("{upstream}/arcgis"),
        server_base_url: format!("{upstream}/arcgis"),
        client_id: "topolens".into(),
        client_secret: "s3cret".into(),
        redirect_uri: "https://ui.example.com/oauthCallback".into(),
        listen_port: 0,
        accept_invalid_certs: false,
    }
}

/// Shared state with resolved URLs installed directly (no bootstrap calls).
pub async fn test_state(upstream: &str) -> Arc<AppState> {
    let state = AppState::new(test_config(upstream)).unwrap();
    state
        .enterprise
        .override_urls(&format!("{upstream}/portal"), &format!("{upstream}/server"))
        .await;
    state
}

/// A credential whose access token expires in `minutes` from now.
pub fn credential_expiring_in(minutes: i64) -> Credential {
    let now = Utc::now();
    Credential::new(
        "tok-0".into(),
        "ref-0".into(),
        now,
        now + Duration::minutes(minutes),
        now + Duration::days(14),
        "admin".into(),
    )
    .unwrap()
}
