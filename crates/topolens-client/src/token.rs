//! OAuth2 token endpoint client.
//!
//! Talks to the portal's `sharing/rest/oauth2/token` endpoint
//! (form-encoded) for the two grant types the backend uses: the one-time
//! authorization-code exchange and refresh-token renewal.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::http::send_json;

/// Client for the portal's OAuth2 token endpoint.
#[derive(Debug, Clone)]
pub struct TokenClient {
    http: reqwest::Client,
    portal_url: String,
    client_id: String,
    client_secret: String,
}

/// A successful token-endpoint response.
///
/// The endpoint returns either `access_token` or the legacy `token` key;
/// `refresh_token` is only present when the endpoint rotates it.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// The new access token.
    #[serde(alias = "token")]
    pub access_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    /// Rotated refresh token, when the endpoint issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Refresh-token lifetime in seconds, when reported.
    #[serde(default)]
    pub refresh_token_expires_in: Option<i64>,
    /// Authenticated username, present on the code exchange.
    #[serde(default)]
    pub username: Option<String>,
}

impl TokenClient {
    /// Build a token client for the given portal public URL.
    pub fn new(
        http: reqwest::Client,
        portal_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            portal_url: portal_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/sharing/rest/oauth2/token", self.portal_url)
    }

    /// One-time exchange of an authorization code for an initial grant.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenGrant, ClientError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("f", "json"),
        ];
        let body = send_json(self.http.post(self.endpoint()).form(&form)).await?;
        parse_grant(body)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Rotation is optional: the response may omit `refresh_token`, in which
    /// case the caller keeps the prior one.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenGrant, ClientError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("f", "json"),
        ];
        let body = send_json(self.http.post(self.endpoint()).form(&form)).await?;
        parse_grant(body)
    }
}

fn parse_grant(body: Value) -> Result<TokenGrant, ClientError> {
    let grant: TokenGrant = serde_json::from_value(body)?;
    if grant.access_token.is_empty() {
        return Err(ClientError::Malformed(
            "token endpoint returned an empty access token".into(),
        ));
    }
    Ok(grant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(uri: &str) -> TokenClient {
        TokenClient::new(reqwest::Client::new(), uri, "client-id", "client-secret")
    }

    #[tokio::test]
    async fn code_exchange_sends_authorization_code_grant() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sharing/rest/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc"))
            .and(body_string_contains("redirect_uri="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "expires_in": 1799,
                "username": "admin",
                "refresh_token": "ref-1",
                "refresh_token_expires_in": 1209599,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let grant = client(&server.uri())
            .exchange_code("abc", "https://ui.example.com/oauthCallback")
            .await
            .unwrap();
        assert_eq!(grant.access_token, "tok-1");
        assert_eq!(grant.username.as_deref(), Some("admin"));
        assert_eq!(grant.refresh_token.as_deref(), Some("ref-1"));
    }

    #[tokio::test]
    async fn refresh_accepts_legacy_token_key_without_rotation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sharing/rest/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "tok-2",
                "expires_in": 1800,
            })))
            .mount(&server)
            .await;

        let grant = client(&server.uri()).refresh("ref-1").await.unwrap();
        assert_eq!(grant.access_token, "tok-2");
        assert!(grant.refresh_token.is_none());
    }

    #[tokio::test]
    async fn embedded_error_object_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sharing/rest/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "code": 400, "message": "Invalid refresh_token" }
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri()).refresh("dead").await.unwrap_err();
        match err {
            ClientError::Rejected { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("Invalid refresh_token"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_2xx_is_a_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sharing/rest/oauth2/token"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = client(&server.uri()).refresh("ref").await.unwrap_err();
        assert_eq!(err.upstream_status(), Some(502));
    }
}
