//! Portal admin API client.
//!
//! Covers the portal endpoints the backend consumes: the public-URL
//! bootstrap (`sharing/rest/info/portal`), `portaladmin` info, health check,
//! web-adaptor registrations, federation listing/validation, and log query.

use serde::Deserialize;
use serde_json::Value;

use topolens_models::LogRecord;

use crate::error::ClientError;
use crate::http::{required_str, send_json};

/// Client for one portal instance's admin API.
#[derive(Debug, Clone)]
pub struct PortalAdminClient {
    http: reqwest::Client,
    url: String,
}

/// Version/build block returned by `portaladmin/info` and `admin/info`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentVersion {
    /// Product version (`currentversion`).
    #[serde(rename = "currentversion")]
    pub version: Option<String>,
    /// Build number (`currentbuild`).
    #[serde(rename = "currentbuild")]
    pub build: Option<String>,
}

/// One entry of a `system/webadaptors` listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAdaptorEntry {
    /// Machine the adaptor runs on.
    pub machine_name: String,
    /// Machine IP address.
    #[serde(rename = "machineIP")]
    pub machine_ip: String,
    /// Externally-reachable URL registered for the adaptor.
    #[serde(rename = "webAdaptorURL")]
    pub web_adaptor_url: String,
    /// Stable adaptor id.
    pub id: String,
    /// HTTP port.
    #[serde(default)]
    pub http_port: u16,
    /// HTTPS port.
    #[serde(default)]
    pub https_port: u16,
}

/// One server federated to the portal.
#[derive(Debug, Clone, Deserialize)]
pub struct FederatedServer {
    /// Federation id used by the validate endpoint.
    pub id: String,
    /// The federated server's services URL, when reported.
    #[serde(default)]
    pub url: Option<String>,
}

/// Result of a federation-validate call (2xx body).
#[derive(Debug, Clone, Deserialize)]
pub struct FederationValidation {
    /// `"success"` or `"failure"`.
    #[serde(default)]
    pub status: String,
    /// Diagnostics accompanying a failure.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl FederationValidation {
    /// True when the portal reported the federation as healthy.
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Resolve the portal's public URL from its pre-configured base address.
///
/// `sharing/rest/info/portal` is the bootstrap call of the whole pipeline:
/// the portal base address is the identity anchor and is assumed reachable.
pub async fn owning_system_url(
    http: &reqwest::Client,
    portal_base_url: &str,
) -> Result<String, ClientError> {
    let url = format!("{portal_base_url}/sharing/rest/info/portal");
    let body = send_json(http.get(url).query(&[("f", "json")])).await?;
    required_str(&body, "owningSystemUrl")
}

impl PortalAdminClient {
    /// Build a client for the portal reachable at `url`
    /// (e.g. `https://gis.example.com/portal`).
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// `portaladmin/info` — version and build.
    pub async fn info(&self, token: &str) -> Result<ComponentVersion, ClientError> {
        let url = format!("{}/portaladmin/info", self.url);
        let body = send_json(self.http.get(url).query(&[("f", "json"), ("token", token)])).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `portaladmin/healthCheck` — raw health payload, forwarded verbatim.
    pub async fn health_check(&self) -> Result<Value, ClientError> {
        let url = format!("{}/portaladmin/healthCheck", self.url);
        send_json(self.http.get(url).query(&[("f", "json")])).await
    }

    /// `portaladmin/system/webadaptors` — registered portal web adaptors.
    pub async fn web_adaptors(&self, token: &str) -> Result<Vec<WebAdaptorEntry>, ClientError> {
        let url = format!("{}/portaladmin/system/webadaptors", self.url);
        let body = send_json(self.http.get(url).query(&[("f", "json"), ("token", token)])).await?;
        let adaptors = body
            .get("webAdaptors")
            .cloned()
            .ok_or_else(|| ClientError::Malformed("missing `webAdaptors` in response".into()))?;
        Ok(serde_json::from_value(adaptors)?)
    }

    /// `portaladmin/federation/servers` — servers federated to this portal.
    pub async fn federation_servers(&self, token: &str) -> Result<Vec<FederatedServer>, ClientError> {
        let url = format!("{}/portaladmin/federation/servers", self.url);
        let body = send_json(self.http.get(url).query(&[("f", "json"), ("token", token)])).await?;
        let servers = body
            .get("servers")
            .cloned()
            .ok_or_else(|| ClientError::Malformed("missing `servers` in response".into()))?;
        Ok(serde_json::from_value(servers)?)
    }

    /// `portaladmin/federation/servers/{id}/validate` — probe one federation.
    pub async fn validate_federation(
        &self,
        federation_id: &str,
        token: &str,
    ) -> Result<FederationValidation, ClientError> {
        let url = format!(
            "{}/portaladmin/federation/servers/{federation_id}/validate",
            self.url
        );
        let body = send_json(self.http.get(url).query(&[("f", "json"), ("token", token)])).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `portaladmin/logs/query` — up to 1000 recent log messages.
    pub async fn query_logs(
        &self,
        token: &str,
        level: Option<&str>,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<Vec<LogRecord>, ClientError> {
        let url = format!("{}/portaladmin/logs/query", self.url);
        let form = [
            ("level", level.unwrap_or("")),
            ("startTime", start_time.unwrap_or("")),
            ("endTime", end_time.unwrap_or("")),
            ("filterType", "json"),
            ("filter", r#"{"codes":[],"users":[],"source":"*"}"#),
            ("pageSize", "1000"),
            ("federatedServers", "[]"),
            ("token", token),
            ("f", "json"),
        ];
        let body = send_json(self.http.post(url).form(&form)).await?;
        parse_log_messages(body)
    }
}

/// Pull `logMessages` out of a logs-query response; an absent array is an
/// empty result, not an error.
pub(crate) fn parse_log_messages(body: Value) -> Result<Vec<LogRecord>, ClientError> {
    match body.get("logMessages") {
        Some(messages) => Ok(serde_json::from_value(messages.clone())?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(uri: &str) -> PortalAdminClient {
        PortalAdminClient::new(reqwest::Client::new(), format!("{uri}/portal"))
    }

    #[tokio::test]
    async fn owning_system_url_is_resolved_from_base() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/arcgis/sharing/rest/info/portal"))
            .and(query_param("f", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "owningSystemUrl": "https://gis.example.com/portal"
            })))
            .mount(&server)
            .await;

        let http = reqwest::Client::new();
        let url = owning_system_url(&http, &format!("{}/arcgis", server.uri()))
            .await
            .unwrap();
        assert_eq!(url, "https://gis.example.com/portal");
    }

    #[tokio::test]
    async fn web_adaptors_are_parsed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/portaladmin/system/webadaptors"))
            .and(query_param("token", "tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "webAdaptors": [{
                    "machineName": "WA-1",
                    "machineIP": "10.0.0.8",
                    "webAdaptorURL": "https://gis.example.com/portal",
                    "id": "adaptor-1",
                    "httpPort": 80,
                    "httpsPort": 443,
                }]
            })))
            .mount(&server)
            .await;

        let adaptors = client(&server.uri()).web_adaptors("tok").await.unwrap();
        assert_eq!(adaptors.len(), 1);
        assert_eq!(adaptors[0].machine_name, "WA-1");
        assert_eq!(adaptors[0].https_port, 443);
    }

    #[tokio::test]
    async fn federation_failure_carries_messages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/portal/portaladmin/federation/servers/fed-1/validate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "failure",
                "messages": ["cert mismatch"],
            })))
            .mount(&server)
            .await;

        let validation = client(&server.uri())
            .validate_federation("fed-1", "tok")
            .await
            .unwrap();
        assert!(!validation.is_success());
        assert_eq!(validation.messages, vec!["cert mismatch"]);
    }

    #[tokio::test]
    async fn missing_log_messages_is_an_empty_page() {
        let records = parse_log_messages(json!({ "hasMore": false })).unwrap();
        assert!(records.is_empty());
    }
}
