//! Server admin API client.
//!
//! Covers the compute server's admin endpoints: info, health check,
//! web-adaptor registrations, the shared `data/findItems` probe behind the
//! six data-store sub-fetches, `data/validateDataItem`, and log query.

use serde::Deserialize;
use serde_json::Value;

use topolens_models::{LogRecord, StoreType};

use crate::error::ClientError;
use crate::http::send_json;
use crate::portal::{parse_log_messages, ComponentVersion, WebAdaptorEntry};

/// Client for one server instance's admin API.
#[derive(Debug, Clone)]
pub struct ServerAdminClient {
    http: reqwest::Client,
    url: String,
}

/// Response of `data/validateDataItem`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItemValidation {
    /// Overall status, when reported.
    #[serde(default)]
    pub status: Option<String>,
    /// Per-machine validation reports.
    #[serde(default)]
    pub machines: Vec<MachineReport>,
}

/// Validation report for one machine hosting the data item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineReport {
    /// Machine name.
    #[serde(default)]
    pub machine: String,
    /// Per-data-item diagnostics on this machine.
    #[serde(default)]
    pub data_items: Vec<DataItemReport>,
}

/// One data item's validation result on one machine.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItemReport {
    /// `"success"` or `"error"`, when reported.
    #[serde(default)]
    pub status: Option<String>,
    /// Diagnostics accompanying an error.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl DataItemValidation {
    /// The first machine reporting an error condition, with its diagnostics.
    pub fn first_error(&self) -> Option<(&str, Vec<String>)> {
        for machine in &self.machines {
            for item in &machine.data_items {
                if item.status.as_deref() == Some("error") {
                    return Some((machine.machine.as_str(), item.messages.clone()));
                }
            }
        }
        None
    }
}

/// Guess the server's public URL from its configured base address.
///
/// `https://{host}[:port]/arcgis` becomes `https://{host}/server`. This is a
/// documented heuristic, not an authoritative derivation: the web-adaptor
/// fetch later overwrites the result with the registered URL.
pub fn guess_public_url(server_base_url: &str) -> Option<String> {
    let url = reqwest::Url::parse(server_base_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    let path = url.path().trim_end_matches('/');
    if !path.eq_ignore_ascii_case("/arcgis") {
        return None;
    }
    Some(format!("https://{host}/server"))
}

/// `findItems` query parameters for one store kind.
fn store_query(store: StoreType) -> (&'static str, Option<&'static str>) {
    match store {
        StoreType::FileShare => ("/fileShares", Some("folder")),
        StoreType::BigDataFileShare => ("/bigDataFileShares", Some("bigDataFileShare")),
        StoreType::CloudStore => ("/cloudStores", Some("cloudStore")),
        StoreType::NoSqlDatabase => ("/nosqlDatabases", None),
        StoreType::RasterStore => ("/rasterStores", Some("rasterStore")),
        StoreType::ObjectStore => ("/objectStores", Some("objectStore")),
    }
}

impl ServerAdminClient {
    /// Build a client for the server reachable at `url`
    /// (e.g. `https://gis.example.com/server`).
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// `admin/info` — version and build.
    pub async fn info(&self, token: &str) -> Result<ComponentVersion, ClientError> {
        let url = format!("{}/admin/info", self.url);
        let body = send_json(self.http.get(url).query(&[("f", "json"), ("token", token)])).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `rest/info/healthCheck` — raw health payload, forwarded verbatim.
    pub async fn health_check(&self) -> Result<Value, ClientError> {
        let url = format!("{}/rest/info/healthCheck", self.url);
        send_json(self.http.get(url).query(&[("f", "json")])).await
    }

    /// `admin/system/webadaptors` — registered server web adaptors.
    pub async fn web_adaptors(&self, token: &str) -> Result<Vec<WebAdaptorEntry>, ClientError> {
        let url = format!("{}/admin/system/webadaptors", self.url);
        let body = send_json(self.http.get(url).query(&[("f", "json"), ("token", token)])).await?;
        let adaptors = body
            .get("webAdaptors")
            .cloned()
            .ok_or_else(|| ClientError::Malformed("missing `webAdaptors` in response".into()))?;
        Ok(serde_json::from_value(adaptors)?)
    }

    /// `admin/data/findItems` — registered items for one store kind.
    ///
    /// Returns the raw item payloads; the aggregator tags them with the
    /// [`StoreType`] that found them.
    pub async fn find_items(&self, token: &str, store: StoreType) -> Result<Vec<Value>, ClientError> {
        let (ancestor_path, types) = store_query(store);
        let url = format!("{}/admin/data/findItems", self.url);
        let mut form = vec![
            ("ancestorPath", ancestor_path),
            ("decrypt", "true"),
            ("token", token),
            ("f", "json"),
        ];
        if let Some(types) = types {
            form.push(("types", types));
        }
        let body = send_json(self.http.post(url).form(&form)).await?;
        let items = body
            .get("items")
            .cloned()
            .ok_or_else(|| ClientError::Malformed("missing `items` in response".into()))?;
        Ok(serde_json::from_value(items)?)
    }

    /// `admin/data/validateDataItem` — probe one registered item.
    pub async fn validate_data_item(
        &self,
        token: &str,
        item: &Value,
    ) -> Result<DataItemValidation, ClientError> {
        let url = format!("{}/admin/data/validateDataItem", self.url);
        let item_json = serde_json::to_string(item)?;
        let form = [
            ("item", item_json.as_str()),
            ("token", token),
            ("f", "json"),
        ];
        let body = send_json(self.http.post(url).form(&form)).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// `admin/logs/query` — up to 1000 recent log messages.
    pub async fn query_logs(
        &self,
        token: &str,
        level: Option<&str>,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<Vec<LogRecord>, ClientError> {
        let url = format!("{}/admin/logs/query", self.url);
        let query = [
            ("level", level.unwrap_or("")),
            ("startTime", start_time.unwrap_or("")),
            ("endTime", end_time.unwrap_or("")),
            ("filterType", "json"),
            ("filter", r#"{"server":"*","services":"*","machines":"*"}"#),
            ("pageSize", "1000"),
            ("token", token),
            ("f", "json"),
        ];
        let body = send_json(self.http.get(url).query(&query)).await?;
        parse_log_messages(body)
    }
}
