//! Shared HTTP plumbing for the subsystem clients.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ClientError;

/// Bound on every outbound subsystem call. A timed-out call is reported as
/// [`ClientError::Unavailable`], never left pending.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Build the shared reqwest client.
///
/// `accept_invalid_certs` is meant for enterprise deployments running on
/// self-signed certificates; it must be opted into via configuration.
pub fn build_http_client(accept_invalid_certs: bool) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(ClientError::Unavailable)
}

/// Send a prepared request and decode the JSON body, normalising failures.
///
/// Admin endpoints report some failures as a 200 response carrying an
/// `error` object; those are surfaced as [`ClientError::Rejected`] with the
/// embedded code, same as a genuine non-2xx.
pub(crate) async fn send_json(req: reqwest::RequestBuilder) -> Result<Value, ClientError> {
    let res = req.send().await?;
    let status = res.status();
    if !status.is_success() {
        let message = res.text().await.unwrap_or_default();
        debug!(status = %status, "subsystem returned a non-success status");
        return Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    let body: Value = res
        .json()
        .await
        .map_err(|e| ClientError::Malformed(e.to_string()))?;

    if let Some(err) = body.get("error") {
        let status = err
            .get("code")
            .and_then(Value::as_u64)
            .and_then(|c| u16::try_from(c).ok())
            .unwrap_or(500);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("subsystem reported an error")
            .to_string();
        warn!(code = status, message = %message, "subsystem embedded an error in a 200 response");
        return Err(ClientError::Rejected { status, message });
    }

    Ok(body)
}

/// Pull a required string field out of a response body.
pub(crate) fn required_str(body: &Value, field: &str) -> Result<String, ClientError> {
    body.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ClientError::Malformed(format!("missing `{field}` in response")))
}
