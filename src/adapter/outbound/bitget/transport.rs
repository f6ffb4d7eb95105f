//! Signed HTTP transport for the Bitget v2 REST API.
//!
//! Every private call goes through [`Transport::execute`], which:
//! - syncs the clock offset before the first request,
//! - signs the exact path and body that will be sent,
//! - maps the JSON envelope onto [`ExchangeError`],
//! - resyncs and retries exactly once when the exchange reports `40008`.

use reqwest::{Client as HttpClient, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::credentials::Credentials;
use super::dto::fields::{scalar_string, Document};
use super::signing::{local_now_ms, ClockOffset, Method, Params, SignedRequest};
use crate::error::{ExchangeError, SUCCESS_CODE};

/// Public server time endpoint, also used to check entrypoints.
pub const TIME_PATH: &str = "/api/v2/public/time";

/// Longest response body echoed into an error message.
const MAX_ERROR_BODY: usize = 256;

pub struct Transport {
    http: HttpClient,
    base_url: String,
    credentials: Credentials,
    clock: ClockOffset,
}

impl Transport {
    #[must_use]
    pub fn new(http: HttpClient, base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            clock: ClockOffset::new(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn clock(&self) -> &ClockOffset {
        &self.clock
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Fetch the exchange time and record the offset against the local clock.
    pub async fn sync_time(&self) -> Result<i64, ExchangeError> {
        let url = format!("{}{TIME_PATH}", self.base_url);
        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        let local_ms = local_now_ms();

        let body: Value = serde_json::from_str(&text).map_err(|_| ExchangeError::Transport {
            message: truncate(&text),
            status: Some(status.as_u16()),
        })?;
        let server_ms = server_time_ms(&body).ok_or_else(|| {
            ExchangeError::Protocol(format!("no server time in {TIME_PATH} response"))
        })?;

        let offset = self.clock.record(server_ms, local_ms);
        debug!(server_ms, offset_ms = offset, "Synced Bitget clock");
        Ok(offset)
    }

    /// Sync the clock, logging instead of failing.
    ///
    /// The request that follows runs on the previous offset when this fails.
    async fn try_sync_time(&self) {
        if let Err(err) = self.sync_time().await {
            warn!(error = %err, "Failed to sync Bitget clock");
        }
    }

    pub async fn get(&self, path: &str, params: &Params) -> Result<Document, ExchangeError> {
        self.execute(Method::Get, path, params).await
    }

    pub async fn post(&self, path: &str, params: &Params) -> Result<Document, ExchangeError> {
        self.execute(Method::Post, path, params).await
    }

    /// Send a signed request and return the decoded response envelope.
    ///
    /// A response without a `code` field is returned as-is.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &Params,
    ) -> Result<Document, ExchangeError> {
        if !self.clock.is_synced() {
            self.try_sync_time().await;
        }

        let secret = self.credentials.secret_key();
        let request = SignedRequest::new(secret, method, path, params, self.clock.now_ms());

        match self.send(&request).await {
            Err(err) if err.is_stale_timestamp() => {
                warn!(
                    method = method.as_str(),
                    path = %request.path,
                    "Bitget rejected timestamp, resyncing clock and retrying once"
                );
                self.try_sync_time().await;
                let retry = request.resigned(secret, self.clock.now_ms());
                self.send(&retry).await
            }
            other => other,
        }
    }

    async fn send(&self, request: &SignedRequest) -> Result<Document, ExchangeError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = request.method.as_str(), url = %url, "Bitget request");

        let builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url).body(request.body.clone()),
        };
        let response = builder
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("locale", "en-US")
            .header("ACCESS-KEY", self.credentials.api_key())
            .header("ACCESS-SIGN", &request.signature)
            .header("ACCESS-TIMESTAMP", &request.timestamp)
            .header("ACCESS-PASSPHRASE", self.credentials.passphrase())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        decode_envelope(status, &text)
    }
}

/// Map an HTTP response onto the exchange envelope contract.
///
/// Bitget sends JSON error bodies with 4xx statuses, so the body is decoded
/// before the status is considered.
pub(crate) fn decode_envelope(status: StatusCode, text: &str) -> Result<Document, ExchangeError> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(_) if !status.is_success() => {
            return Err(ExchangeError::Transport {
                message: truncate(text),
                status: Some(status.as_u16()),
            })
        }
        Err(err) => {
            return Err(ExchangeError::Protocol(format!(
                "response is not JSON: {err}"
            )))
        }
    };

    let Value::Object(envelope) = value else {
        return Err(ExchangeError::Protocol(format!(
            "expected a JSON object, got {}",
            truncate(text)
        )));
    };

    let Some(code) = envelope.get("code").and_then(scalar_string) else {
        return Ok(envelope);
    };
    if code == SUCCESS_CODE {
        return Ok(envelope);
    }

    let message = envelope
        .get("msg")
        .or_else(|| envelope.get("message"))
        .and_then(scalar_string)
        .unwrap_or_default();
    Err(ExchangeError::Api { code, message })
}

/// `data` of a response envelope.
#[must_use]
pub fn envelope_data(envelope: &Document) -> Option<&Value> {
    envelope.get("data").filter(|data| !data.is_null())
}

/// Server time from `data.serverTime`, a scalar `data`, or `requestTime`.
fn server_time_ms(body: &Value) -> Option<i64> {
    let as_ms = |value: &Value| scalar_string(value).and_then(|s| s.trim().parse::<i64>().ok());
    match body.get("data") {
        Some(Value::Object(data)) => data.get("serverTime").and_then(as_ms),
        Some(data) if !data.is_null() => as_ms(data),
        _ => None,
    }
    .or_else(|| body.get("requestTime").and_then(as_ms))
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_is_returned() {
        let doc = decode_envelope(StatusCode::OK, r#"{"code":"00000","data":[1]}"#).expect("ok");
        assert_eq!(envelope_data(&doc), Some(&json!([1])));
    }

    #[test]
    fn envelope_without_code_is_returned_as_is() {
        let doc = decode_envelope(StatusCode::OK, r#"{"serverTime":"1"}"#).expect("ok");
        assert!(doc.contains_key("serverTime"));
        assert_eq!(envelope_data(&doc), None);
    }

    #[test]
    fn api_error_carries_code_and_message_even_on_http_400() {
        let err = decode_envelope(
            StatusCode::BAD_REQUEST,
            r#"{"code":"40008","msg":"Request timestamp expired","data":null}"#,
        )
        .expect_err("api error");
        assert!(err.is_stale_timestamp());
        assert_eq!(
            err,
            ExchangeError::Api {
                code: "40008".into(),
                message: "Request timestamp expired".into()
            }
        );
    }

    #[test]
    fn numeric_code_is_compared_as_string() {
        let err = decode_envelope(StatusCode::OK, r#"{"code":40014,"msg":"no"}"#).expect_err("err");
        assert_eq!(err.code(), Some("40014"));
    }

    #[test]
    fn non_object_json_is_a_protocol_error() {
        let err = decode_envelope(StatusCode::OK, "[1,2]").expect_err("err");
        assert!(matches!(err, ExchangeError::Protocol(_)));
    }

    #[test]
    fn non_json_error_page_is_a_transport_error_with_status() {
        let err = decode_envelope(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
            .expect_err("err");
        assert_eq!(
            err,
            ExchangeError::Transport {
                message: "<html>bad gateway</html>".into(),
                status: Some(502)
            }
        );
    }

    #[test]
    fn non_json_success_is_a_protocol_error() {
        let err = decode_envelope(StatusCode::OK, "ok").expect_err("err");
        assert!(matches!(err, ExchangeError::Protocol(_)));
    }

    #[test]
    fn server_time_shapes() {
        assert_eq!(
            server_time_ms(&json!({"code": "00000", "data": {"serverTime": "1700000000000"}})),
            Some(1_700_000_000_000)
        );
        assert_eq!(server_time_ms(&json!({"data": 1_700_000_000_001_i64})), Some(1_700_000_000_001));
        assert_eq!(server_time_ms(&json!({"data": null, "requestTime": 42})), Some(42));
        assert_eq!(server_time_ms(&json!({"data": {}})), None);
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate("short"), "short");
        let long = "x".repeat(MAX_ERROR_BODY + 10);
        assert_eq!(truncate(&long).len(), MAX_ERROR_BODY + 3);
    }
}
