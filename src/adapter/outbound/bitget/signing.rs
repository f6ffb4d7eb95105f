//! Request signing and server clock alignment.
//!
//! Bitget signs `timestamp + METHOD + requestPath + body` with HMAC-SHA256
//! and expects the digest base64-encoded in `ACCESS-SIGN`. `requestPath`
//! includes the query string; `body` is the exact bytes sent (empty for GET).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use parking_lot::Mutex;
use sha2::Sha256;
use url::form_urlencoded;

type HmacSha256 = Hmac<Sha256>;

/// HTTP methods used by the signed API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Base64 HMAC-SHA256 signature of one request.
#[must_use]
pub fn sign(secret_key: &str, timestamp: &str, method: Method, path: &str, body: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(method.as_str().as_bytes());
    mac.update(path.as_bytes());
    mac.update(body.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Ordered request parameters.
///
/// Encoded into the query string for GET and into a compact JSON object for
/// POST. Values are always strings, so amounts never lose precision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(&'static str, String)>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    /// Add `key` only when `value` is present.
    #[must_use]
    pub fn with_opt<T: ToString>(self, key: &'static str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `application/x-www-form-urlencoded` query string, in insertion order.
    #[must_use]
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }

    /// Compact JSON object.
    #[must_use]
    pub fn json_body(&self) -> String {
        let map: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map).to_string()
    }
}

/// A request ready to send: path with query, body, timestamp and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: Method,
    pub path: String,
    pub body: String,
    pub timestamp: String,
    pub signature: String,
}

impl SignedRequest {
    /// Canonicalize `params` for `method` and sign at `timestamp_ms`.
    #[must_use]
    pub fn new(
        secret_key: &str,
        method: Method,
        path: &str,
        params: &Params,
        timestamp_ms: i64,
    ) -> Self {
        let (path, body) = match method {
            Method::Get if !params.is_empty() => {
                (format!("{path}?{}", params.query_string()), String::new())
            }
            Method::Get => (path.to_string(), String::new()),
            Method::Post if !params.is_empty() => (path.to_string(), params.json_body()),
            Method::Post => (path.to_string(), String::new()),
        };
        let timestamp = timestamp_ms.to_string();
        let signature = sign(secret_key, &timestamp, method, &path, &body);
        Self {
            method,
            path,
            body,
            timestamp,
            signature,
        }
    }

    /// Re-sign the same path and body at a new timestamp.
    #[must_use]
    pub fn resigned(&self, secret_key: &str, timestamp_ms: i64) -> Self {
        let timestamp = timestamp_ms.to_string();
        let signature = sign(secret_key, &timestamp, self.method, &self.path, &self.body);
        Self {
            timestamp,
            signature,
            ..self.clone()
        }
    }
}

/// Local wall clock in milliseconds.
#[must_use]
pub fn local_now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Offset between the exchange clock and the local clock.
///
/// Unset until the first successful sync; scoped to one client.
#[derive(Debug, Default)]
pub struct ClockOffset {
    offset_ms: Mutex<Option<i64>>,
}

impl ClockOffset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_synced(&self) -> bool {
        self.offset_ms.lock().is_some()
    }

    /// Record `server_ms - local_ms` and return it.
    pub fn record(&self, server_ms: i64, local_ms: i64) -> i64 {
        let offset = server_ms - local_ms;
        *self.offset_ms.lock() = Some(offset);
        offset
    }

    #[must_use]
    pub fn offset_ms(&self) -> i64 {
        self.offset_ms.lock().unwrap_or_default()
    }

    /// Local time corrected to the exchange clock.
    #[must_use]
    pub fn corrected(&self, local_ms: i64) -> i64 {
        local_ms + self.offset_ms()
    }

    #[must_use]
    pub fn now_ms(&self) -> i64 {
        self.corrected(local_now_ms())
    }
}
