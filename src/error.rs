use thiserror::Error;

/// Bitget status code that marks a successful response envelope.
pub const SUCCESS_CODE: &str = "00000";

/// Bitget status code returned when `ACCESS-TIMESTAMP` is outside the accepted window.
pub const STALE_TIMESTAMP_CODE: &str = "40008";

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures raised by the exchange client below the workflow layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// Network or connection failure, not attributable to the exchange.
    #[error("transport error{}: {message}", fmt_status(*status))]
    Transport {
        message: String,
        status: Option<u16>,
    },

    /// The response was not a keyed JSON document.
    #[error("unexpected response from exchange: {0}")]
    Protocol(String),

    /// The exchange answered with a non-success status code.
    #[error("Bitget API error {code}: {message}")]
    Api { code: String, message: String },

    /// Proxy configured but unreachable or reporting an unexpected egress IP.
    #[error("proxy check failed: {0}")]
    Proxy(String),

    /// No complete API key was supplied.
    #[error("Bitget credentials are not configured")]
    Unconfigured,
}

fn fmt_status(status: Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl ExchangeError {
    /// True when the exchange rejected the request timestamp.
    #[must_use]
    pub fn is_stale_timestamp(&self) -> bool {
        matches!(self, Self::Api { code, .. } if code == STALE_TIMESTAMP_CODE)
    }

    /// Exchange error code, if the exchange produced one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ExchangeError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A command could not complete; the message is shown to the operator.
    #[error("{0}")]
    Command(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_timestamp_is_detected_by_code() {
        let err = ExchangeError::Api {
            code: "40008".into(),
            message: "Request timestamp expired".into(),
        };
        assert!(err.is_stale_timestamp());
        assert_eq!(err.code(), Some("40008"));

        let other = ExchangeError::Api {
            code: "40014".into(),
            message: "Incorrect permissions".into(),
        };
        assert!(!other.is_stale_timestamp());
    }

    #[test]
    fn transport_error_mentions_http_status_when_known() {
        let err = ExchangeError::Transport {
            message: "bad gateway".into(),
            status: Some(502),
        };
        assert_eq!(err.to_string(), "transport error (HTTP 502): bad gateway");

        let err = ExchangeError::Transport {
            message: "connection refused".into(),
            status: None,
        };
        assert_eq!(err.to_string(), "transport error: connection refused");
    }

    #[test]
    fn api_error_display_includes_code_and_message() {
        let err = ExchangeError::Api {
            code: "47003".into(),
            message: "Withdraw address is not in addressBook".into(),
        };
        assert_eq!(
            err.to_string(),
            "Bitget API error 47003: Withdraw address is not in addressBook"
        );
    }
}
