//! Error types for the request dispatcher.
//!
//! # Design
//! Three failure classes reach the caller of `Dispatcher::send`:
//! transport failures pass through untouched, non-2xx responses become an
//! `HttpFailure` carrying everything needed to debug the call, and body
//! decode failures surface as `Decode`. The error body is decoded before the
//! `HttpFailure` is assembled, so a non-JSON error body yields `Decode`
//! rather than `Status`.

use std::fmt;

use thiserror::Error;

/// Errors returned by `Dispatcher::send` and `Dispatcher::parse_response`.
///
/// `E` is the type the server's error body is decoded into.
#[derive(Debug, Error)]
pub enum ApiError<E = serde_json::Value> {
    /// The round-trip itself failed; no response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with a non-2xx status.
    #[error("{0}")]
    Status(Box<HttpFailure<E>>),

    /// A response body (success or error) was not valid JSON for the
    /// expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl<E> ApiError<E> {
    /// HTTP status of an application-level failure.
    pub fn status(&self) -> Option<u16> {
        self.failure().map(|failure| failure.status)
    }

    pub fn failure(&self) -> Option<&HttpFailure<E>> {
        match self {
            ApiError::Status(failure) => Some(&**failure),
            _ => None,
        }
    }
}

/// Everything known about a request that came back with a non-2xx status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpFailure<E> {
    pub status: u16,
    pub status_text: String,
    pub method: String,
    pub url: String,
    /// The JSON body that was sent, if any.
    pub request_body: Option<String>,
    /// The decoded error body.
    pub error: E,
    /// The error body exactly as received.
    pub raw_error: String,
}

impl<E> fmt::Display for HttpFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "request failed")?;
        writeln!(f, "  status: {} {}", self.status, self.status_text)?;
        writeln!(f, "  method: {}", self.method)?;
        writeln!(f, "  url: {}", self.url)?;
        writeln!(f, "  body: {}", self.request_body.as_deref().unwrap_or("<none>"))?;
        write!(f, "  error: {}", self.raw_error.trim())
    }
}

/// Failures raised while performing the network round-trip.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid HTTP method `{0}`")]
    InvalidMethod(String),

    #[error("invalid header `{name}`: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Connection-level failure reported by a transport that does not use
    /// reqwest.
    #[error("connection failed: {0}")]
    Connection(String),
}

/// Errors raised while resolving `ApiConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no base URL configured for {0}; set API_BASE_URL")]
    MissingBaseUrl(crate::config::Environment),

    #[error("invalid base URL `{url}`: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unknown environment `{0}`; expected `development` or `production`")]
    InvalidEnvironment(String),
}
