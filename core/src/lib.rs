//! JSON API request dispatcher.
//!
//! # Overview
//! Builds one HTTP request from a method, a path below `/api`, optional
//! query parameters, an optional JSON payload and extra headers; sends it
//! through a [`Transport`]; and decodes the JSON answer into the caller's
//! type, or into a descriptive [`ApiError`] for non-2xx statuses.
//!
//! # Design
//! - `Dispatcher` is stateless: it holds a resolved `ApiConfig` and a
//!   transport, nothing else. Concurrent calls share nothing.
//! - Building (`build_request`) and parsing (`parse_response`) are pure;
//!   only `send` performs I/O, through the `Transport` seam.
//! - Success and error bodies are both decoded, into the generic `R` and
//!   `E` types respectively.
//! - No retries, timeouts or cancellation; callers layer those around the
//!   returned future.
//!
//! ```no_run
//! use dispatch_core::{ApiConfig, ApiRequest, Dispatcher};
//! use serde_json::{json, Value};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = Dispatcher::new(ApiConfig::parse("http://127.0.0.1:3000")?);
//! let item: Value = dispatcher
//!     .send_json(ApiRequest::post("/items").payload(json!({ "name": "x" })))
//!     .await?;
//! # let _ = item;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod request;
pub mod transport;

pub use client::Dispatcher;
pub use config::{ApiConfig, Environment, API_PREFIX};
pub use error::{ApiError, ConfigError, HttpFailure, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use request::ApiRequest;
pub use transport::{ReqwestTransport, Transport};
