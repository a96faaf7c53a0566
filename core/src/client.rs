//! The request dispatcher.
//!
//! # Design
//! `Dispatcher` holds only an `ApiConfig` and a `Transport` and carries no
//! mutable state between calls. A dispatch is split into `build_request`,
//! which turns an `ApiRequest` into an `HttpRequest`, and `parse_response`,
//! which turns an `HttpResponse` into the caller's type. Both halves are
//! pure; `send` runs them around a single awaited transport call.

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded;

use crate::config::ApiConfig;
use crate::error::{ApiError, ConfigError, HttpFailure};
use crate::http::{merge_headers, HttpRequest, HttpResponse};
use crate::request::ApiRequest;
use crate::transport::{ReqwestTransport, Transport};

/// Sends `ApiRequest`s to the backend and decodes the JSON answers.
#[derive(Debug, Clone)]
pub struct Dispatcher<T = ReqwestTransport> {
    config: ApiConfig,
    transport: T,
}

impl Dispatcher<ReqwestTransport> {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }

    /// Resolve the base URL from the environment and use a default reqwest
    /// client.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(ApiConfig::from_env()?))
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the wire request: full URL with an optional query string, the
    /// default headers merged with the caller's, and a JSON body only when
    /// the payload is non-empty.
    pub fn build_request(&self, request: &ApiRequest) -> HttpRequest {
        let mut url = self.config.endpoint(request.path());
        if !request.query_params().is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(request.query_params())
                .finish();
            url.push('?');
            url.push_str(&query);
        }

        HttpRequest {
            method: request.method().to_string(),
            url,
            headers: merge_headers(request.extra_headers()),
            body: request.body().map(Value::to_string),
        }
    }

    /// Decode a 2xx body into `R`, or a non-2xx body into `E` wrapped in
    /// `ApiError::Status`.
    ///
    /// The error body is decoded before anything else, so a non-JSON error
    /// body surfaces as `ApiError::Decode` instead of `ApiError::Status`.
    pub fn parse_response<R, E>(
        &self,
        request: &HttpRequest,
        response: HttpResponse,
    ) -> Result<R, ApiError<E>>
    where
        R: DeserializeOwned,
        E: DeserializeOwned,
    {
        if response.is_success() {
            return serde_json::from_str(&response.body).map_err(|e| {
                tracing::warn!(status = response.status, url = %request.url, error = %e, "undecodable response body");
                ApiError::Decode(e)
            });
        }

        tracing::warn!(
            status = response.status,
            method = %request.method,
            url = %request.url,
            "request failed"
        );
        let error: E = serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!(status = response.status, url = %request.url, error = %e, "undecodable error body");
            ApiError::Decode(e)
        })?;

        Err(ApiError::Status(Box::new(HttpFailure {
            status: response.status,
            status_text: response.status_text,
            method: request.method.clone(),
            url: request.url.clone(),
            request_body: request.body.clone(),
            error,
            raw_error: response.body,
        })))
    }

    /// Dispatch `request` and decode the answer.
    ///
    /// Transport failures are returned unchanged as `ApiError::Transport`.
    pub async fn send<R, E>(&self, request: ApiRequest) -> Result<R, ApiError<E>>
    where
        R: DeserializeOwned,
        E: DeserializeOwned,
    {
        let http_request = self.build_request(&request);
        tracing::debug!(
            method = %http_request.method,
            url = %http_request.url,
            has_body = http_request.body.is_some(),
            "dispatching request"
        );

        let response = self.transport.execute(http_request.clone()).await?;
        tracing::debug!(status = response.status, url = %http_request.url, "response received");

        self.parse_response(&http_request, response)
    }

    /// `send` with untyped JSON on both the success and the error path.
    pub async fn send_json(&self, request: ApiRequest) -> Result<Value, ApiError> {
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(ApiConfig::new("http://localhost:3000"))
    }

    fn request_for(request: ApiRequest) -> HttpRequest {
        dispatcher().build_request(&request)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct ErrorBody {
        error: String,
    }

    #[test]
    fn build_get_without_extras() {
        let req = request_for(ApiRequest::get("/users/1"));
        assert_eq!(req.method, "GET");
        assert_eq!(req.url, "http://localhost:3000/api/users/1");
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn build_appends_encoded_query() {
        let req = request_for(
            ApiRequest::get("/search")
                .query("q", "rust & serde")
                .query("page", 2),
        );
        assert_eq!(
            req.url,
            "http://localhost:3000/api/search?q=rust+%26+serde&page=2"
        );
    }

    #[test]
    fn build_post_serializes_payload() {
        let req = request_for(ApiRequest::post("/items").payload(json!({ "name": "x" })));
        assert_eq!(req.url, "http://localhost:3000/api/items");
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"x"}"#));
    }

    #[test]
    fn build_keeps_unknown_method_verbatim() {
        let req = request_for(ApiRequest::new("PURGE", "/cache"));
        assert_eq!(req.method, "PURGE");
    }

    #[test]
    fn build_merges_extra_headers() {
        let req = request_for(
            ApiRequest::get("/users/1")
                .header("Content-Type", "application/vnd.api+json")
                .header("X-Request-Id", "42"),
        );
        assert_eq!(req.header("content-type"), Some("application/vnd.api+json"));
        assert_eq!(req.header("x-request-id"), Some("42"));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn parse_success_decodes_body() {
        let c = dispatcher();
        let req = c.build_request(&ApiRequest::get("/users/1"));
        let user: User = c
            .parse_response::<User, ErrorBody>(&req, HttpResponse::new(200, "OK", r#"{"id":1}"#))
            .unwrap();
        assert_eq!(user, User { id: 1 });
    }

    #[test]
    fn parse_success_with_bad_json_is_decode_error() {
        let c = dispatcher();
        let req = c.build_request(&ApiRequest::get("/users/1"));
        let err = c
            .parse_response::<User, ErrorBody>(&req, HttpResponse::new(200, "OK", "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_failure_carries_request_and_decoded_error() {
        let c = dispatcher();
        let req = c.build_request(&ApiRequest::post("/items").payload(json!({ "name": "" })));
        let err = c
            .parse_response::<User, ErrorBody>(
                &req,
                HttpResponse::new(422, "Unprocessable Entity", r#"{"error":"name is empty"}"#),
            )
            .unwrap_err();

        let failure = err.failure().unwrap();
        assert_eq!(failure.status, 422);
        assert_eq!(failure.method, "POST");
        assert_eq!(failure.url, "http://localhost:3000/api/items");
        assert_eq!(failure.request_body.as_deref(), Some(r#"{"name":""}"#));
        assert_eq!(
            failure.error,
            ErrorBody {
                error: "name is empty".to_string()
            }
        );
    }

    #[test]
    fn parse_failure_with_non_json_body_is_decode_error() {
        let c = dispatcher();
        let req = c.build_request(&ApiRequest::get("/broken"));
        let err = c
            .parse_response::<User, ErrorBody>(
                &req,
                HttpResponse::new(500, "Internal Server Error", "upstream exploded"),
            )
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_failure_with_empty_body_is_decode_error() {
        let c = dispatcher();
        let req = c.build_request(&ApiRequest::delete("/items/1"));
        let err = c
            .parse_response::<Value, Value>(&req, HttpResponse::new(404, "Not Found", ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
