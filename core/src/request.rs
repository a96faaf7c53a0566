//! Request descriptors.
//!
//! An `ApiRequest` is what a caller hands to `Dispatcher::send`: a method, a
//! path below the API prefix, and optional query parameters, JSON payload
//! and extra headers. Anything left empty is omitted from the wire request.

use std::fmt::Display;

use serde::Serialize;
use serde_json::Value;

/// One API call, before it is turned into an `HttpRequest`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: String,
    path: String,
    query: Vec<(String, String)>,
    payload: Value,
    headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// `method` is not validated here; `path` should start with `/` and
    /// carry no query string.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            query: Vec::new(),
            payload: Value::Null,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new("POST", path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new("PUT", path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new("PATCH", path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new("DELETE", path)
    }

    /// Add a query parameter. Scalars render through `Display`, so
    /// `true` becomes `"true"` and `2` becomes `"2"`.
    pub fn query(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Display,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.to_string())));
        self
    }

    /// Set the JSON payload. `null`, `{}` and `[]` mean "no body".
    pub fn payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }

    /// Serialize `payload` and use it as the JSON payload.
    pub fn json<T: Serialize + ?Sized>(self, payload: &T) -> serde_json::Result<Self> {
        let value = serde_json::to_value(payload)?;
        Ok(self.payload(value))
    }

    /// Add a header that is layered over the defaults.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(name, value)| (name.into(), value.into())));
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn extra_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// The payload, or `None` when it is empty and no body should be sent.
    pub fn body(&self) -> Option<&Value> {
        match &self.payload {
            Value::Null => None,
            Value::Object(map) if map.is_empty() => None,
            Value::Array(items) if items.is_empty() => None,
            payload => Some(payload),
        }
    }
}
