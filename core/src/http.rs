//! HTTP wire types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! dispatcher builds `HttpRequest` values and parses `HttpResponse` values;
//! a [`Transport`](crate::Transport) (or the caller) performs the actual
//! round-trip in between.
//!
//! Methods stay plain strings: they are forwarded verbatim and only the
//! transport decides whether a token is a valid HTTP method.

/// Header every request carries unless the caller overrides it.
pub const CONTENT_TYPE: &str = "Content-Type";

/// Media type of every payload this crate produces.
pub const APPLICATION_JSON: &str = "application/json";

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value; names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a transport after executing an `HttpRequest`, then handed to
/// [`Dispatcher::parse_response`](crate::Dispatcher::parse_response).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Build a response with no headers. Mostly useful for tests and for
    /// hosts that execute requests themselves.
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// Layer `extra` on top of the default `Content-Type: application/json`.
///
/// A caller header replaces an existing one with the same name (ignoring
/// ASCII case), keeping its position; new names are appended in order.
pub fn merge_headers(extra: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
    for (name, value) in extra {
        match merged
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => *slot = (name.clone(), value.clone()),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn no_extra_headers_yields_json_content_type() {
        assert_eq!(merge_headers(&[]), vec![pair("Content-Type", "application/json")]);
    }

    #[test]
    fn extra_header_overrides_default_regardless_of_case() {
        let merged = merge_headers(&[pair("content-type", "text/plain")]);
        assert_eq!(merged, vec![pair("content-type", "text/plain")]);
    }

    #[test]
    fn non_colliding_headers_are_appended_in_order() {
        let merged = merge_headers(&[pair("X-Trace", "abc"), pair("Accept", "application/json")]);
        assert_eq!(
            merged,
            vec![
                pair("Content-Type", "application/json"),
                pair("X-Trace", "abc"),
                pair("Accept", "application/json"),
            ]
        );
    }

    #[test]
    fn later_duplicate_wins() {
        let merged = merge_headers(&[pair("X-Trace", "one"), pair("x-trace", "two")]);
        assert_eq!(merged.len(), 2);
        assert_eq!(find_header(&merged, "X-TRACE"), Some("two"));
    }

    #[test]
    fn success_covers_2xx_only() {
        assert!(HttpResponse::new(200, "OK", "").is_success());
        assert!(HttpResponse::new(204, "No Content", "").is_success());
        assert!(!HttpResponse::new(199, "", "").is_success());
        assert!(!HttpResponse::new(301, "Moved Permanently", "").is_success());
        assert!(!HttpResponse::new(404, "Not Found", "").is_success());
    }
}
