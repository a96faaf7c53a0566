//! In-memory transport shared by the dispatch tests.

use std::sync::Mutex;

use async_trait::async_trait;
use dispatch_core::{HttpRequest, HttpResponse, Transport, TransportError};

/// Returns a canned response and records every request it is asked to
/// execute.
pub struct MockTransport {
    outcome: Outcome,
    seen: Mutex<Vec<HttpRequest>>,
}

enum Outcome {
    Respond(HttpResponse),
    Fail(String),
}

impl MockTransport {
    pub fn respond(status: u16, status_text: &str, body: &str) -> Self {
        Self {
            outcome: Outcome::Respond(HttpResponse::new(status, status_text, body)),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn refuse(reason: &str) -> Self {
        Self {
            outcome: Outcome::Fail(reason.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// The single request executed so far.
    pub fn last_request(&self) -> HttpRequest {
        let seen = self.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "expected exactly one request");
        seen[0].clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().unwrap().push(request);
        match &self.outcome {
            Outcome::Respond(response) => Ok(response.clone()),
            Outcome::Fail(reason) => Err(TransportError::Connection(reason.clone())),
        }
    }
}
