//! In-process transport with canned responses

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::{Method, Request, Response, Transport, TransportError};

/// Serves stubbed responses keyed by verb and URL, and records every request
///
/// A stub answers any number of requests. Requests without a stub fail with
/// [`TransportError::NotStubbed`].
#[derive(Debug, Default)]
pub struct MockTransport {
    stubs: Mutex<HashMap<(Method, String), Response>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stub(&self, method: Method, url: impl Into<String>, response: Response) {
        self.stubs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, url.into()), response);
    }

    /// Stub a 200 response with a JSON body
    pub fn stub_json(&self, method: Method, url: impl Into<String>, body: Value) {
        self.stub(method, url, Response::json(&body));
    }

    /// Builder-style [`stub`](Self::stub)
    pub fn with_stub(self, method: Method, url: impl Into<String>, response: Response) -> Self {
        self.stub(method, url, response);
        self
    }

    /// Requests sent so far, oldest first
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let key = (request.method, request.url.clone());
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let response = self
            .stubs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        response.ok_or(TransportError::NotStubbed {
            method: key.0,
            url: key.1,
        })
    }
}
