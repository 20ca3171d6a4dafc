//! In-memory `Transport` for unit tests.

use std::sync::{Arc, Mutex};

use crate::client::Client;
use crate::config::Config;
use crate::http::{HttpRequest, HttpResponse, Transport};

pub(crate) const TEST_BASE_URL: &str = "https://api.mollie.test/";

type Reply = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, String> + Send + Sync>;

/// Records every request and answers with a fixed reply.
pub(crate) struct MockTransport {
    requests: Mutex<Vec<HttpRequest>>,
    reply: Reply,
}

impl MockTransport {
    pub(crate) fn json(status: u16, body: &str) -> Arc<Self> {
        let body = body.as_bytes().to_vec();
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Box::new(move |_| {
                Ok(HttpResponse {
                    status,
                    headers: vec![("content-type".to_string(), "application/hal+json".to_string())],
                    body: body.clone(),
                })
            }),
        })
    }

    pub(crate) fn failing(message: &str) -> Arc<Self> {
        let message = message.to_string();
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            reply: Box::new(move |_| Err(message.clone())),
        })
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        self.requests.lock().unwrap().push(request.clone());
        (self.reply)(request).map_err(Into::into)
    }
}

pub(crate) fn client_with(transport: Arc<MockTransport>) -> Client {
    Client::with_transport(Config::new("test_token").with_base_url(TEST_BASE_URL), transport)
}

/// Error envelope used by the API for unexpected failures.
pub(crate) const INTERNAL_SERVER_ERROR: &str = r#"{
    "status": 500,
    "title": "Internal Server Error",
    "detail": "An internal server error occurred while processing your request."
}"#;
