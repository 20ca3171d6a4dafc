//! HTTP types shared by the transport core and the `Transport` seam.
//!
//! # Design
//! Requests and replies are plain data. `Client` builds an `HttpRequest`,
//! hands it to a `Transport`, and receives an `HttpResponse` whose body has
//! already been read in full. Keeping the I/O behind one trait lets tests
//! replay canned replies without a socket.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved HTTP request described as plain data.
///
/// `url` is absolute and already carries the query string.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A raw HTTP reply with its body buffered.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Method and URL of the request a `Response` answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: HttpMethod,
    pub url: String,
}

/// A successful API reply paired with the request that produced it.
///
/// The body is buffered once; services decode from it and callers may decode
/// it again into their own types.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub request: RequestContext,
}

impl Response {
    pub(crate) fn new(raw: HttpResponse, request: RequestContext) -> Self {
        Self {
            status: raw.status,
            headers: raw.headers,
            body: raw.body,
            request,
        }
    }

    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Decode the buffered body as JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|source| Error::Decode {
            status: self.status,
            source,
        })
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Executes one HTTP round-trip.
///
/// Implementations must return non-2xx replies as `Ok` so the client can
/// decode the error envelope; `Err` is reserved for failures where no reply
/// was received.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> std::result::Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> std::result::Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names_are_uppercase() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Patch.as_str(), "PATCH");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.mollie.com/v2/customers".to_string(),
            headers: vec![("Authorization".to_string(), "Bearer test_x".to_string())],
            body: None,
        };
        assert_eq!(request.header("authorization"), Some("Bearer test_x"));
        assert_eq!(request.header("content-type"), None);
    }

    fn response(body: &str) -> Response {
        Response {
            status: 200,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
            request: RequestContext {
                method: HttpMethod::Get,
                url: "https://api.mollie.com/v2/customers/cst_1".to_string(),
            },
        }
    }

    #[test]
    fn decode_reads_buffered_body() {
        let value: serde_json::Value = response(r#"{"id":"cst_1"}"#).decode().unwrap();
        assert_eq!(value["id"], "cst_1");
    }

    #[test]
    fn decode_can_run_twice() {
        let response = response(r#"{"id":"cst_1"}"#);
        let first: serde_json::Value = response.decode().unwrap();
        let second: serde_json::Value = response.decode().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn decode_failure_keeps_status() {
        let err = response("{hello}").decode::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, Error::Decode { status: 200, .. }));
    }
}
