//! The transport core shared by every resource service.
//!
//! # Design
//! `Client` holds the immutable configuration (base URL, token, flags) and a
//! `Transport`. A call goes through three steps that are also public on their
//! own:
//!
//! - `build_request` resolves the path against the base URL, encodes the
//!   query and JSON body, and attaches auth and standard headers.
//! - the `Transport` performs the round-trip and buffers the body.
//! - `parse_response` turns non-2xx replies into `Error::Api` and wraps
//!   successful ones in a `Response`.
//!
//! Decoding the success body into a resource type is left to the service.
//! Nothing is retried.

use std::fmt;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::chargebacks::Chargebacks;
use crate::config::Config;
use crate::customers::Customers;
use crate::error::{Error, ErrorEnvelope, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestContext, Response, Transport};
use crate::idempotency::{IdempotencyKeyGenerator, UuidKeyGenerator, IDEMPOTENCY_KEY_HEADER};
use crate::payment_links::PaymentLinks;
use crate::transport::UreqTransport;

const TOKEN_TYPE: &str = "Bearer";

/// Bytes escaped when an ID is placed in a path. Covers the path-segment set
/// plus `%` and both slashes, so an ID always stays one segment.
const ID_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');
const JSON_CONTENT_TYPE: &str = "application/json";

/// Synchronous client for the Mollie v2 API.
///
/// Cheap to clone; clones share the transport. Safe to use from several
/// threads at once.
#[derive(Clone)]
pub struct Client {
    base_url: String,
    token: Option<String>,
    testing: bool,
    idempotency: bool,
    user_agent: String,
    transport: Arc<dyn Transport>,
    key_generator: Arc<dyn IdempotencyKeyGenerator>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("testing", &self.testing)
            .field("idempotency", &self.idempotency)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client using the default `ureq` transport.
    pub fn new(config: Config) -> Self {
        let transport = UreqTransport::new(config.timeout);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self {
            base_url: config.base_url,
            token: config.token,
            testing: config.testing,
            idempotency: config.idempotency,
            user_agent: config.user_agent,
            transport: Arc::new(transport),
            key_generator: Arc::new(UuidKeyGenerator),
        }
    }

    /// Replace the access token, e.g. after an OAuth refresh.
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn set_idempotency_key_generator(&mut self, generator: impl IdempotencyKeyGenerator + 'static) {
        self.key_generator = Arc::new(generator);
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_testing(&self) -> bool {
        self.testing
    }

    pub fn customers(&self) -> Customers<'_> {
        Customers::new(self)
    }

    pub fn chargebacks(&self) -> Chargebacks<'_> {
        Chargebacks::new(self)
    }

    pub fn payment_links(&self) -> PaymentLinks<'_> {
        PaymentLinks::new(self)
    }

    /// Build, send and check one request.
    pub fn execute<Q, B>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<Response>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let request = self.build_request(method, path, query, body)?;
        debug!(method = %request.method, url = %request.url, "sending request");
        let raw = self.transport.send(&request).map_err(Error::Transport)?;
        self.parse_response(&request, raw)
    }

    /// Resolve `path` against the base URL and produce a ready-to-send request.
    ///
    /// Fails with `Error::Configuration` before any I/O when the base URL or
    /// the token is unusable.
    pub fn build_request<Q, B>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<HttpRequest>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut url = self.resolve(path)?;

        let mut pairs = match query {
            Some(query) => encode_query(query)?,
            None => Vec::new(),
        };
        if self.testing {
            pairs.push(("testmode".to_string(), "true".to_string()));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let token = self
            .token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| Error::Configuration("missing access token".to_string()))?;

        let mut headers = vec![
            ("Authorization".to_string(), format!("{TOKEN_TYPE} {token}")),
            ("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ("Accept".to_string(), JSON_CONTENT_TYPE.to_string()),
            ("User-Agent".to_string(), self.user_agent.clone()),
        ];
        if self.idempotency && method == HttpMethod::Post {
            headers.push((IDEMPOTENCY_KEY_HEADER.to_string(), self.key_generator.generate()));
        }

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers,
            body,
        })
    }

    /// Map non-2xx replies to `Error::Api`; wrap the rest untouched.
    pub fn parse_response(&self, request: &HttpRequest, raw: HttpResponse) -> Result<Response> {
        debug!(status = raw.status, bytes = raw.body.len(), "received response");

        if (200..300).contains(&raw.status) {
            let context = RequestContext {
                method: request.method,
                url: request.url.clone(),
            };
            return Ok(Response::new(raw, context));
        }

        let envelope: ErrorEnvelope = serde_json::from_slice(&raw.body).map_err(|source| Error::Decode {
            status: raw.status,
            source,
        })?;
        let err = envelope.into_api_error(raw.status, request.method, request.url.clone());
        warn!(status = err.status, title = %err.title, url = %err.url, "api request failed");
        Err(Error::Api(err))
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        if self.base_url.is_empty() {
            return Err(Error::Configuration("base url is not set".to_string()));
        }
        let base = Url::parse(&self.base_url)
            .map_err(|e| Error::Configuration(format!("invalid base url {:?}: {e}", self.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "base url {:?} cannot be used as a base",
                self.base_url
            )));
        }
        if !base.path().ends_with('/') {
            return Err(Error::Configuration(
                "malformed base url, it must contain a trailing slash".to_string(),
            ));
        }
        base.join(path.trim_start_matches('/'))
            .map_err(|e| Error::Configuration(format!("invalid request path {path:?}: {e}")))
    }

    pub(crate) fn get<Q: Serialize + ?Sized>(&self, path: &str, query: Option<&Q>) -> Result<Response> {
        self.execute(HttpMethod::Get, path, query, None::<&()>)
    }

    pub(crate) fn post<B, Q>(&self, path: &str, body: &B, query: Option<&Q>) -> Result<Response>
    where
        B: Serialize + ?Sized,
        Q: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Post, path, query, Some(body))
    }

    pub(crate) fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(HttpMethod::Patch, path, None::<&()>, Some(body))
    }

    pub(crate) fn delete(&self, path: &str) -> Result<Response> {
        self.execute(HttpMethod::Delete, path, None::<&()>, None::<&()>)
    }
}

/// Encode a caller-supplied resource ID as exactly one path segment.
///
/// Empty and dot-only IDs would resolve to a different endpoint and are
/// rejected before any request is built.
pub(crate) fn id_segment(id: &str) -> Result<String> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(Error::Configuration(format!("invalid resource id {id:?}")));
    }
    Ok(utf8_percent_encode(id, ID_SEGMENT).to_string())
}

/// Encode an options struct, dropping parameters with empty values.
fn encode_query<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>> {
    let encoded = serde_urlencoded::to_string(query).map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .filter(|(_, value)| !value.is_empty())
        .collect())
}
