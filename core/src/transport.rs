//! Default `Transport` backed by a `ureq` agent.
//!
//! Every request is sent with `http_status_as_error(false)` so 4xx/5xx
//! replies come back as data and the client decides what they mean.

use std::time::Duration;

use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Blocking HTTP transport using `ureq`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap an agent configured by the caller. Its other settings are kept,
    /// but every request overrides `http_status_as_error` to `false`.
    pub fn with_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Attach headers and make 4xx/5xx come back as replies for this request,
/// whatever the agent was configured with.
fn prepare<B>(
    builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    let mut builder = builder.config().http_status_as_error(false).build();
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn send(
        &self,
        request: &HttpRequest,
    ) -> Result<HttpResponse, Box<dyn std::error::Error + Send + Sync>> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let body = request.body.as_deref().unwrap_or_default().as_bytes();

        let mut response = match request.method {
            HttpMethod::Get => prepare(self.agent.get(url), headers).call(),
            HttpMethod::Delete => prepare(self.agent.delete(url), headers).call(),
            HttpMethod::Post => prepare(self.agent.post(url), headers).send(body),
            HttpMethod::Patch => prepare(self.agent.patch(url), headers).send(body),
        }?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
