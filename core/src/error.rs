//! Error types for the Mollie API client.
//!
//! # Design
//! Every failure a service method can produce lands in one `Error` enum.
//! Non-2xx replies are decoded from Mollie's JSON error envelope into
//! `ApiError` so callers can branch on the status and read the remote detail
//! text. A body that is not valid JSON, on either the error or the success
//! path, becomes `Error::Decode` and keeps the HTTP status it arrived with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::HttpMethod;
use crate::types::Link;

/// Result alias used by every client operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `Client` and the resource services.
#[derive(Debug, Error)]
pub enum Error {
    /// The client cannot build a request: bad or unset base URL, missing
    /// access token, or a missing environment variable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The underlying transport failed before a reply was received.
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The API replied with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A response body could not be decoded into the expected type.
    #[error("failed to decode response body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The request body or query string could not be encoded.
    #[error("failed to encode request: {0}")]
    Serialization(String),
}

impl Error {
    /// HTTP status of the reply that caused this error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api(err) => Some(err.status),
            Error::Decode { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Structured error reported by the API.
///
/// `status`, `title`, `detail`, `field` and `_links` come straight from the
/// error envelope; `method` and `url` identify the request that failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status} {title}: {detail}{}", field_suffix(.field))]
pub struct ApiError {
    pub status: u16,
    pub title: String,
    pub detail: String,
    pub field: Option<String>,
    pub documentation: Option<Link>,
    pub method: HttpMethod,
    pub url: String,
}

fn field_suffix(field: &Option<String>) -> String {
    match field {
        Some(field) if !field.is_empty() => format!(", affected field: {field}"),
        _ => String::new(),
    }
}

/// Wire shape of the error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ErrorEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub title: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "_links", default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ErrorLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ErrorLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Link>,
}

impl ErrorEnvelope {
    /// `status` is the HTTP status of the reply; it is used when the envelope
    /// does not carry one.
    pub(crate) fn into_api_error(self, status: u16, method: HttpMethod, url: String) -> ApiError {
        ApiError {
            status: self.status.unwrap_or(status),
            title: self.title,
            detail: self.detail,
            field: self.field,
            documentation: self.links.and_then(|links| links.documentation),
            method,
            url,
        }
    }
}
