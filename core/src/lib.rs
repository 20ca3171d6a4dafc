//! Synchronous client for the Mollie v2 payments API.
//!
//! # Overview
//! `Client` owns the configuration and a `Transport`. Resource services are
//! borrowed from it (`client.customers()`, `client.chargebacks()`,
//! `client.payment_links()`) and each method maps to exactly one HTTP
//! request.
//!
//! ```no_run
//! use mollie::{Client, Config};
//!
//! let client = Client::new(Config::api_from_env()?);
//! let (_, customer) = client.customers().get("cst_kEn1PlbGa")?;
//! println!("{:?}", customer.email);
//! # Ok::<(), mollie::Error>(())
//! ```
//!
//! # Design
//! - The transport core (`client`) is the only place that knows about URLs,
//!   headers and status codes; services only pick a verb, a path and the
//!   type to decode.
//! - Methods return `(Response, value)` on success so callers keep access to
//!   headers and the raw body, and an `Error` otherwise. Never both.
//! - Resource structs keep unknown fields in `extra`, so decoding and
//!   re-encoding an object does not lose data.
//! - No retries, no background work. `Client` is `Send + Sync`.

pub mod chargebacks;
pub mod client;
pub mod config;
pub mod customers;
pub mod error;
pub mod http;
pub mod idempotency;
pub mod payment_links;
pub mod payments;
pub mod transport;
pub mod types;

#[cfg(test)]
mod testing;

pub use chargebacks::{
    Chargeback, ChargebackLinks, ChargebackOptions, ChargebackReason, Chargebacks, ChargebacksList,
    ChargebacksListOptions,
};
pub use client::Client;
pub use config::{Config, API_TOKEN_ENV, BASE_URL, ORG_TOKEN_ENV};
pub use customers::{Customer, CustomerLinks, Customers, CustomersList, ListCustomersOptions};
pub use error::{ApiError, Error, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestContext, Response, Transport};
pub use idempotency::{FixedKeyGenerator, IdempotencyKeyGenerator, UuidKeyGenerator};
pub use payment_links::{PaymentLink, PaymentLinkLinks, PaymentLinkOptions, PaymentLinks, PaymentLinksList};
pub use payments::{Payment, PaymentList, PaymentResourceLinks};
pub use transport::UreqTransport;
pub use types::{Amount, Link, List, Locale, Mode, PaginationLinks, SequenceType};
