use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_ROOT: &str = "https://api.mollie.com/v2";
pub const DOCS_ERRORS: &str = "https://docs.mollie.com/overview/handling-errors";

/// Payment present in every fresh server, with one chargeback against it.
pub const SEEDED_PAYMENT_ID: &str = "tr_WDqYK6vllg";
pub const SEEDED_CHARGEBACK_ID: &str = "chb_n9z0tp";

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 250;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub resource: String,
    pub id: String,
    pub mode: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub locale: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: String,
    #[serde(rename = "_links")]
    pub links: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub resource: String,
    pub id: String,
    pub mode: String,
    pub amount: Amount,
    pub description: String,
    pub status: String,
    pub sequence_type: String,
    pub customer_id: Option<String>,
    pub created_at: String,
    #[serde(rename = "_links")]
    pub links: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    pub resource: String,
    pub id: String,
    pub mode: String,
    pub description: String,
    pub amount: Amount,
    pub profile_id: Option<String>,
    pub redirect_url: Option<String>,
    pub webhook_url: Option<String>,
    pub created_at: String,
    pub paid_at: Option<String>,
    pub expires_at: Option<String>,
    #[serde(rename = "_links")]
    pub links: Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chargeback {
    pub resource: String,
    pub id: String,
    pub amount: Amount,
    pub settlement_amount: Amount,
    pub created_at: String,
    pub reversed_at: Option<String>,
    pub payment_id: String,
    #[serde(rename = "_links")]
    pub links: Value,
}

/// Body accepted by customer create and update.
#[derive(Debug, Default, Deserialize)]
pub struct CustomerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub locale: Option<String>,
    pub metadata: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub amount: Option<Amount>,
    pub description: Option<String>,
    pub sequence_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkInput {
    pub amount: Option<Amount>,
    pub description: Option<String>,
    pub redirect_url: Option<String>,
    pub webhook_url: Option<String>,
    pub expires_at: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub from: Option<String>,
    pub limit: Option<usize>,
    pub profile_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub customers: Vec<Customer>,
    pub payments: Vec<Payment>,
    pub payment_links: Vec<PaymentLink>,
    pub chargebacks: Vec<Chargeback>,
}

pub type Db = Arc<RwLock<Store>>;

/// Error envelope in the shape the real API uses.
#[derive(Debug, Clone, Serialize)]
pub struct MockError {
    pub status: u16,
    pub title: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl MockError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            detail: detail.into(),
            field: None,
        }
    }

    pub fn unprocessable(field: &str, detail: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            ..Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut body = serde_json::to_value(&self).unwrap_or_default();
        body["_links"] = json!({"documentation": link(DOCS_ERRORS, "text/html")});
        (status, [(header::CONTENT_TYPE, "application/hal+json")], Json(body)).into_response()
    }
}

trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Customer {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Payment {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for PaymentLink {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for Chargeback {
    fn id(&self) -> &str {
        &self.id
    }
}

fn link(href: &str, kind: &str) -> Value {
    json!({"href": href, "type": kind})
}

fn hal(href: &str) -> Value {
    link(href, "application/hal+json")
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn new_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}", &simple[..10])
}

/// Newest-first page starting at `from`, wrapped in a list envelope.
fn paginate<T: Identified + Serialize>(
    items: &[T],
    params: &ListParams,
    key: &str,
    path: &str,
) -> Result<Json<Value>, MockError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(MockError {
            field: Some("limit".to_string()),
            ..MockError::new(StatusCode::BAD_REQUEST, format!("The limit must be between 1 and {MAX_LIMIT}"))
        });
    }

    let newest_first: Vec<&T> = items.iter().rev().collect();
    let start = match &params.from {
        Some(from) => newest_first
            .iter()
            .position(|item| item.id() == from)
            .ok_or_else(|| MockError::new(StatusCode::BAD_REQUEST, format!("Invalid starting ID {from}")))?,
        None => 0,
    };
    let page: Vec<&T> = newest_first.iter().skip(start).take(limit).copied().collect();
    let next = newest_first
        .get(start + limit)
        .map(|item| hal(&format!("{API_ROOT}/{path}?from={}&limit={limit}", item.id())));

    Ok(Json(json!({
        "count": page.len(),
        "_embedded": { key: page },
        "_links": {
            "self": hal(&format!("{API_ROOT}/{path}?limit={limit}")),
            "previous": null,
            "next": next,
            "documentation": link("https://docs.mollie.com/reference/v2", "text/html"),
        }
    })))
}

fn seeded_store() -> Store {
    let payment = Payment {
        resource: "payment".to_string(),
        id: SEEDED_PAYMENT_ID.to_string(),
        mode: "test".to_string(),
        amount: Amount {
            currency: "EUR".to_string(),
            value: "35.07".to_string(),
        },
        description: "Order #1337".to_string(),
        status: "paid".to_string(),
        sequence_type: "oneoff".to_string(),
        customer_id: None,
        created_at: "2018-03-14T16:00:00+00:00".to_string(),
        links: json!({"self": hal(&format!("{API_ROOT}/payments/{SEEDED_PAYMENT_ID}"))}),
    };
    let chargeback = Chargeback {
        resource: "chargeback".to_string(),
        id: SEEDED_CHARGEBACK_ID.to_string(),
        amount: Amount {
            currency: "EUR".to_string(),
            value: "35.07".to_string(),
        },
        settlement_amount: Amount {
            currency: "EUR".to_string(),
            value: "-35.07".to_string(),
        },
        created_at: "2018-03-14T17:00:52+00:00".to_string(),
        reversed_at: None,
        payment_id: SEEDED_PAYMENT_ID.to_string(),
        links: json!({
            "self": hal(&format!("{API_ROOT}/payments/{SEEDED_PAYMENT_ID}/chargebacks/{SEEDED_CHARGEBACK_ID}")),
            "payment": hal(&format!("{API_ROOT}/payments/{SEEDED_PAYMENT_ID}")),
        }),
    };
    Store {
        payments: vec![payment],
        chargebacks: vec![chargeback],
        ..Store::default()
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seeded_store()));
    Router::new()
        .route("/v2/customers", get(list_customers).post(create_customer))
        .route(
            "/v2/customers/{id}",
            get(get_customer).patch(update_customer).delete(delete_customer),
        )
        .route(
            "/v2/customers/{id}/payments",
            get(list_customer_payments).post(create_customer_payment),
        )
        .route("/v2/payment-links", get(list_payment_links).post(create_payment_link))
        .route("/v2/payment-links/{id}", get(get_payment_link))
        .route("/v2/chargebacks", get(list_chargebacks))
        .route("/v2/payments/{payment_id}/chargebacks", get(list_payment_chargebacks))
        .route("/v2/payments/{payment_id}/chargebacks/{id}", get(get_chargeback))
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Accepts `live_`, `test_` and `access_` bearer tokens.
async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| ["live_", "test_", "access_"].iter().any(|p| token.starts_with(p)));
    if !authorized {
        tracing::debug!(uri = %request.uri(), "rejecting unauthenticated request");
        return MockError::new(
            StatusCode::UNAUTHORIZED,
            "Missing authentication, or failed to authenticate",
        )
        .into_response();
    }
    next.run(request).await
}

fn customer_not_found(id: &str) -> MockError {
    MockError::new(StatusCode::NOT_FOUND, format!("No customer exists with token {id}."))
}

fn payment_not_found(id: &str) -> MockError {
    MockError::new(StatusCode::NOT_FOUND, format!("No payment exists with token {id}."))
}

// --- customers ---

async fn list_customers(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, MockError> {
    let store = db.read().await;
    paginate(&store.customers, &params, "customers", "customers")
}

async fn create_customer(
    State(db): State<Db>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), MockError> {
    if let Some(email) = &input.email {
        if !email.contains('@') {
            return Err(MockError::unprocessable("email", "The email address is invalid"));
        }
    }
    let id = new_id("cst");
    let customer = Customer {
        resource: "customer".to_string(),
        links: json!({
            "self": hal(&format!("{API_ROOT}/customers/{id}")),
            "payments": hal(&format!("{API_ROOT}/customers/{id}/payments")),
        }),
        id,
        mode: "test".to_string(),
        name: input.name,
        email: input.email,
        locale: input.locale,
        metadata: input.metadata,
        created_at: now(),
    };
    tracing::debug!(id = %customer.id, "created customer");
    db.write().await.customers.push(customer.clone());
    Ok((StatusCode::CREATED, Json(customer)))
}

async fn get_customer(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, MockError> {
    let store = db.read().await;
    store
        .customers
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| customer_not_found(&id))
}

async fn update_customer(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, MockError> {
    let mut store = db.write().await;
    let customer = store
        .customers
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(|| customer_not_found(&id))?;
    if let Some(name) = input.name {
        customer.name = Some(name);
    }
    if let Some(email) = input.email {
        customer.email = Some(email);
    }
    if let Some(locale) = input.locale {
        customer.locale = Some(locale);
    }
    if let Some(metadata) = input.metadata {
        customer.metadata = Some(metadata);
    }
    Ok(Json(customer.clone()))
}

async fn delete_customer(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, MockError> {
    let mut store = db.write().await;
    let before = store.customers.len();
    store.customers.retain(|c| c.id != id);
    if store.customers.len() == before {
        return Err(customer_not_found(&id));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn list_customer_payments(
    State(db): State<Db>,
    Path(id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, MockError> {
    let store = db.read().await;
    if !store.customers.iter().any(|c| c.id == id) {
        return Err(customer_not_found(&id));
    }
    let payments: Vec<Payment> = store
        .payments
        .iter()
        .filter(|p| p.customer_id.as_deref() == Some(id.as_str()))
        .cloned()
        .collect();
    paginate(&payments, &params, "payments", &format!("customers/{id}/payments"))
}

async fn create_customer_payment(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<PaymentInput>,
) -> Result<(StatusCode, Json<Payment>), MockError> {
    let mut store = db.write().await;
    if !store.customers.iter().any(|c| c.id == id) {
        return Err(customer_not_found(&id));
    }
    let amount = input
        .amount
        .ok_or_else(|| MockError::unprocessable("amount", "The amount is required"))?;
    let description = input
        .description
        .ok_or_else(|| MockError::unprocessable("description", "The description is required"))?;

    let payment_id = new_id("tr");
    let payment = Payment {
        resource: "payment".to_string(),
        links: json!({
            "self": hal(&format!("{API_ROOT}/payments/{payment_id}")),
            "customer": hal(&format!("{API_ROOT}/customers/{id}")),
        }),
        id: payment_id,
        mode: "test".to_string(),
        amount,
        description,
        status: "open".to_string(),
        sequence_type: input.sequence_type.unwrap_or_else(|| "oneoff".to_string()),
        customer_id: Some(id),
        created_at: now(),
    };
    store.payments.push(payment.clone());
    Ok((StatusCode::CREATED, Json(payment)))
}

// --- payment links ---

async fn list_payment_links(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, MockError> {
    let store = db.read().await;
    let links: Vec<PaymentLink> = match &params.profile_id {
        Some(profile) => store
            .payment_links
            .iter()
            .filter(|l| l.profile_id.as_deref() == Some(profile.as_str()))
            .cloned()
            .collect(),
        None => store.payment_links.clone(),
    };
    paginate(&links, &params, "payment_links", "payment-links")
}

async fn create_payment_link(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
    Json(input): Json<PaymentLinkInput>,
) -> Result<(StatusCode, Json<PaymentLink>), MockError> {
    let amount = input
        .amount
        .ok_or_else(|| MockError::unprocessable("amount", "The amount is required"))?;
    let description = input
        .description
        .ok_or_else(|| MockError::unprocessable("description", "The description is required"))?;

    let id = format!("pl_{}", Uuid::new_v4().simple());
    let link_value = PaymentLink {
        resource: "payment-link".to_string(),
        links: json!({
            "self": hal(&format!("{API_ROOT}/payment-links/{id}")),
            "paymentLink": link(&format!("https://useplink.com/payment/{}/", &id[3..]), "text/html"),
        }),
        id,
        mode: "test".to_string(),
        description,
        amount,
        profile_id: params.profile_id,
        redirect_url: input.redirect_url,
        webhook_url: input.webhook_url,
        created_at: now(),
        paid_at: None,
        expires_at: input.expires_at,
    };
    db.write().await.payment_links.push(link_value.clone());
    Ok((StatusCode::CREATED, Json(link_value)))
}

async fn get_payment_link(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<PaymentLink>, MockError> {
    let store = db.read().await;
    store
        .payment_links
        .iter()
        .find(|l| l.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::new(StatusCode::NOT_FOUND, format!("No payment link exists with token {id}.")))
}

// --- chargebacks ---

async fn list_chargebacks(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, MockError> {
    let store = db.read().await;
    paginate(&store.chargebacks, &params, "chargebacks", "chargebacks")
}

async fn list_payment_chargebacks(
    State(db): State<Db>,
    Path(payment_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Value>, MockError> {
    let store = db.read().await;
    if !store.payments.iter().any(|p| p.id == payment_id) {
        return Err(payment_not_found(&payment_id));
    }
    let chargebacks: Vec<Chargeback> = store
        .chargebacks
        .iter()
        .filter(|c| c.payment_id == payment_id)
        .cloned()
        .collect();
    paginate(
        &chargebacks,
        &params,
        "chargebacks",
        &format!("payments/{payment_id}/chargebacks"),
    )
}

async fn get_chargeback(
    State(db): State<Db>,
    Path((payment_id, id)): Path<(String, String)>,
) -> Result<Json<Chargeback>, MockError> {
    let store = db.read().await;
    if !store.payments.iter().any(|p| p.id == payment_id) {
        return Err(payment_not_found(&payment_id));
    }
    store
        .chargebacks
        .iter()
        .find(|c| c.payment_id == payment_id && c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| MockError::new(StatusCode::NOT_FOUND, format!("No chargeback exists with token {id}.")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_has_reason_title() {
        let err = MockError::new(StatusCode::NOT_FOUND, "No customer exists with token cst_1.");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["status"], 404);
        assert_eq!(json["title"], "Not Found");
        assert!(json.get("field").is_none());
    }

    #[test]
    fn unprocessable_names_the_field() {
        let err = MockError::unprocessable("amount", "The amount is required");
        assert_eq!(err.status, 422);
        assert_eq!(err.field.as_deref(), Some("amount"));
    }

    #[test]
    fn ids_carry_prefix() {
        let id = new_id("cst");
        assert!(id.starts_with("cst_"));
        assert_eq!(id.len(), 14);
    }

    #[test]
    fn customer_input_ignores_unknown_fields() {
        let input: CustomerInput =
            serde_json::from_str(r#"{"name":"A","resource":"customer","mode":"test"}"#).unwrap();
        assert_eq!(input.name.as_deref(), Some("A"));
        assert!(input.email.is_none());
    }

    #[test]
    fn paginate_walks_newest_first() {
        let mut store = Store::default();
        for n in 0..3 {
            store.customers.push(Customer {
                resource: "customer".to_string(),
                id: format!("cst_{n}"),
                mode: "test".to_string(),
                name: None,
                email: None,
                locale: None,
                metadata: None,
                created_at: now(),
                links: json!({}),
            });
        }
        let params = ListParams {
            limit: Some(2),
            ..ListParams::default()
        };
        let Json(page) = paginate(&store.customers, &params, "customers", "customers").unwrap();
        assert_eq!(page["count"], 2);
        assert_eq!(page["_embedded"]["customers"][0]["id"], "cst_2");
        assert_eq!(
            page["_links"]["next"]["href"],
            format!("{API_ROOT}/customers?from=cst_0&limit=2")
        );

        let params = ListParams {
            from: Some("cst_0".to_string()),
            limit: Some(2),
            ..ListParams::default()
        };
        let Json(page) = paginate(&store.customers, &params, "customers", "customers").unwrap();
        assert_eq!(page["count"], 1);
        assert!(page["_links"]["next"].is_null());
    }

    #[test]
    fn paginate_rejects_oversized_limit() {
        let params = ListParams {
            limit: Some(MAX_LIMIT + 1),
            ..ListParams::default()
        };
        let err = paginate::<Customer>(&[], &params, "customers", "customers").unwrap_err();
        assert_eq!(err.status, 400);
    }
}
