//! Payment objects as returned by customer payment endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{keep_null, Amount, Link, List, Locale, Mode, SequenceType};

/// A payment created for, or listed under, a customer.
///
/// Fields the client does not model are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// An explicit `null` is kept as `Some(Value::Null)`.
    #[serde(default, deserialize_with = "keep_null", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cancelable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_refunded: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_remaining: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_charged_back: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_type: Option<SequenceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandate_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<DateTime<Utc>>,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<PaymentResourceLinks>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Links attached to a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResourceLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandate: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chargebacks: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refunds: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedPayments {
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// A page of payments.
pub type PaymentList = List<EmbeddedPayments>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_survive_a_round_trip() {
        let raw = serde_json::json!({
            "resource": "payment",
            "id": "tr_7UhSN1zuXS",
            "amount": {"currency": "EUR", "value": "10.00"},
            "details": {"consumerName": "Hr E G H Küppers en/of MW M.J. Küppers-Veeneman"},
            "applicationFee": {"amount": {"currency": "EUR", "value": "0.50"}}
        });
        let payment: Payment = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(payment.id.as_deref(), Some("tr_7UhSN1zuXS"));
        assert!(payment.extra.contains_key("details"));
        assert_eq!(serde_json::to_value(&payment).unwrap(), raw);
    }

    #[test]
    fn absent_fields_are_not_written() {
        let payment = Payment {
            amount: Some(Amount::new("EUR", "10.00")),
            description: Some(String::new()),
            ..Payment::default()
        };
        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json, serde_json::json!({
            "amount": {"currency": "EUR", "value": "10.00"},
            "description": ""
        }));
    }

    #[test]
    fn timestamps_parse_with_fractional_seconds() {
        let payment: Payment =
            serde_json::from_str(r#"{"createdAt":"2018-03-20T09:13:37.0Z","paidAt":"2018-03-20T09:14:37+00:00"}"#).unwrap();
        assert!(payment.created_at.is_some());
        assert!(payment.paid_at.unwrap() > payment.created_at.unwrap());
    }
}
