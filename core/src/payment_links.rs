//! Payment links API: `v2/payment-links`.
//!
//! A payment link is a shareable URL that sends the customer to a hosted
//! payment page. Unlike regular payments they do not expire unless an
//! `expiresAt` is given.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{id_segment, Client};
use crate::error::Result;
use crate::http::Response;
use crate::types::{Amount, Link, List, Mode};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<PaymentLinkLinks>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Link>,
    /// The hosted page to share with the customer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
}

/// Query parameters for creating and listing payment links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentLinkOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedPaymentLinks {
    #[serde(default)]
    pub payment_links: Vec<PaymentLink>,
}

pub type PaymentLinksList = List<EmbeddedPaymentLinks>;

#[derive(Debug, Clone, Copy)]
pub struct PaymentLinks<'a> {
    client: &'a Client,
}

impl<'a> PaymentLinks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get(&self, id: &str) -> Result<(Response, PaymentLink)> {
        let path = format!("v2/payment-links/{}", id_segment(id)?);
        let response = self.client.get(&path, None::<&()>)?;
        let link = response.decode()?;
        Ok((response, link))
    }

    pub fn create(
        &self,
        link: &PaymentLink,
        options: Option<&PaymentLinkOptions>,
    ) -> Result<(Response, PaymentLink)> {
        let response = self.client.post("v2/payment-links", link, options)?;
        let created = response.decode()?;
        Ok((response, created))
    }

    /// Payment links of the active profile, newest first.
    pub fn list(&self, options: Option<&PaymentLinkOptions>) -> Result<(Response, PaymentLinksList)> {
        let response = self.client.get("v2/payment-links", options)?;
        let list = response.decode()?;
        Ok((response, list))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::HttpMethod;
    use crate::testing::{client_with, MockTransport, INTERNAL_SERVER_ERROR, TEST_BASE_URL};

    const PAYMENT_LINK: &str = r#"{
        "resource": "payment-link",
        "id": "pl_4Y0eZitmBnQ6IDoMqZQKh",
        "mode": "test",
        "profileId": "pfl_QkEhN94Ba",
        "createdAt": "2021-03-20T09:13:37+00:00",
        "paidAt": "2021-03-21T09:13:37+00:00",
        "updatedAt": "2021-03-21T09:13:37+00:00",
        "expiresAt": "2023-06-06T11:00:00+00:00",
        "amount": {"value": "24.95", "currency": "EUR"},
        "description": "Bicycle tires",
        "redirectUrl": "https://webshop.example.org/thanks",
        "webhookUrl": "https://webshop.example.org/payment-links/webhook/",
        "_links": {
            "self": {
                "href": "https://api.mollie.com/v2/payment-links/pl_4Y0eZitmBnQ6IDoMqZQKh",
                "type": "application/json"
            },
            "paymentLink": {
                "href": "https://useplink.com/payment/4Y0eZitmBnQ6IDoMqZQKh/",
                "type": "text/html"
            }
        }
    }"#;

    #[test]
    fn get_decodes_link() {
        let transport = MockTransport::json(200, PAYMENT_LINK);
        let client = client_with(transport.clone());
        let (_, link) = client.payment_links().get("pl_4Y0eZitmBnQ6IDoMqZQKh").unwrap();

        assert_eq!(link.id.as_deref(), Some("pl_4Y0eZitmBnQ6IDoMqZQKh"));
        assert_eq!(link.amount, Some(Amount::new("EUR", "24.95")));
        assert_eq!(
            link.links.unwrap().payment_link.unwrap().href,
            "https://useplink.com/payment/4Y0eZitmBnQ6IDoMqZQKh/"
        );
        assert_eq!(
            transport.last_request().url,
            format!("{TEST_BASE_URL}v2/payment-links/pl_4Y0eZitmBnQ6IDoMqZQKh")
        );
    }

    #[test]
    fn get_server_error() {
        let client = client_with(MockTransport::json(500, INTERNAL_SERVER_ERROR));
        let err = client.payment_links().get("pl_4Y0eZitmBnQ6IDoMqZQKh").unwrap_err();
        match err {
            Error::Api(api) => assert_eq!(
                api.detail,
                "An internal server error occurred while processing your request."
            ),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn create_sends_body_and_query() {
        let transport = MockTransport::json(201, PAYMENT_LINK);
        let client = client_with(transport.clone());
        let input = PaymentLink {
            description: Some("Bicycle tires".to_string()),
            amount: Some(Amount::new("EUR", "24.95")),
            ..PaymentLink::default()
        };
        let options = PaymentLinkOptions {
            profile_id: Some("pfl_QkEhN94Ba".to_string()),
            ..PaymentLinkOptions::default()
        };
        let (response, created) = client.payment_links().create(&input, Some(&options)).unwrap();
        assert_eq!(response.status, 201);
        assert_eq!(created.description.as_deref(), Some("Bicycle tires"));

        let req = transport.last_request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{TEST_BASE_URL}v2/payment-links?profileId=pfl_QkEhN94Ba"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "description": "Bicycle tires",
                "amount": {"currency": "EUR", "value": "24.95"}
            })
        );
    }

    #[test]
    fn list_decodes_snake_case_embedded_key() {
        let transport = MockTransport::json(
            200,
            r#"{"count":1,"_embedded":{"payment_links":[{"id":"pl_4Y0eZitmBnQ6IDoMqZQKh"}]},"_links":{"next":{"href":"https://api.mollie.com/v2/payment-links?from=pl_ER6aqfpXg6nZrJvcsxNsm&limit=1","type":"application/hal+json"}}}"#,
        );
        let client = client_with(transport.clone());
        let options = PaymentLinkOptions {
            limit: Some(1),
            ..PaymentLinkOptions::default()
        };
        let (_, list) = client.payment_links().list(Some(&options)).unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.embedded.payment_links[0].id.as_deref(), Some("pl_4Y0eZitmBnQ6IDoMqZQKh"));
        assert!(list.links.next.is_some());
        assert_eq!(transport.last_request().url, format!("{TEST_BASE_URL}v2/payment-links?limit=1"));
    }

    #[test]
    fn list_malformed_body() {
        let client = client_with(MockTransport::json(200, "not json"));
        let err = client.payment_links().list(None).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn get_escapes_or_rejects_ids() {
        let transport = MockTransport::json(200, PAYMENT_LINK);
        let client = client_with(transport.clone());
        client.payment_links().get("pl_1?testmode=true").unwrap();
        assert_eq!(
            transport.last_request().url,
            format!("{TEST_BASE_URL}v2/payment-links/pl_1%3Ftestmode=true")
        );

        let err = client.payment_links().get("").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(transport.requests().len(), 1);
    }
}
