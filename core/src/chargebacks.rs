//! Chargebacks API.
//!
//! Chargebacks are read-only. They can be fetched per payment or listed
//! across the whole account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{id_segment, Client};
use crate::error::Result;
use crate::http::Response;
use crate::types::{Amount, Link, List};

/// A payment reversed by the consumer's bank or card issuer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chargeback {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_amount: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ChargebackReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<ChargebackLinks>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reason code reported by the acquirer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargebackReason {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargebackLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Link>,
}

/// Query parameters for fetching a single chargeback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargebackOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<String>,
}

/// Query parameters for listing chargebacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargebacksListOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedChargebacks {
    #[serde(default)]
    pub chargebacks: Vec<Chargeback>,
}

pub type ChargebacksList = List<EmbeddedChargebacks>;

#[derive(Debug, Clone, Copy)]
pub struct Chargebacks<'a> {
    client: &'a Client,
}

impl<'a> Chargebacks<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get(
        &self,
        payment_id: &str,
        chargeback_id: &str,
        options: Option<&ChargebackOptions>,
    ) -> Result<(Response, Chargeback)> {
        let path = format!(
            "v2/payments/{}/chargebacks/{}",
            id_segment(payment_id)?,
            id_segment(chargeback_id)?
        );
        let response = self.client.get(&path, options)?;
        let chargeback = response.decode()?;
        Ok((response, chargeback))
    }

    /// All chargebacks on the account, newest first.
    pub fn list(&self, options: Option<&ChargebacksListOptions>) -> Result<(Response, ChargebacksList)> {
        let response = self.client.get("v2/chargebacks", options)?;
        let list = response.decode()?;
        Ok((response, list))
    }

    pub fn list_for_payment(
        &self,
        payment_id: &str,
        options: Option<&ChargebacksListOptions>,
    ) -> Result<(Response, ChargebacksList)> {
        let path = format!("v2/payments/{}/chargebacks", id_segment(payment_id)?);
        let response = self.client.get(&path, options)?;
        let list = response.decode()?;
        Ok((response, list))
    }
}
