//! Customers API: `v2/customers`.
//!
//! Customers hold contact details and are the parent of recurring payments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{id_segment, Client};
use crate::error::Result;
use crate::http::Response;
use crate::payments::{Payment, PaymentList};
use crate::types::{keep_null, Link, List, Locale, Mode, SequenceType};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    /// An explicit `null` is kept as `Some(Value::Null)`.
    #[serde(default, deserialize_with = "keep_null", skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "_links", skip_serializing_if = "Option::is_none")]
    pub links: Option<CustomerLinks>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerLinks {
    #[serde(rename = "self", skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mandates: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscriptions: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Link>,
}

/// Query parameters for listing customers and their payments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_type: Option<SequenceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedCustomers {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

pub type CustomersList = List<EmbeddedCustomers>;

fn customer_path(id: &str) -> Result<String> {
    Ok(format!("v2/customers/{}", id_segment(id)?))
}

/// Operations on customers and the payments that belong to them.
#[derive(Debug, Clone, Copy)]
pub struct Customers<'a> {
    client: &'a Client,
}

impl<'a> Customers<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn get(&self, id: &str) -> Result<(Response, Customer)> {
        let response = self.client.get(&customer_path(id)?, None::<&()>)?;
        let customer = response.decode()?;
        Ok((response, customer))
    }

    pub fn create(&self, customer: &Customer) -> Result<(Response, Customer)> {
        let response = self.client.post("v2/customers", customer, None::<&()>)?;
        let created = response.decode()?;
        Ok((response, created))
    }

    /// Only the fields set on `customer` are changed.
    pub fn update(&self, id: &str, customer: &Customer) -> Result<(Response, Customer)> {
        let response = self.client.patch(&customer_path(id)?, customer)?;
        let updated = response.decode()?;
        Ok((response, updated))
    }

    /// The API replies `204 No Content`; there is nothing to decode.
    pub fn delete(&self, id: &str) -> Result<Response> {
        self.client.delete(&customer_path(id)?)
    }

    pub fn list(&self, options: Option<&ListCustomersOptions>) -> Result<(Response, CustomersList)> {
        let response = self.client.get("v2/customers", options)?;
        let list = response.decode()?;
        Ok((response, list))
    }

    pub fn get_payments(
        &self,
        id: &str,
        options: Option<&ListCustomersOptions>,
    ) -> Result<(Response, PaymentList)> {
        let path = format!("{}/payments", customer_path(id)?);
        let response = self.client.get(&path, options)?;
        let list = response.decode()?;
        Ok((response, list))
    }

    pub fn create_payment(&self, id: &str, payment: &Payment) -> Result<(Response, Payment)> {
        let path = format!("{}/payments", customer_path(id)?);
        let response = self.client.post(&path, payment, None::<&()>)?;
        let created = response.decode()?;
        Ok((response, created))
    }
}
