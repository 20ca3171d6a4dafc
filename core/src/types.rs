//! Value types shared by several resources.
//!
//! # Design
//! These mirror the JSON shapes Mollie uses across its v2 API. Amounts keep
//! their decimal string form (`"10.00"`) because the API treats the number of
//! decimals as significant per currency.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A monetary amount as sent and received by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub currency: String,
    pub value: String,
}

impl Amount {
    pub fn new(currency: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            value: value.into(),
        }
    }
}

/// A HAL-style link object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,
}

/// Links returned on list envelopes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<Link>,
}

/// Whether an object was created with a live or a test API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Live,
    Test,
    /// A value this client does not know yet, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

/// Payment sequence used for recurring charges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceType {
    #[serde(rename = "oneoff")]
    OneOff,
    First,
    Recurring,
    #[serde(untagged)]
    Other(String),
}

/// Locales accepted by the hosted checkout and stored on customers.
///
/// Locales added by the API later decode into `Other` and encode back as
/// the same string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    #[serde(rename = "en_US")]
    EnglishUs,
    #[serde(rename = "en_GB")]
    EnglishGb,
    #[serde(rename = "nl_NL")]
    Dutch,
    #[serde(rename = "nl_BE")]
    Flemish,
    #[serde(rename = "fr_FR")]
    French,
    #[serde(rename = "fr_BE")]
    FrenchBelgium,
    #[serde(rename = "de_DE")]
    German,
    #[serde(rename = "de_AT")]
    GermanAustria,
    #[serde(rename = "de_CH")]
    GermanSwiss,
    #[serde(rename = "es_ES")]
    Spanish,
    #[serde(rename = "ca_ES")]
    Catalan,
    #[serde(rename = "pt_PT")]
    Portuguese,
    #[serde(rename = "it_IT")]
    Italian,
    #[serde(rename = "nb_NO")]
    Norwegian,
    #[serde(rename = "sv_SE")]
    Swedish,
    #[serde(rename = "fi_FI")]
    Finnish,
    #[serde(rename = "da_DK")]
    Danish,
    #[serde(rename = "is_IS")]
    Icelandic,
    #[serde(rename = "hu_HU")]
    Hungarian,
    #[serde(rename = "pl_PL")]
    Polish,
    #[serde(rename = "lv_LV")]
    Latvian,
    #[serde(rename = "lt_LT")]
    Lithuanian,
    #[serde(untagged)]
    Other(String),
}

/// Deserialize a nullable JSON field so that an explicit `null` becomes
/// `Some(Value::Null)`. Paired with `#[serde(default)]`, a missing field
/// stays `None`.
pub(crate) fn keep_null<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Envelope around a page of resources.
///
/// `E` is the `_embedded` object, whose single key differs per resource
/// (`customers`, `chargebacks`, `payment_links`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct List<E> {
    #[serde(default)]
    pub count: u32,
    #[serde(rename = "_embedded", default)]
    pub embedded: E,
    #[serde(rename = "_links", default)]
    pub links: PaginationLinks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_type_uses_wire_names() {
        assert_eq!(serde_json::to_value(SequenceType::OneOff).unwrap(), "oneoff");
        assert_eq!(serde_json::to_value(SequenceType::Recurring).unwrap(), "recurring");
    }

    #[test]
    fn locale_uses_wire_names() {
        assert_eq!(serde_json::to_value(Locale::German).unwrap(), "de_DE");
        let locale: Locale = serde_json::from_str(r#""nl_BE""#).unwrap();
        assert_eq!(locale, Locale::Flemish);
    }

    #[test]
    fn unknown_locale_is_kept_verbatim() {
        let locale: Locale = serde_json::from_str(r#""en_IE""#).unwrap();
        assert_eq!(locale, Locale::Other("en_IE".to_string()));
        assert_eq!(serde_json::to_value(&locale).unwrap(), "en_IE");
    }

    #[test]
    fn unknown_mode_and_sequence_type_are_kept() {
        let mode: Mode = serde_json::from_str(r#""sandbox""#).unwrap();
        assert_eq!(mode, Mode::Other("sandbox".to_string()));
        let sequence: SequenceType = serde_json::from_str(r#""installment""#).unwrap();
        assert_eq!(serde_json::to_value(&sequence).unwrap(), "installment");
        let known: SequenceType = serde_json::from_str(r#""first""#).unwrap();
        assert_eq!(known, SequenceType::First);
    }

    #[test]
    fn link_omits_empty_type() {
        let link = Link {
            href: "https://www.mollie.com/checkout".to_string(),
            content_type: String::new(),
        };
        let json = serde_json::to_value(&link).unwrap();
        assert!(json.get("type").is_none());
    }

    #[test]
    fn pagination_links_accept_null_previous() {
        let raw = r#"{
            "self": {"href": "https://api.mollie.com/v2/customers?limit=5", "type": "application/hal+json"},
            "previous": null,
            "next": null
        }"#;
        let links: PaginationLinks = serde_json::from_str(raw).unwrap();
        assert!(links.self_link.is_some());
        assert!(links.previous.is_none());
        assert!(links.next.is_none());
    }
}
