//! Custom serde helpers for Coinbase's response formats.
//!
//! Coinbase has changed the shape of some fields across API versions. These
//! modules accept both shapes so the client works with any pinned version.

use std::fmt;

use serde::{Deserialize, Deserializer, de};

/// Deserialize a currency that may be a bare code or a currency object.
///
/// Older API versions return `"currency": "BTC"`, newer ones return
/// `"currency": { "code": "BTC", "name": "Bitcoin", ... }`.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use coinbase_api_client::types::serde_helpers::currency_code;
///
/// #[derive(Deserialize, Debug)]
/// struct Account {
///     #[serde(deserialize_with = "currency_code::deserialize")]
///     currency: String,
/// }
///
/// let a: Account = serde_json::from_str(r#"{"currency":"BTC"}"#).unwrap();
/// assert_eq!(a.currency, "BTC");
///
/// let a: Account =
///     serde_json::from_str(r#"{"currency":{"code":"ETH","name":"Ethereum"}}"#).unwrap();
/// assert_eq!(a.currency, "ETH");
/// ```
pub mod currency_code {
    use super::*;

    /// Deserialize a currency code from a string or an object with a `code` field.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CurrencyVisitor;

        impl<'de> de::Visitor<'de> for CurrencyVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a currency code string or an object with a code field")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(v.to_string())
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut code = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "code" {
                        code = Some(map.next_value::<String>()?);
                    } else {
                        map.next_value::<de::IgnoredAny>()?;
                    }
                }
                code.ok_or_else(|| de::Error::missing_field("code"))
            }
        }

        deserializer.deserialize_any(CurrencyVisitor)
    }
}

/// Deserialize an empty string (or null) as `None`.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use coinbase_api_client::types::serde_helpers::empty_string_as_none;
///
/// #[derive(Deserialize, Debug)]
/// struct Transaction {
///     #[serde(deserialize_with = "empty_string_as_none::deserialize", default)]
///     description: Option<String>,
/// }
///
/// let t: Transaction = serde_json::from_str(r#"{"description":""}"#).unwrap();
/// assert!(t.description.is_none());
///
/// let t: Transaction = serde_json::from_str(r#"{"description":null}"#).unwrap();
/// assert!(t.description.is_none());
///
/// let t: Transaction = serde_json::from_str(r#"{"description":"rent"}"#).unwrap();
/// assert_eq!(t.description.as_deref(), Some("rent"));
/// ```
pub mod empty_string_as_none {
    use super::*;

    /// Deserialize a string, mapping empty values to `None`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt = Option::<String>::deserialize(deserializer)?;
        Ok(opt.filter(|s| !s.is_empty()))
    }
}
