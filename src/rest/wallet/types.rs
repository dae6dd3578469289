//! Types for wallet (account-scoped) REST API endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::types::serde_helpers::{currency_code, empty_string_as_none};

/// An amount of money in a given currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount.
    pub amount: Decimal,
    /// Currency code.
    pub currency: String,
}

/// A Coinbase account (wallet).
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: String,
    /// User-visible account name.
    #[serde(default)]
    pub name: String,
    /// Whether this is the user's primary account.
    #[serde(default)]
    pub primary: bool,
    /// Account type (wallet, fiat, vault).
    #[serde(rename = "type", default)]
    pub account_type: Option<String>,
    /// Currency code of the account.
    #[serde(deserialize_with = "currency_code::deserialize")]
    pub currency: String,
    /// Balance in the account currency.
    pub balance: Money,
    /// Balance in the user's native currency.
    #[serde(default)]
    pub native_balance: Option<Money>,
    /// Creation time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Last update time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
    /// Resource name.
    #[serde(default)]
    pub resource: Option<String>,
    /// Resource path.
    #[serde(default)]
    pub resource_path: Option<String>,
}

/// Pagination metadata returned with list responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    /// Cursor before the current page.
    #[serde(default)]
    pub ending_before: Option<String>,
    /// Cursor after the current page.
    #[serde(default)]
    pub starting_after: Option<String>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Sort order ("asc" or "desc").
    #[serde(default)]
    pub order: Option<String>,
    /// Path of the previous page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub previous_uri: Option<String>,
    /// Path of the next page, absent on the last page.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub next_uri: Option<String>,
}

/// Request to create a new receive address.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateAddressRequest {
    /// Optional label for the address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CreateAddressRequest {
    /// Create an unlabeled address request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Label the address.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A receive address.
#[derive(Debug, Clone, Deserialize)]
pub struct Address {
    /// Address ID.
    pub id: String,
    /// The address itself.
    pub address: String,
    /// Address label.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub name: Option<String>,
    /// Network the address belongs to.
    #[serde(default)]
    pub network: Option<String>,
    /// Creation time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Resource name.
    #[serde(default)]
    pub resource: Option<String>,
    /// Resource path.
    #[serde(default)]
    pub resource_path: Option<String>,
}

/// Request to send funds out of an account.
#[derive(Debug, Clone, Serialize)]
pub struct SendMoneyRequest {
    /// Always "send".
    #[serde(rename = "type")]
    pub transaction_type: &'static str,
    /// Destination address or email.
    pub to: String,
    /// Amount to send.
    pub amount: Decimal,
    /// Currency of the amount.
    pub currency: String,
    /// Note attached to the transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Idempotency token; repeated requests with the same token send once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idem: Option<String>,
}

impl SendMoneyRequest {
    /// Create a new send request.
    pub fn new(to: impl Into<String>, amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            transaction_type: "send",
            to: to.into(),
            amount,
            currency: currency.into(),
            description: None,
            idem: None,
        }
    }

    /// Attach a description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set an idempotency token.
    pub fn idem(mut self, idem: impl Into<String>) -> Self {
        self.idem = Some(idem.into());
        self
    }
}

/// A transaction created on an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Transaction {
    /// Transaction ID.
    pub id: String,
    /// Transaction type (send, request, transfer, ...).
    #[serde(rename = "type")]
    pub transaction_type: String,
    /// Status (pending, completed, failed, ...).
    pub status: String,
    /// Amount in the account currency (negative for sends).
    pub amount: Money,
    /// Amount in the user's native currency.
    #[serde(default)]
    pub native_amount: Option<Money>,
    /// Description.
    #[serde(default, deserialize_with = "empty_string_as_none::deserialize")]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Network details for on-chain sends.
    #[serde(default)]
    pub network: Option<TransactionNetwork>,
    /// Resource path.
    #[serde(default)]
    pub resource_path: Option<String>,
}

/// Network details of an on-chain transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionNetwork {
    /// Network status.
    pub status: String,
    /// Network name.
    #[serde(default)]
    pub name: Option<String>,
    /// On-chain transaction hash, once broadcast.
    #[serde(default)]
    pub hash: Option<String>,
}
