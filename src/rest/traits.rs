//! Trait definition for the Coinbase REST API client.
//!
//! The [`CoinbaseApi`] trait abstracts the REST operations the account
//! session depends on, so the session can run against a mock in tests.

use std::future::Future;

use crate::error::CoinbaseError;
use crate::rest::CoinbaseRestClient;
use crate::rest::data::ExchangeRates;
use crate::rest::wallet::{Account, Address, CreateAddressRequest, SendMoneyRequest, Transaction};

/// Trait defining the Coinbase REST API operations.
///
/// All methods are async and return `Result<T, CoinbaseError>`.
pub trait CoinbaseApi: Send + Sync {
    /// List all accounts.
    fn list_accounts(&self) -> impl Future<Output = Result<Vec<Account>, CoinbaseError>> + Send;

    /// Show a single account.
    fn get_account(
        &self,
        account_id: &str,
    ) -> impl Future<Output = Result<Account, CoinbaseError>> + Send;

    /// Create a receive address on an account.
    fn create_address(
        &self,
        account_id: &str,
        request: &CreateAddressRequest,
    ) -> impl Future<Output = Result<Address, CoinbaseError>> + Send;

    /// Send funds from an account.
    fn send_money(
        &self,
        account_id: &str,
        request: &SendMoneyRequest,
    ) -> impl Future<Output = Result<Transaction, CoinbaseError>> + Send;

    /// Get exchange rates for a base currency.
    fn get_exchange_rates(
        &self,
        currency: &str,
    ) -> impl Future<Output = Result<ExchangeRates, CoinbaseError>> + Send;
}

impl CoinbaseApi for CoinbaseRestClient {
    async fn list_accounts(&self) -> Result<Vec<Account>, CoinbaseError> {
        CoinbaseRestClient::list_accounts(self).await
    }

    async fn get_account(&self, account_id: &str) -> Result<Account, CoinbaseError> {
        CoinbaseRestClient::get_account(self, account_id).await
    }

    async fn create_address(
        &self,
        account_id: &str,
        request: &CreateAddressRequest,
    ) -> Result<Address, CoinbaseError> {
        CoinbaseRestClient::create_address(self, account_id, request).await
    }

    async fn send_money(
        &self,
        account_id: &str,
        request: &SendMoneyRequest,
    ) -> Result<Transaction, CoinbaseError> {
        CoinbaseRestClient::send_money(self, account_id, request).await
    }

    async fn get_exchange_rates(&self, currency: &str) -> Result<ExchangeRates, CoinbaseError> {
        CoinbaseRestClient::get_exchange_rates(self, currency).await
    }
}
