//! Wallet REST API endpoints (accounts, addresses, transactions).
//!
//! All calls are signed with the client's credentials.

mod types;

pub use types::*;

use std::collections::HashSet;

use tracing::debug;

use crate::error::CoinbaseError;
use crate::rest::CoinbaseRestClient;
use crate::rest::endpoints::{ACCOUNTS_PAGE_LIMIT, API_PREFIX, wallet};

impl CoinbaseRestClient {
    /// List every account visible to the API key.
    ///
    /// Follows `pagination.next_uri` until the last page, so the result holds
    /// all accounts rather than the first page.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_api_client::rest::CoinbaseRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinbaseRestClient::new("key", "secret")?;
    ///
    ///     for account in client.list_accounts().await? {
    ///         println!("{}: {} {}", account.name, account.balance.amount, account.currency);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn list_accounts(&self) -> Result<Vec<Account>, CoinbaseError> {
        let mut accounts = Vec::new();
        let mut request_path = format!("{}?limit={}", wallet::ACCOUNTS, ACCOUNTS_PAGE_LIMIT);
        let mut visited = HashSet::new();

        loop {
            let page = self.signed_get::<Vec<Account>>(&request_path).await?;
            accounts.extend(page.data);
            visited.insert(request_path);

            let Some(next) = page.pagination.and_then(|p| p.next_uri) else {
                break;
            };
            if !next.starts_with(API_PREFIX) {
                return Err(CoinbaseError::InvalidResponse(format!(
                    "unexpected pagination next_uri {next:?}"
                )));
            }
            if visited.contains(&next) {
                return Err(CoinbaseError::InvalidResponse(format!(
                    "account pagination revisits {next:?}"
                )));
            }
            debug!(next = %next, fetched = accounts.len(), "following account pagination");
            request_path = next;
        }

        Ok(accounts)
    }

    /// Show a single account.
    pub async fn get_account(&self, account_id: &str) -> Result<Account, CoinbaseError> {
        require_id(account_id)?;
        let envelope = self.signed_get(&wallet::account(account_id)).await?;
        Ok(envelope.data)
    }

    /// Create a new receive address on an account.
    pub async fn create_address(
        &self,
        account_id: &str,
        request: &CreateAddressRequest,
    ) -> Result<Address, CoinbaseError> {
        require_id(account_id)?;
        let envelope = self
            .signed_post(&wallet::account_addresses(account_id), request)
            .await?;
        Ok(envelope.data)
    }

    /// Send funds from an account to an address or email.
    pub async fn send_money(
        &self,
        account_id: &str,
        request: &SendMoneyRequest,
    ) -> Result<Transaction, CoinbaseError> {
        require_id(account_id)?;
        if request.to.trim().is_empty() {
            return Err(CoinbaseError::Validation(
                "destination address is required".to_string(),
            ));
        }
        if request.amount.is_sign_negative() || request.amount.is_zero() {
            return Err(CoinbaseError::Validation(format!(
                "amount must be positive, got {}",
                request.amount
            )));
        }
        let envelope = self
            .signed_post(&wallet::account_transactions(account_id), request)
            .await?;
        Ok(envelope.data)
    }
}

/// Account ids are spliced into the signed path, so only URL-safe
/// characters are accepted.
fn require_id(account_id: &str) -> Result<(), CoinbaseError> {
    let url_safe = account_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    let dots_only = account_id.chars().all(|c| c == '.');
    if account_id.is_empty() || !url_safe || dots_only {
        return Err(CoinbaseError::Validation(format!(
            "invalid account id {account_id:?}"
        )));
    }
    Ok(())
}
