//! Coinbase REST API endpoint constants.

/// Base URL for the Coinbase REST API.
pub const COINBASE_BASE_URL: &str = "https://api.coinbase.com";

/// Path prefix shared by every v2 endpoint.
pub const API_PREFIX: &str = "/v2";

/// Version tag sent in the `CB-VERSION` header unless overridden.
pub const DEFAULT_API_VERSION: &str = "2016-02-18";

/// Page size requested when listing accounts.
pub const ACCOUNTS_PAGE_LIMIT: u32 = 100;

/// Wallet endpoints (account-scoped, authentication required).
pub mod wallet {
    /// List accounts.
    pub const ACCOUNTS: &str = "/v2/accounts";

    /// Show a single account.
    pub fn account(account_id: &str) -> String {
        format!("{ACCOUNTS}/{account_id}")
    }

    /// Create or list addresses for an account.
    pub fn account_addresses(account_id: &str) -> String {
        format!("{ACCOUNTS}/{account_id}/addresses")
    }

    /// Create or list transactions for an account.
    pub fn account_transactions(account_id: &str) -> String {
        format!("{ACCOUNTS}/{account_id}/transactions")
    }
}

/// Data endpoints.
pub mod data {
    /// Get exchange rates for a base currency.
    pub const EXCHANGE_RATES: &str = "/v2/exchange-rates";
}
