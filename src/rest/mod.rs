//! Coinbase v2 REST API client.
//!
//! # Trait-based API
//!
//! The [`CoinbaseApi`] trait abstracts the REST operations, enabling mock
//! implementations for testing code that depends on the client.
//!
//! ```rust,ignore
//! use coinbase_api_client::rest::{CoinbaseApi, CoinbaseRestClient};
//!
//! async fn total_btc<C: CoinbaseApi>(client: &C) -> Result<(), coinbase_api_client::CoinbaseError> {
//!     for account in client.list_accounts().await? {
//!         println!("{} {}", account.balance.amount, account.currency);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
pub mod data;
mod endpoints;
mod traits;
pub mod wallet;

pub use client::{CoinbaseRestClient, CoinbaseRestClientBuilder};
pub use endpoints::*;
pub use traits::CoinbaseApi;
