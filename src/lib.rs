//! # Coinbase Client
//!
//! An async Rust client library for a subset of the Coinbase v2 REST API.
//!
//! ## Features
//!
//! - HMAC-SHA256 signing of every request
//! - Account listing, deposit address creation, sends and exchange rates
//! - An account session that loads the BTC, ETH and LTC wallets once and
//!   gates wallet operations until they are available
//! - RSA-SHA256 verification of inbound payment notifications
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coinbase_api_client::rest::CoinbaseRestClient;
//! use coinbase_api_client::session::AccountSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CoinbaseRestClient::new("api_key", "api_secret")?;
//!     let session = AccountSession::new(client);
//!     session.initialize().await?;
//!
//!     let rate = session.exchange_rate("BTC", "EUR").await?;
//!     println!("1 BTC = {rate} EUR");
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod notifications;
pub mod rest;
pub mod session;
pub mod types;

// Re-export commonly used types at crate root
pub use error::CoinbaseError;
pub use notifications::NotificationVerifier;
pub use rest::CoinbaseRestClient;
pub use session::{AccountSession, SessionState};
pub use types::common::SupportedCurrency;

/// Result type alias using CoinbaseError
pub type Result<T> = std::result::Result<T, CoinbaseError>;
