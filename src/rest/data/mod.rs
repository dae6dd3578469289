//! Data REST API endpoints (exchange rates).

mod types;

pub use types::*;

use crate::error::CoinbaseError;
use crate::rest::CoinbaseRestClient;
use crate::rest::endpoints::data;

impl CoinbaseRestClient {
    /// Get exchange rates quoted against a base currency.
    pub async fn get_exchange_rates(&self, currency: &str) -> Result<ExchangeRates, CoinbaseError> {
        if currency.trim().is_empty() {
            return Err(CoinbaseError::Validation(
                "base currency is required".to_string(),
            ));
        }
        let request = ExchangeRatesRequest::new(currency.trim().to_ascii_uppercase());
        let envelope = self
            .signed_get_with_params(data::EXCHANGE_RATES, &request)
            .await?;
        Ok(envelope.data)
    }

    /// Get the spot rate between two currencies.
    ///
    /// Returns the number of `to` units per one `from` unit.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use coinbase_api_client::rest::CoinbaseRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = CoinbaseRestClient::new("key", "secret")?;
    ///     let eur_per_btc = client.get_exchange_rate("BTC", "EUR").await?;
    ///     println!("{eur_per_btc}");
    ///     Ok(())
    /// }
    /// ```
    pub async fn get_exchange_rate(&self, from: &str, to: &str) -> Result<f64, CoinbaseError> {
        if to.trim().is_empty() {
            return Err(CoinbaseError::Validation(
                "quote currency is required".to_string(),
            ));
        }
        let rates = self.get_exchange_rates(from).await?;
        rates.rate_f64(to.trim())
    }
}
