//! Types for data REST API endpoints.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoinbaseError;

/// Request for exchange rates.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeRatesRequest {
    /// Base currency (e.g., "BTC").
    pub currency: String,
}

impl ExchangeRatesRequest {
    /// Create a request for rates quoted against `currency`.
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }
}

/// Exchange rates for a base currency.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeRates {
    /// Base currency.
    pub currency: String,
    /// Units of each quote currency per one unit of the base currency.
    pub rates: HashMap<String, Decimal>,
}

impl ExchangeRates {
    /// Look up the rate for a quote currency, case-insensitively.
    pub fn rate(&self, quote: &str) -> Option<Decimal> {
        self.rates
            .get(quote)
            .or_else(|| self.rates.get(&quote.to_ascii_uppercase()))
            .copied()
    }

    /// The rate for a quote currency as a positive `f64`.
    ///
    /// A missing quote or a non-positive rate is an invalid response.
    pub fn rate_f64(&self, quote: &str) -> Result<f64, CoinbaseError> {
        let rate = self.rate(quote).ok_or_else(|| {
            CoinbaseError::InvalidResponse(format!("no {} rate for {}", quote, self.currency))
        })?;

        // Parsing the decimal text keeps the nearest f64 to the quoted value.
        match rate.to_string().parse::<f64>() {
            Ok(value) if value > 0.0 => Ok(value),
            _ => Err(CoinbaseError::InvalidResponse(format!(
                "non-positive {} rate for {}: {}",
                quote, self.currency, rate
            ))),
        }
    }
}
