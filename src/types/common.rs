//! Common domain types for the Coinbase client.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoinbaseError;

/// Currencies the account session keeps a wallet for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SupportedCurrency {
    /// Bitcoin
    Btc,
    /// Ethereum
    Eth,
    /// Litecoin
    Ltc,
}

impl SupportedCurrency {
    /// Every supported currency, in wallet order.
    pub const ALL: [SupportedCurrency; 3] = [Self::Btc, Self::Eth, Self::Ltc];

    /// The upstream currency code.
    pub fn code(&self) -> &'static str {
        match self {
            SupportedCurrency::Btc => "BTC",
            SupportedCurrency::Eth => "ETH",
            SupportedCurrency::Ltc => "LTC",
        }
    }
}

impl std::fmt::Display for SupportedCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for SupportedCurrency {
    type Err = CoinbaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                CoinbaseError::Validation(format!(
                    "unsupported currency {s:?}, expected one of BTC, ETH, LTC"
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_currency() {
        assert_eq!("BTC".parse::<SupportedCurrency>().unwrap(), SupportedCurrency::Btc);
        assert_eq!("eth".parse::<SupportedCurrency>().unwrap(), SupportedCurrency::Eth);
        assert_eq!(" LTC ".parse::<SupportedCurrency>().unwrap(), SupportedCurrency::Ltc);
    }

    #[test]
    fn test_parse_unsupported_currency() {
        for input in ["XRP", "", "BTCX", "USD"] {
            assert!(matches!(
                input.parse::<SupportedCurrency>(),
                Err(CoinbaseError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_display_matches_code() {
        assert_eq!(SupportedCurrency::Ltc.to_string(), "LTC");
    }
}
