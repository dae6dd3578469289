//! Credential management for Coinbase API authentication.

use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::error::CoinbaseError;

/// Default environment variable holding the API key.
pub const API_KEY_VAR: &str = "COINBASE_API_KEY";
/// Default environment variable holding the API secret.
pub const API_SECRET_VAR: &str = "COINBASE_API_SECRET";

/// API credentials containing the key and secret.
///
/// The key is sent with every request to identify the caller. The secret is
/// never transmitted; it only keys the request signature.
#[derive(Clone)]
pub struct Credentials {
    /// The API key (public identifier)
    pub api_key: String,
    /// The API secret (private, used for signing)
    api_secret: SecretString,
}

impl Credentials {
    /// Create new credentials from an API key and secret.
    ///
    /// Returns [`CoinbaseError::MissingCredentials`] if either value is empty
    /// or whitespace only.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, CoinbaseError> {
        let api_key = api_key.into();
        let api_secret = api_secret.into();

        if api_key.trim().is_empty() || api_secret.trim().is_empty() {
            return Err(CoinbaseError::MissingCredentials);
        }

        Ok(Self {
            api_key,
            api_secret: SecretString::from(api_secret),
        })
    }

    /// Get the API secret for signing.
    ///
    /// This method exposes the secret - use carefully.
    pub fn expose_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}

/// Trait for providing API credentials.
///
/// Implement this trait to customize how credentials are retrieved,
/// for example from a secrets manager.
pub trait CredentialsProvider: Send + Sync {
    /// Get the credentials.
    fn get_credentials(&self) -> &Credentials;
}

/// Static credentials provider that holds credentials directly.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Create a new static credentials provider.
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, CoinbaseError> {
        Ok(Self {
            credentials: Credentials::new(api_key, api_secret)?,
        })
    }
}

impl From<Credentials> for StaticCredentials {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl CredentialsProvider for Arc<StaticCredentials> {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

/// Credentials provider that reads from environment variables.
///
/// By default, reads from `COINBASE_API_KEY` and `COINBASE_API_SECRET`.
#[derive(Debug)]
pub struct EnvCredentials {
    credentials: Credentials,
}

impl EnvCredentials {
    /// Create credentials from default environment variables.
    pub fn from_env() -> Result<Self, CoinbaseError> {
        Self::from_env_vars(API_KEY_VAR, API_SECRET_VAR)
    }

    /// Create credentials from custom environment variable names.
    ///
    /// A missing variable is reported by name; an empty one is treated as
    /// missing credentials.
    pub fn from_env_vars(key_var: &str, secret_var: &str) -> Result<Self, CoinbaseError> {
        let api_key = std::env::var(key_var)
            .map_err(|_| CoinbaseError::Config(format!("environment variable {key_var} not set")))?;
        let api_secret = std::env::var(secret_var).map_err(|_| {
            CoinbaseError::Config(format!("environment variable {secret_var} not set"))
        })?;

        Ok(Self {
            credentials: Credentials::new(api_key, api_secret)?,
        })
    }

    /// Try to create credentials from default environment variables.
    ///
    /// Returns `None` if the variables are not set or empty.
    pub fn try_from_env() -> Option<Self> {
        Self::from_env().ok()
    }
}

impl CredentialsProvider for EnvCredentials {
    fn get_credentials(&self) -> &Credentials {
        &self.credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacted() {
        let creds = Credentials::new("my_key", "super_secret").unwrap();
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("my_key"));
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_static_credentials() {
        let provider = StaticCredentials::new("key", "secret").unwrap();
        let creds = provider.get_credentials();
        assert_eq!(creds.api_key, "key");
        assert_eq!(creds.expose_secret(), "secret");
    }

    #[test]
    fn test_empty_credentials_rejected() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(CoinbaseError::MissingCredentials)
        ));
        assert!(matches!(
            Credentials::new("key", "   "),
            Err(CoinbaseError::MissingCredentials)
        ));
    }

    #[test]
    fn test_env_credentials_missing_var() {
        let result = EnvCredentials::from_env_vars(
            "COINBASE_TEST_UNSET_KEY_VAR",
            "COINBASE_TEST_UNSET_SECRET_VAR",
        );
        match result {
            Err(CoinbaseError::Config(msg)) => assert!(msg.contains("COINBASE_TEST_UNSET_KEY_VAR")),
            other => panic!("expected config error, got {other:?}"),
        }
    }
}
