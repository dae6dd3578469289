//! HMAC-SHA256 request signing for Coinbase API authentication.
//!
//! Coinbase API-key requests carry a signature computed as:
//! ```text
//! hex(HMAC-SHA256(timestamp + METHOD + request_path + body, api_secret))
//! ```
//!
//! `request_path` includes the query string, and `body` must be the exact
//! bytes sent on the wire (empty for requests without a body).

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::auth::{Credentials, TimestampProvider};

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key.
pub const ACCESS_KEY_HEADER: &str = "CB-ACCESS-KEY";
/// Header carrying the hex signature.
pub const ACCESS_SIGN_HEADER: &str = "CB-ACCESS-SIGN";
/// Header carrying the Unix timestamp (seconds) used in the signature.
pub const ACCESS_TIMESTAMP_HEADER: &str = "CB-ACCESS-TIMESTAMP";
/// Header carrying the date-stamped API version.
pub const VERSION_HEADER: &str = "CB-VERSION";

/// The timestamp and signature produced for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    /// Unix time in seconds captured at signing time.
    pub timestamp: i64,
    /// Lowercase hex HMAC-SHA256 digest.
    pub signature: String,
}

/// Build the canonical message covered by the signature.
pub fn canonical_message(timestamp: i64, method: &str, request_path: &str, body: &str) -> String {
    format!(
        "{}{}{}{}",
        timestamp,
        method.to_ascii_uppercase(),
        request_path,
        body
    )
}

/// Compute the signature for an explicit timestamp.
pub fn compute_signature(
    secret: &str,
    timestamp: i64,
    method: &str,
    request_path: &str,
    body: &str,
) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(canonical_message(timestamp, method, request_path, body).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Sign a request with a freshly captured timestamp.
///
/// # Example
///
/// ```rust
/// use coinbase_api_client::auth::{Credentials, SystemTimestamp, sign_request};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "api_secret")?;
/// let signed = sign_request(&credentials, &SystemTimestamp, "GET", "/v2/accounts", "");
/// assert_eq!(signed.signature.len(), 64);
/// # Ok(())
/// # }
/// ```
pub fn sign_request(
    credentials: &Credentials,
    timestamps: &dyn TimestampProvider,
    method: &str,
    request_path: &str,
    body: &str,
) -> RequestSignature {
    let timestamp = timestamps.now();
    let signature = compute_signature(
        credentials.expose_secret(),
        timestamp,
        method,
        request_path,
        body,
    );
    RequestSignature {
        timestamp,
        signature,
    }
}
