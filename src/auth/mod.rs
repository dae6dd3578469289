//! Authentication module for Coinbase API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Per-request timestamps
//! - HMAC-SHA256 signature generation for authenticated requests

mod credentials;
mod signature;
mod timestamp;

pub use credentials::{
    API_KEY_VAR, API_SECRET_VAR, Credentials, CredentialsProvider, EnvCredentials,
    StaticCredentials,
};
pub use signature::{
    ACCESS_KEY_HEADER, ACCESS_SIGN_HEADER, ACCESS_TIMESTAMP_HEADER, RequestSignature,
    VERSION_HEADER, canonical_message, compute_signature, sign_request,
};
pub use timestamp::{SystemTimestamp, TimestampProvider};
