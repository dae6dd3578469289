//! Inbound notification verification.
//!
//! Notifications bypass the account session entirely: the host application
//! hands the raw request body and the `CB-SIGNATURE` header value to a
//! [`NotificationVerifier`] and gets a trust decision back.

mod types;
mod verifier;

pub use types::{Notification, NotificationType, ResourceRef};
pub use verifier::{NotificationVerifier, SIGNATURE_HEADER};
