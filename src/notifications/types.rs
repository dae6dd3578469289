//! Notification payload types.

use std::str::FromStr;

use serde::Deserialize;
use time::OffsetDateTime;

/// A reference to another API resource.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceRef {
    /// Resource ID.
    pub id: String,
    /// Resource name (e.g., "account", "user").
    #[serde(default)]
    pub resource: Option<String>,
    /// Resource path.
    #[serde(default)]
    pub resource_path: Option<String>,
}

/// An inbound notification delivered by Coinbase.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    /// Notification ID.
    pub id: String,
    /// Event type string, e.g. "wallet:addresses:new-payment".
    #[serde(rename = "type")]
    pub notification_type: String,
    /// The resource the event is about.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Event-specific extras (amounts, transaction refs).
    #[serde(default)]
    pub additional_data: serde_json::Value,
    /// Account the event belongs to.
    #[serde(default)]
    pub account: Option<ResourceRef>,
    /// User the event belongs to.
    #[serde(default)]
    pub user: Option<ResourceRef>,
    /// How many times delivery was attempted before this one.
    #[serde(default)]
    pub delivery_attempts: u32,
    /// Creation time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_at: Option<OffsetDateTime>,
    /// Resource name, always "notification".
    #[serde(default)]
    pub resource: Option<String>,
    /// Resource path.
    #[serde(default)]
    pub resource_path: Option<String>,
}

impl Notification {
    /// The parsed event type.
    pub fn kind(&self) -> NotificationType {
        // Parsing is infallible; unknown strings map to `Other`.
        NotificationType::from_str(&self.notification_type)
            .unwrap_or_else(|never| match never {})
    }
}

/// Known notification event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    /// Delivery test.
    Ping,
    /// Funds arrived on a receive address.
    NewPayment,
    /// A buy was created.
    BuyCreated,
    /// A buy completed.
    BuyCompleted,
    /// A buy was canceled.
    BuyCanceled,
    /// A sell was created.
    SellCreated,
    /// A sell completed.
    SellCompleted,
    /// A sell was canceled.
    SellCanceled,
    /// A fiat deposit completed.
    DepositCompleted,
    /// A fiat deposit was canceled.
    DepositCanceled,
    /// A fiat withdrawal completed.
    WithdrawalCompleted,
    /// A fiat withdrawal was canceled.
    WithdrawalCanceled,
    /// A merchant order was paid.
    OrderPaid,
    /// A merchant order was paid with the wrong amount.
    OrderMispaid,
    /// A merchant order expired.
    OrderExpired,
    /// Any type this crate does not know about.
    Other(String),
}

impl NotificationType {
    /// The wire string for this type.
    pub fn as_str(&self) -> &str {
        match self {
            NotificationType::Ping => "ping",
            NotificationType::NewPayment => "wallet:addresses:new-payment",
            NotificationType::BuyCreated => "wallet:buys:created",
            NotificationType::BuyCompleted => "wallet:buys:completed",
            NotificationType::BuyCanceled => "wallet:buys:canceled",
            NotificationType::SellCreated => "wallet:sells:created",
            NotificationType::SellCompleted => "wallet:sells:completed",
            NotificationType::SellCanceled => "wallet:sells:canceled",
            NotificationType::DepositCompleted => "wallet:deposit:completed",
            NotificationType::DepositCanceled => "wallet:deposit:canceled",
            NotificationType::WithdrawalCompleted => "wallet:withdrawal:completed",
            NotificationType::WithdrawalCanceled => "wallet:withdrawal:canceled",
            NotificationType::OrderPaid => "wallet:orders:paid",
            NotificationType::OrderMispaid => "wallet:orders:mispaid",
            NotificationType::OrderExpired => "wallet:orders:expired",
            NotificationType::Other(s) => s,
        }
    }
}

impl FromStr for NotificationType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "ping" => NotificationType::Ping,
            "wallet:addresses:new-payment" => NotificationType::NewPayment,
            "wallet:buys:created" => NotificationType::BuyCreated,
            "wallet:buys:completed" => NotificationType::BuyCompleted,
            "wallet:buys:canceled" => NotificationType::BuyCanceled,
            "wallet:sells:created" => NotificationType::SellCreated,
            "wallet:sells:completed" => NotificationType::SellCompleted,
            "wallet:sells:canceled" => NotificationType::SellCanceled,
            "wallet:deposit:completed" => NotificationType::DepositCompleted,
            "wallet:deposit:canceled" => NotificationType::DepositCanceled,
            "wallet:withdrawal:completed" => NotificationType::WithdrawalCompleted,
            "wallet:withdrawal:canceled" => NotificationType::WithdrawalCanceled,
            "wallet:orders:paid" => NotificationType::OrderPaid,
            "wallet:orders:mispaid" => NotificationType::OrderMispaid,
            "wallet:orders:expired" => NotificationType::OrderExpired,
            other => NotificationType::Other(other.to_string()),
        })
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_round_trip_known() {
        let kind: NotificationType = "wallet:orders:paid".parse().unwrap();
        assert_eq!(kind, NotificationType::OrderPaid);
        assert_eq!(kind.to_string(), "wallet:orders:paid");
    }

    #[test]
    fn test_notification_type_unknown_is_preserved() {
        let kind: NotificationType = "wallet:something:new".parse().unwrap();
        assert_eq!(kind, NotificationType::Other("wallet:something:new".to_string()));
        assert_eq!(kind.as_str(), "wallet:something:new");
    }

    #[test]
    fn test_notification_deserialization() {
        let json = include_str!("../../tests/fixtures/notification.json");
        let notification: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(notification.kind(), NotificationType::NewPayment);
        assert_eq!(
            notification.account.as_ref().map(|a| a.id.as_str()),
            Some("8d5f086c-d7d5-58ee-890e-c09b3d8d4434")
        );
        assert_eq!(notification.additional_data["amount"]["currency"], "BTC");
        assert_eq!(notification.delivery_attempts, 0);
    }
}
