//! Purchases and the entitlements they grant.
//!
//! A purchase snapshots the item's list price at the moment it is recorded;
//! later catalogue price changes never touch existing purchases.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{ItemRef, UserId};

/// Currency recorded on purchases and tips.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// Settlement state of a purchase or tip.
///
/// `Pending` may move to `Completed`; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    Pending,
    Completed,
}

impl PaymentStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a stored payment status is unrecognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown payment status: {0}")]
pub struct ParsePaymentStatusError(pub String);

impl FromStr for PaymentStatus {
    type Err = ParsePaymentStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(ParsePaymentStatusError(other.to_owned())),
        }
    }
}

/// Request to buy a song or album on behalf of `user_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub user_id: UserId,
    pub item: ItemRef,
    /// Opaque reference supplied by the payment provider.
    pub payment_reference: Option<String>,
}

/// Recorded purchase of a catalogue item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purchase {
    pub id: Uuid,
    pub user_id: UserId,
    pub item: ItemRef,
    pub price: i64,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub transaction_reference: Option<String>,
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    /// Build a settled purchase capturing `price` as paid.
    pub fn completed(request: PurchaseRequest, price: i64, purchased_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            item: request.item,
            price,
            currency: DEFAULT_CURRENCY.to_owned(),
            payment_status: PaymentStatus::Completed,
            transaction_reference: request.payment_reference,
            purchased_at,
        }
    }

    /// Whether this purchase grants access to the item.
    pub fn grants_entitlement(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn completed_purchase_snapshots_price_and_reference() {
        let user_id = UserId::random();
        let song_id = Uuid::new_v4();
        let at = Utc
            .with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let purchase = Purchase::completed(
            PurchaseRequest {
                user_id: user_id.clone(),
                item: ItemRef::song(song_id),
                payment_reference: Some("pay_123".to_owned()),
            },
            100,
            at,
        );

        assert_eq!(purchase.user_id, user_id);
        assert_eq!(purchase.price, 100);
        assert_eq!(purchase.currency, "NGN");
        assert_eq!(purchase.transaction_reference.as_deref(), Some("pay_123"));
        assert!(purchase.grants_entitlement());
    }

    #[rstest]
    #[case("pending", PaymentStatus::Pending)]
    #[case("completed", PaymentStatus::Completed)]
    fn payment_status_parses(#[case] raw: &str, #[case] expected: PaymentStatus) {
        assert_eq!(raw.parse::<PaymentStatus>().expect("known"), expected);
    }

    #[rstest]
    fn unknown_payment_status_is_rejected() {
        assert!("refunded".parse::<PaymentStatus>().is_err());
    }
}
