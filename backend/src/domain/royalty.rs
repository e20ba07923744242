//! Tips and monthly royalty accrual.
//!
//! Tips are append-only transfers from a listener to an artist. Royalties
//! accumulate into one row per (artist, year, month) and are settled by a
//! one-way paid flag.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{DEFAULT_CURRENCY, Error, PaymentStatus, UserId};

/// Maximum length of a tip message.
pub const TIP_MESSAGE_MAX: usize = 500;

/// Request to tip an artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRequest {
    pub sender_id: UserId,
    pub artist_id: Uuid,
    pub amount: i64,
    pub message: Option<String>,
    pub payment_reference: Option<String>,
}

impl TipRequest {
    /// Check the amount and message before any lookup happens.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= 0 {
            return Err(Error::invalid_amount("tip amount must be greater than zero"));
        }
        if self
            .message
            .as_ref()
            .is_some_and(|message| message.chars().count() > TIP_MESSAGE_MAX)
        {
            return Err(Error::invalid_request(format!(
                "message must be at most {TIP_MESSAGE_MAX} characters"
            )));
        }
        Ok(())
    }
}

/// Recorded tip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tip {
    pub id: Uuid,
    pub sender_id: UserId,
    pub artist_id: Uuid,
    /// Always greater than zero.
    pub amount: i64,
    pub currency: String,
    pub message: Option<String>,
    pub payment_status: PaymentStatus,
    pub transaction_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Tip {
    /// Build a settled tip from a validated request.
    pub fn completed(request: TipRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id: request.sender_id,
            artist_id: request.artist_id,
            amount: request.amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            message: request.message.filter(|message| !message.trim().is_empty()),
            payment_status: PaymentStatus::Completed,
            transaction_reference: request.payment_reference,
            created_at,
        }
    }
}

/// Calendar month a royalty row accrues into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoyaltyPeriod {
    year: i32,
    month: i32,
}

impl RoyaltyPeriod {
    /// Validate a period; `month` is 1-based.
    pub fn new(year: i32, month: i32) -> Result<Self, Error> {
        if !(1970..=9999).contains(&year) {
            return Err(Error::invalid_request("year must be between 1970 and 9999"));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::invalid_request("month must be between 1 and 12"));
        }
        Ok(Self { year, month })
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> i32 {
        self.month
    }
}

impl std::fmt::Display for RoyaltyPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Accrued royalty for one artist and period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyRoyalty {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub period: RoyaltyPeriod,
    pub amount: i64,
    pub currency: String,
    pub paid: bool,
}

/// Check an accrual amount. Zero is accepted; negative values are not.
pub fn validate_accrual_amount(amount: i64) -> Result<(), Error> {
    if amount < 0 {
        return Err(Error::invalid_amount("royalty amount must not be negative"));
    }
    Ok(())
}
