//! Ports for tip records and monthly royalty rows.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{MonthlyRoyalty, RoyaltyPeriod, Tip, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tip and royalty repository adapters.
    pub enum RoyaltyRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "royalty repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "royalty repository query failed: {message}",
        /// The period row is already settled and accepts no further accruals.
        PeriodPaid { period: String } => "royalty for {period} has already been paid",
        /// A row or the unpaid total would leave the `i64` range.
        AmountOverflow => "royalty amount exceeds the representable range",
    }
}

/// Append-only tip storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TipRepository: Send + Sync {
    async fn insert(&self, tip: &Tip) -> Result<(), RoyaltyRepositoryError>;

    /// Tips received by an artist, newest first.
    async fn list_for_artist(
        &self,
        artist_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<Tip>, RoyaltyRepositoryError>;

    /// Tips sent by a user, newest first.
    async fn list_for_sender(
        &self,
        sender_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Tip>, RoyaltyRepositoryError>;
}

/// Monthly royalty storage, unique per (artist, year, month).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoyaltyRepository: Send + Sync {
    /// Add `amount` to the period row, creating it unpaid when absent.
    ///
    /// Must be a single atomic upsert so concurrent accruals sum correctly.
    /// Fails with [`RoyaltyRepositoryError::PeriodPaid`] when the row is
    /// already paid and with [`RoyaltyRepositoryError::AmountOverflow`] when
    /// the sum leaves the `i64` range; neither failure changes the row.
    async fn accrue(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
        amount: i64,
    ) -> Result<MonthlyRoyalty, RoyaltyRepositoryError>;

    /// Flip an unpaid row to paid.
    ///
    /// Returns `None` when no unpaid row matched, either because the row is
    /// absent or because it is already paid.
    async fn mark_paid(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<Option<MonthlyRoyalty>, RoyaltyRepositoryError>;

    async fn find(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<Option<MonthlyRoyalty>, RoyaltyRepositoryError>;

    /// Rows for an artist, most recent period first.
    async fn list_for_artist(
        &self,
        artist_id: &Uuid,
    ) -> Result<Vec<MonthlyRoyalty>, RoyaltyRepositoryError>;

    /// Sum of amounts over all unpaid rows; zero when there are none.
    ///
    /// Fails with [`RoyaltyRepositoryError::AmountOverflow`] rather than
    /// wrapping when the total leaves the `i64` range.
    async fn pending_total(&self) -> Result<i64, RoyaltyRepositoryError>;
}
