//! Driving port for tips and royalty settlement.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, Error, MonthlyRoyalty, RoyaltyPeriod, Tip, TipRequest, UserId};

/// Default number of tips returned by list operations.
pub const DEFAULT_TIP_LIMIT: u32 = 20;
/// Largest accepted tip list limit.
pub const MAX_TIP_LIMIT: u32 = 100;

#[async_trait]
pub trait RoyaltyLedger: Send + Sync {
    /// Record a tip from the caller to an artist.
    ///
    /// Fails `invalid_amount` for amounts at or below zero and `not_found`
    /// when the sender or the artist does not exist.
    async fn send_tip(&self, caller: &Caller, request: TipRequest) -> Result<Tip, Error>;

    /// Tips received by an artist; visible to the artist's user and admins.
    async fn artist_tips(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<Tip>, Error>;

    /// Tips sent by a user; visible to that user only.
    async fn sent_tips(
        &self,
        caller: &Caller,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Tip>, Error>;

    /// Add `amount` to the artist's royalty row for `period` (admin only).
    async fn accrue_royalty(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
        amount: i64,
    ) -> Result<MonthlyRoyalty, Error>;

    /// Settle a royalty row (admin only).
    ///
    /// Fails `already_paid` when the row is settled and `not_found` when no
    /// row exists for the period.
    async fn mark_paid(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<MonthlyRoyalty, Error>;

    /// Sum of all unpaid royalty amounts (admin only).
    async fn pending_total(&self, caller: &Caller) -> Result<i64, Error>;

    /// Royalty rows for an artist, newest period first.
    async fn artist_royalties(
        &self,
        caller: &Caller,
        artist_id: &Uuid,
    ) -> Result<Vec<MonthlyRoyalty>, Error>;
}
