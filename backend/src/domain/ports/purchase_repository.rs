//! Port for the purchase ledger.
//!
//! Adapters must enforce uniqueness of `(user, item)` in storage and report a
//! violation as [`PurchaseRepositoryError::DuplicatePurchase`], never as a
//! generic query failure.

use async_trait::async_trait;

use crate::domain::{Album, ItemKind, ItemRef, Purchase, Song, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by purchase repository adapters.
    pub enum PurchaseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "purchase repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "purchase repository query failed: {message}",
        /// A purchase for the same user and item already exists.
        DuplicatePurchase { item: String } => "purchase already recorded for {item}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Existing purchase for the pair in any payment state.
    async fn find(
        &self,
        user_id: &UserId,
        item: &ItemRef,
    ) -> Result<Option<Purchase>, PurchaseRepositoryError>;

    /// Record a new purchase.
    async fn insert(&self, purchase: &Purchase) -> Result<(), PurchaseRepositoryError>;

    /// Whether the user holds a completed purchase of `item`.
    async fn is_owned(&self, user_id: &UserId, item: &ItemRef)
    -> Result<bool, PurchaseRepositoryError>;

    /// Purchase history, newest first, optionally restricted to one kind.
    async fn list_for_user(
        &self,
        user_id: &UserId,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Purchase>, PurchaseRepositoryError>;

    /// Songs covered by a completed purchase.
    async fn owned_songs(&self, user_id: &UserId) -> Result<Vec<Song>, PurchaseRepositoryError>;

    /// Albums covered by a completed purchase.
    async fn owned_albums(&self, user_id: &UserId) -> Result<Vec<Album>, PurchaseRepositoryError>;
}
