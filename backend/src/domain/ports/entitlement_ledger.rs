//! Driving port for purchases and ownership queries.

use async_trait::async_trait;

use crate::domain::{
    Album, Caller, Error, ItemKind, ItemRef, Purchase, PurchaseRequest, Song, UserId,
};

#[async_trait]
pub trait EntitlementLedger: Send + Sync {
    /// Buy an item for the caller.
    ///
    /// Fails `forbidden` when the request names another user, `not_found`
    /// when the item is missing, and `already_owned` when a purchase already
    /// exists. A repeated call never records a second purchase.
    async fn purchase_item(
        &self,
        caller: &Caller,
        request: PurchaseRequest,
    ) -> Result<Purchase, Error>;

    /// Songs the user owns. Only the user may list them.
    async fn owned_songs(&self, caller: &Caller, user_id: &UserId) -> Result<Vec<Song>, Error>;

    /// Albums the user owns. Only the user may list them.
    async fn owned_albums(&self, caller: &Caller, user_id: &UserId)
    -> Result<Vec<Album>, Error>;

    /// Purchase history of the user. Only the user may list it.
    async fn purchase_history(
        &self,
        caller: &Caller,
        user_id: &UserId,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Purchase>, Error>;

    /// Whether `user_id` holds a completed purchase of `item`.
    async fn is_owned(&self, user_id: &UserId, item: &ItemRef) -> Result<bool, Error>;
}
