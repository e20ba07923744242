//! Entitlement ledger service.
//!
//! Purchases are at-most-once per (user, item). The pre-insert lookup is only
//! a fast path; the storage uniqueness constraint is authoritative and its
//! violation is reported as `already_owned`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::authorization::resolve_item;
use crate::domain::ports::{
    CatalogueRepository, EntitlementLedger, PurchaseRepository, PurchaseRepositoryError,
};
use crate::domain::{
    Album, Caller, Error, ItemKind, ItemRef, Purchase, PurchaseRequest, Song, UserId, require_self,
};

fn map_purchase_error(error: PurchaseRepositoryError) -> Error {
    match error {
        PurchaseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("purchase ledger unavailable: {message}"))
        }
        PurchaseRepositoryError::Query { message } => {
            Error::internal(format!("purchase ledger error: {message}"))
        }
        PurchaseRepositoryError::DuplicatePurchase { item } => {
            Error::already_owned(format!("{item} has already been purchased"))
        }
    }
}

fn already_owned(item: &ItemRef) -> Error {
    Error::already_owned(format!("{} has already been purchased", item.kind)).with_details(json!({
        "itemKind": item.kind.as_str(),
        "itemId": item.id,
    }))
}

/// Purchase recording and ownership queries.
pub struct EntitlementService<C, P> {
    catalogue: Arc<C>,
    purchases: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> EntitlementService<C, P> {
    pub fn new(catalogue: Arc<C>, purchases: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalogue,
            purchases,
            clock,
        }
    }
}

#[async_trait]
impl<C, P> EntitlementLedger for EntitlementService<C, P>
where
    C: CatalogueRepository,
    P: PurchaseRepository,
{
    async fn purchase_item(
        &self,
        caller: &Caller,
        request: PurchaseRequest,
    ) -> Result<Purchase, Error> {
        require_self(caller, &request.user_id)?;
        let item = resolve_item(self.catalogue.as_ref(), &request.item).await?;

        if self
            .purchases
            .find(&request.user_id, &request.item)
            .await
            .map_err(map_purchase_error)?
            .is_some()
        {
            return Err(already_owned(&request.item));
        }

        let target = request.item;
        let purchase = Purchase::completed(request, item.price(), self.clock.utc());
        match self.purchases.insert(&purchase).await {
            Ok(()) => {
                info!(
                    purchase_id = %purchase.id,
                    user_id = %purchase.user_id,
                    item = %target,
                    price = purchase.price,
                    "purchase recorded"
                );
                Ok(purchase)
            }
            Err(PurchaseRepositoryError::DuplicatePurchase { .. }) => Err(already_owned(&target)),
            Err(other) => Err(map_purchase_error(other)),
        }
    }

    async fn owned_songs(&self, caller: &Caller, user_id: &UserId) -> Result<Vec<Song>, Error> {
        require_self(caller, user_id)?;
        self.purchases
            .owned_songs(user_id)
            .await
            .map_err(map_purchase_error)
    }

    async fn owned_albums(
        &self,
        caller: &Caller,
        user_id: &UserId,
    ) -> Result<Vec<Album>, Error> {
        require_self(caller, user_id)?;
        self.purchases
            .owned_albums(user_id)
            .await
            .map_err(map_purchase_error)
    }

    async fn purchase_history(
        &self,
        caller: &Caller,
        user_id: &UserId,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Purchase>, Error> {
        require_self(caller, user_id)?;
        self.purchases
            .list_for_user(user_id, kind)
            .await
            .map_err(map_purchase_error)
    }

    async fn is_owned(&self, user_id: &UserId, item: &ItemRef) -> Result<bool, Error> {
        self.purchases
            .is_owned(user_id, item)
            .await
            .map_err(map_purchase_error)
    }
}

#[cfg(test)]
#[path = "entitlement_service_tests.rs"]
mod tests;
