//! Purchases, tips, and royalty rows.

use std::cmp::Reverse;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{
    PurchaseRepository, PurchaseRepositoryError, RoyaltyRepository, RoyaltyRepositoryError,
    TipRepository,
};
use crate::domain::{
    Album, DEFAULT_CURRENCY, ItemKind, ItemRef, MonthlyRoyalty, Purchase, RoyaltyPeriod, Song, Tip,
    UserId,
};

use super::{InMemoryMarketplace, MarketplaceState};

fn owned_ids(state: &MarketplaceState, user_id: &UserId, kind: ItemKind) -> Vec<Uuid> {
    state
        .purchases
        .iter()
        .filter(|p| &p.user_id == user_id && p.item.kind == kind && p.grants_entitlement())
        .map(|p| p.item.id)
        .collect()
}

fn capped(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[async_trait]
impl PurchaseRepository for InMemoryMarketplace {
    async fn find(
        &self,
        user_id: &UserId,
        item: &ItemRef,
    ) -> Result<Option<Purchase>, PurchaseRepositoryError> {
        Ok(self
            .lock()
            .purchases
            .iter()
            .find(|p| &p.user_id == user_id && &p.item == item)
            .cloned())
    }

    async fn insert(&self, purchase: &Purchase) -> Result<(), PurchaseRepositoryError> {
        let mut state = self.lock();
        if state
            .purchases
            .iter()
            .any(|p| p.user_id == purchase.user_id && p.item == purchase.item)
        {
            return Err(PurchaseRepositoryError::duplicate_purchase(
                purchase.item.to_string(),
            ));
        }
        state.purchases.push(purchase.clone());
        Ok(())
    }

    async fn is_owned(
        &self,
        user_id: &UserId,
        item: &ItemRef,
    ) -> Result<bool, PurchaseRepositoryError> {
        Ok(self
            .lock()
            .purchases
            .iter()
            .any(|p| &p.user_id == user_id && &p.item == item && p.grants_entitlement()))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Purchase>, PurchaseRepositoryError> {
        let mut purchases: Vec<Purchase> = self
            .lock()
            .purchases
            .iter()
            .filter(|p| &p.user_id == user_id && kind.is_none_or(|kind| p.item.kind == kind))
            .cloned()
            .collect();
        purchases.sort_by_key(|p| Reverse(p.purchased_at));
        Ok(purchases)
    }

    async fn owned_songs(&self, user_id: &UserId) -> Result<Vec<Song>, PurchaseRepositoryError> {
        let state = self.lock();
        Ok(owned_ids(&state, user_id, ItemKind::Song)
            .iter()
            .filter_map(|id| state.songs.get(id).cloned())
            .collect())
    }

    async fn owned_albums(&self, user_id: &UserId) -> Result<Vec<Album>, PurchaseRepositoryError> {
        let state = self.lock();
        Ok(owned_ids(&state, user_id, ItemKind::Album)
            .iter()
            .filter_map(|id| state.albums.get(id).cloned())
            .collect())
    }
}

#[async_trait]
impl TipRepository for InMemoryMarketplace {
    async fn insert(&self, tip: &Tip) -> Result<(), RoyaltyRepositoryError> {
        self.lock().tips.push(tip.clone());
        Ok(())
    }

    async fn list_for_artist(
        &self,
        artist_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<Tip>, RoyaltyRepositoryError> {
        let mut tips: Vec<Tip> = self
            .lock()
            .tips
            .iter()
            .filter(|tip| &tip.artist_id == artist_id)
            .cloned()
            .collect();
        tips.sort_by_key(|tip| Reverse(tip.created_at));
        tips.truncate(capped(limit));
        Ok(tips)
    }

    async fn list_for_sender(
        &self,
        sender_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Tip>, RoyaltyRepositoryError> {
        let mut tips: Vec<Tip> = self
            .lock()
            .tips
            .iter()
            .filter(|tip| &tip.sender_id == sender_id)
            .cloned()
            .collect();
        tips.sort_by_key(|tip| Reverse(tip.created_at));
        tips.truncate(capped(limit));
        Ok(tips)
    }
}

#[async_trait]
impl RoyaltyRepository for InMemoryMarketplace {
    async fn accrue(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
        amount: i64,
    ) -> Result<MonthlyRoyalty, RoyaltyRepositoryError> {
        let mut state = self.lock();
        let row = state
            .royalties
            .entry((*artist_id, period))
            .or_insert_with(|| MonthlyRoyalty {
                id: Uuid::new_v4(),
                artist_id: *artist_id,
                period,
                amount: 0,
                currency: DEFAULT_CURRENCY.to_owned(),
                paid: false,
            });
        if row.paid {
            return Err(RoyaltyRepositoryError::period_paid(period.to_string()));
        }
        row.amount = row
            .amount
            .checked_add(amount)
            .ok_or_else(RoyaltyRepositoryError::amount_overflow)?;
        Ok(row.clone())
    }

    async fn mark_paid(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<Option<MonthlyRoyalty>, RoyaltyRepositoryError> {
        let mut state = self.lock();
        Ok(state
            .royalties
            .get_mut(&(*artist_id, period))
            .filter(|row| !row.paid)
            .map(|row| {
                row.paid = true;
                row.clone()
            }))
    }

    async fn find(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<Option<MonthlyRoyalty>, RoyaltyRepositoryError> {
        Ok(self.lock().royalties.get(&(*artist_id, period)).cloned())
    }

    async fn list_for_artist(
        &self,
        artist_id: &Uuid,
    ) -> Result<Vec<MonthlyRoyalty>, RoyaltyRepositoryError> {
        let mut rows: Vec<MonthlyRoyalty> = self
            .lock()
            .royalties
            .values()
            .filter(|row| &row.artist_id == artist_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| Reverse(row.period));
        Ok(rows)
    }

    async fn pending_total(&self) -> Result<i64, RoyaltyRepositoryError> {
        self.lock()
            .royalties
            .values()
            .filter(|row| !row.paid)
            .try_fold(0_i64, |total, row| total.checked_add(row.amount))
            .ok_or_else(RoyaltyRepositoryError::amount_overflow)
    }
}
