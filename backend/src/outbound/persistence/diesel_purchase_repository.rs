//! PostgreSQL-backed `PurchaseRepository`.
//!
//! The `purchases_user_item_key` unique constraint is the authority on
//! one-purchase-per-item; a violation surfaces as `DuplicatePurchase` so the
//! service can answer `already_owned` even when two requests race.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PurchaseRepository, PurchaseRepositoryError};
use crate::domain::{Album, ItemKind, ItemRef, PaymentStatus, Purchase, Song, UserId};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{AlbumRow, NewPurchaseRow, PurchaseRow, SongRow};
use super::pool::{DbPool, PoolError};
use super::schema::{albums, purchases, songs};

/// Diesel implementation of the purchase ledger.
#[derive(Clone)]
pub struct DieselPurchaseRepository {
    pool: DbPool,
}

impl DieselPurchaseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PurchaseRepositoryError {
    map_basic_pool_error(error, PurchaseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PurchaseRepositoryError {
    map_basic_diesel_error(
        error,
        PurchaseRepositoryError::query,
        PurchaseRepositoryError::connection,
    )
}

fn map_insert_error(error: &diesel::result::Error, item: &ItemRef) -> PurchaseRepositoryError {
    match classify_diesel_error(error) {
        DieselFailure::UniqueViolation => PurchaseRepositoryError::duplicate_purchase(item.to_string()),
        DieselFailure::Connection(message) => PurchaseRepositoryError::connection(message),
        DieselFailure::Query(message) => PurchaseRepositoryError::query(message),
    }
}

const COMPLETED: &str = PaymentStatus::Completed.as_str();

#[async_trait]
impl PurchaseRepository for DieselPurchaseRepository {
    async fn find(
        &self,
        user_id: &UserId,
        item: &ItemRef,
    ) -> Result<Option<Purchase>, PurchaseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = purchases::table
            .filter(purchases::user_id.eq(user_id.as_uuid()))
            .filter(purchases::item_kind.eq(item.kind.as_str()))
            .filter(purchases::item_id.eq(item.id))
            .select(PurchaseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| Purchase::try_from(row).map_err(PurchaseRepositoryError::query))
            .transpose()
    }

    async fn insert(&self, purchase: &Purchase) -> Result<(), PurchaseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPurchaseRow {
            id: purchase.id,
            user_id: *purchase.user_id.as_uuid(),
            item_kind: purchase.item.kind.as_str(),
            item_id: purchase.item.id,
            price: purchase.price,
            currency: &purchase.currency,
            payment_status: purchase.payment_status.as_str(),
            transaction_reference: purchase.transaction_reference.as_deref(),
            purchased_at: purchase.purchased_at,
        };
        diesel::insert_into(purchases::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_insert_error(&error, &purchase.item))
    }

    async fn is_owned(
        &self,
        user_id: &UserId,
        item: &ItemRef,
    ) -> Result<bool, PurchaseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            purchases::table
                .filter(purchases::user_id.eq(user_id.as_uuid()))
                .filter(purchases::item_kind.eq(item.kind.as_str()))
                .filter(purchases::item_id.eq(item.id))
                .filter(purchases::payment_status.eq(COMPLETED)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        kind: Option<ItemKind>,
    ) -> Result<Vec<Purchase>, PurchaseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = purchases::table
            .filter(purchases::user_id.eq(user_id.as_uuid()))
            .select(PurchaseRow::as_select())
            .order(purchases::purchased_at.desc())
            .into_boxed();
        if let Some(kind) = kind {
            query = query.filter(purchases::item_kind.eq(kind.as_str()));
        }
        let rows: Vec<PurchaseRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| Purchase::try_from(row).map_err(PurchaseRepositoryError::query))
            .collect()
    }

    async fn owned_songs(&self, user_id: &UserId) -> Result<Vec<Song>, PurchaseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owned_ids = purchases::table
            .filter(purchases::user_id.eq(user_id.as_uuid()))
            .filter(purchases::item_kind.eq(ItemKind::Song.as_str()))
            .filter(purchases::payment_status.eq(COMPLETED))
            .select(purchases::item_id);
        let rows: Vec<SongRow> = songs::table
            .filter(songs::id.eq_any(owned_ids))
            .filter(songs::deleted_at.is_null())
            .order(songs::title.asc())
            .select(SongRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Song::from).collect())
    }

    async fn owned_albums(&self, user_id: &UserId) -> Result<Vec<Album>, PurchaseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owned_ids = purchases::table
            .filter(purchases::user_id.eq(user_id.as_uuid()))
            .filter(purchases::item_kind.eq(ItemKind::Album.as_str()))
            .filter(purchases::payment_status.eq(COMPLETED))
            .select(purchases::item_id);
        let rows: Vec<AlbumRow> = albums::table
            .filter(albums::id.eq_any(owned_ids))
            .filter(albums::deleted_at.is_null())
            .order(albums::title.asc())
            .select(AlbumRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Album::from).collect())
    }
}
