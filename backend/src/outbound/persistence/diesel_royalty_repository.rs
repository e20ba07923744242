//! PostgreSQL-backed tip and royalty repositories.
//!
//! Accrual is one `INSERT .. ON CONFLICT DO UPDATE .. WHERE` so concurrent
//! accruals for a period add up instead of overwriting each other. The
//! `WHERE` refuses paid rows and sums that would leave the BIGINT range; when
//! it refuses, no row comes back and the stored row explains why. Settlement
//! is a conditional update that only matches unpaid rows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Nullable};
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{RoyaltyRepository, RoyaltyRepositoryError, TipRepository};
use crate::domain::{DEFAULT_CURRENCY, MonthlyRoyalty, RoyaltyPeriod, Tip, UserId};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewRoyaltyRow, NewTipRow, RoyaltyRow, TipRow};
use super::pool::{DbPool, PoolError};
use super::schema::{artist_tips, monthly_royalties};

fn map_pool_error(error: PoolError) -> RoyaltyRepositoryError {
    map_basic_pool_error(error, RoyaltyRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RoyaltyRepositoryError {
    map_basic_diesel_error(
        error,
        RoyaltyRepositoryError::query,
        RoyaltyRepositoryError::connection,
    )
}

const PENDING_TOTAL_SQL: &str = "CASE \
    WHEN COALESCE(SUM(monthly_royalties.amount), 0) > 9223372036854775807 THEN NULL \
    ELSE COALESCE(SUM(monthly_royalties.amount), 0)::BIGINT END";

fn to_royalty(row: RoyaltyRow) -> Result<MonthlyRoyalty, RoyaltyRepositoryError> {
    MonthlyRoyalty::try_from(row).map_err(RoyaltyRepositoryError::query)
}

fn to_tips(rows: Vec<TipRow>) -> Result<Vec<Tip>, RoyaltyRepositoryError> {
    rows.into_iter()
        .map(|row| Tip::try_from(row).map_err(RoyaltyRepositoryError::query))
        .collect()
}

/// Diesel implementation of tip storage.
#[derive(Clone)]
pub struct DieselTipRepository {
    pool: DbPool,
}

impl DieselTipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TipRepository for DieselTipRepository {
    async fn insert(&self, tip: &Tip) -> Result<(), RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewTipRow {
            id: tip.id,
            sender_id: *tip.sender_id.as_uuid(),
            artist_id: tip.artist_id,
            amount: tip.amount,
            currency: &tip.currency,
            message: tip.message.as_deref(),
            payment_status: tip.payment_status.as_str(),
            transaction_reference: tip.transaction_reference.as_deref(),
            created_at: tip.created_at,
        };
        diesel::insert_into(artist_tips::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_for_artist(
        &self,
        artist_id: &Uuid,
        limit: u32,
    ) -> Result<Vec<Tip>, RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = artist_tips::table
            .filter(artist_tips::artist_id.eq(artist_id))
            .order(artist_tips::created_at.desc())
            .limit(i64::from(limit))
            .select(TipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_tips(rows)
    }

    async fn list_for_sender(
        &self,
        sender_id: &UserId,
        limit: u32,
    ) -> Result<Vec<Tip>, RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = artist_tips::table
            .filter(artist_tips::sender_id.eq(sender_id.as_uuid()))
            .order(artist_tips::created_at.desc())
            .limit(i64::from(limit))
            .select(TipRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_tips(rows)
    }
}

/// Diesel implementation of monthly royalty storage.
#[derive(Clone)]
pub struct DieselRoyaltyRepository {
    pool: DbPool,
}

impl DieselRoyaltyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoyaltyRepository for DieselRoyaltyRepository {
    async fn accrue(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
        amount: i64,
    ) -> Result<MonthlyRoyalty, RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRoyaltyRow {
            id: Uuid::new_v4(),
            artist_id: *artist_id,
            year: period.year(),
            month: period.month(),
            amount,
            currency: DEFAULT_CURRENCY,
            paid_status: false,
        };
        let headroom = i64::MAX.saturating_sub(amount);
        let upsert = {
            use diesel::query_dsl::methods::FilterDsl;
            diesel::insert_into(monthly_royalties::table)
                .values(&row)
                .on_conflict((
                    monthly_royalties::artist_id,
                    monthly_royalties::year,
                    monthly_royalties::month,
                ))
                .do_update()
                .set((
                    monthly_royalties::amount
                        .eq(monthly_royalties::amount + excluded(monthly_royalties::amount)),
                    monthly_royalties::updated_at.eq(diesel::dsl::now),
                ))
                .filter(monthly_royalties::paid_status.eq(false))
                .filter(monthly_royalties::amount.le(headroom))
        };
        let stored = upsert
            .returning(RoyaltyRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        if let Some(stored) = stored {
            return to_royalty(stored);
        }

        let existing: Option<bool> = monthly_royalties::table
            .filter(monthly_royalties::artist_id.eq(artist_id))
            .filter(monthly_royalties::year.eq(period.year()))
            .filter(monthly_royalties::month.eq(period.month()))
            .select(monthly_royalties::paid_status)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Err(match existing {
            Some(true) => RoyaltyRepositoryError::period_paid(period.to_string()),
            Some(false) => RoyaltyRepositoryError::amount_overflow(),
            None => RoyaltyRepositoryError::query("royalty upsert returned no row"),
        })
    }

    async fn mark_paid(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<Option<MonthlyRoyalty>, RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(
            monthly_royalties::table
                .filter(monthly_royalties::artist_id.eq(artist_id))
                .filter(monthly_royalties::year.eq(period.year()))
                .filter(monthly_royalties::month.eq(period.month()))
                .filter(monthly_royalties::paid_status.eq(false)),
        )
        .set((
            monthly_royalties::paid_status.eq(true),
            monthly_royalties::updated_at.eq(diesel::dsl::now),
        ))
        .returning(RoyaltyRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
        updated.map(to_royalty).transpose()
    }

    async fn find(
        &self,
        artist_id: &Uuid,
        period: RoyaltyPeriod,
    ) -> Result<Option<MonthlyRoyalty>, RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = monthly_royalties::table
            .filter(monthly_royalties::artist_id.eq(artist_id))
            .filter(monthly_royalties::year.eq(period.year()))
            .filter(monthly_royalties::month.eq(period.month()))
            .select(RoyaltyRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_royalty).transpose()
    }

    async fn list_for_artist(
        &self,
        artist_id: &Uuid,
    ) -> Result<Vec<MonthlyRoyalty>, RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RoyaltyRow> = monthly_royalties::table
            .filter(monthly_royalties::artist_id.eq(artist_id))
            .order((
                monthly_royalties::year.desc(),
                monthly_royalties::month.desc(),
            ))
            .select(RoyaltyRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_royalty).collect()
    }

    async fn pending_total(&self) -> Result<i64, RoyaltyRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // SUM over BIGINT yields NUMERIC in PostgreSQL; totals past the
        // BIGINT range come back as NULL instead of failing the cast.
        let total: Option<i64> = monthly_royalties::table
            .filter(monthly_royalties::paid_status.eq(false))
            .select(diesel::dsl::sql::<Nullable<BigInt>>(PENDING_TOTAL_SQL))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        total.ok_or_else(RoyaltyRepositoryError::amount_overflow)
    }
}
