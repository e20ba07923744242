//! PostgreSQL-backed `ContentFlagRepository`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{ContentFlagRepository, ContentFlagRepositoryError};
use crate::domain::{ContentFlag, FlagStatus};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{FlagRow, NewFlagRow};
use super::pool::{DbPool, PoolError};
use super::schema::content_flags;

/// Diesel implementation of the moderation queue storage.
#[derive(Clone)]
pub struct DieselContentFlagRepository {
    pool: DbPool,
}

impl DieselContentFlagRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContentFlagRepositoryError {
    map_basic_pool_error(error, ContentFlagRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContentFlagRepositoryError {
    map_basic_diesel_error(
        error,
        ContentFlagRepositoryError::query,
        ContentFlagRepositoryError::connection,
    )
}

fn to_flag(row: FlagRow) -> Result<ContentFlag, ContentFlagRepositoryError> {
    ContentFlag::try_from(row).map_err(ContentFlagRepositoryError::query)
}

#[async_trait]
impl ContentFlagRepository for DieselContentFlagRepository {
    async fn insert(&self, flag: &ContentFlag) -> Result<(), ContentFlagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewFlagRow {
            id: flag.id,
            reporter_id: *flag.reporter_id.as_uuid(),
            target_kind: flag.target.kind.as_str(),
            target_id: flag.target.id,
            reason: &flag.reason,
            description: flag.description.as_deref(),
            status: flag.status.as_str(),
            created_at: flag.created_at,
            updated_at: flag.updated_at,
        };
        diesel::insert_into(content_flags::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: FlagStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ContentFlag>, ContentFlagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(content_flags::table.filter(content_flags::id.eq(id)))
            .set((
                content_flags::status.eq(status.as_str()),
                content_flags::updated_at.eq(updated_at),
            ))
            .returning(FlagRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_flag).transpose()
    }

    async fn list_by_status(
        &self,
        status: FlagStatus,
    ) -> Result<Vec<ContentFlag>, ContentFlagRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<FlagRow> = content_flags::table
            .filter(content_flags::status.eq(status.as_str()))
            .order(content_flags::created_at.asc())
            .select(FlagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_flag).collect()
    }
}
