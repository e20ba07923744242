//! PostgreSQL-backed `StreamRepository`.
//!
//! Recording a play inserts the event and bumps `songs.plays_count` in one
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::StreamEvent;
use crate::domain::ports::{StreamRepository, StreamRepositoryError};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewStreamRow;
use super::pool::{DbPool, PoolError};
use super::schema::{songs, streams};

/// Diesel implementation of play event storage.
#[derive(Clone)]
pub struct DieselStreamRepository {
    pool: DbPool,
}

impl DieselStreamRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> StreamRepositoryError {
    map_basic_pool_error(error, StreamRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> StreamRepositoryError {
    map_basic_diesel_error(
        error,
        StreamRepositoryError::query,
        StreamRepositoryError::connection,
    )
}

#[async_trait]
impl StreamRepository for DieselStreamRepository {
    async fn record(&self, event: &StreamEvent) -> Result<(), StreamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewStreamRow {
            id: event.id,
            song_id: event.song_id,
            user_id: event.user_id.as_ref().map(|id| *id.as_uuid()),
            is_preview: event.is_preview,
            device_type: event.device_type.as_deref(),
            country_code: event.country_code.as_deref(),
            streamed_at: event.streamed_at,
        };

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::insert_into(streams::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::update(songs::table.filter(songs::id.eq(row.song_id)))
                    .set(songs::plays_count.eq(songs::plays_count + 1_i64))
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn count_since(
        &self,
        song_id: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, StreamRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        streams::table
            .filter(streams::song_id.eq(song_id))
            .filter(streams::streamed_at.ge(since))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }
}
