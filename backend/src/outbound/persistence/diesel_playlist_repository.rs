//! PostgreSQL-backed `PlaylistRepository`.
//!
//! Deletes are soft. Appends and reorders run inside a transaction. A reorder that names a song
//! outside the playlist aborts the transaction, so no earlier update in the
//! batch survives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{PlaylistRepository, PlaylistRepositoryError};
use crate::domain::{Playlist, PlaylistEntry, ReorderBatch, Song};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewPlaylistRow, PlaylistChangeset, PlaylistEntryRow, PlaylistRow, SongRow};
use super::pool::{DbPool, PoolError};
use super::schema::{playlist_songs, playlists, songs};

/// Diesel implementation of playlist storage.
#[derive(Clone)]
pub struct DieselPlaylistRepository {
    pool: DbPool,
}

impl DieselPlaylistRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PlaylistRepositoryError {
    map_basic_pool_error(error, PlaylistRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PlaylistRepositoryError {
    map_basic_diesel_error(
        error,
        PlaylistRepositoryError::query,
        PlaylistRepositoryError::connection,
    )
}

/// Failure inside a reorder transaction.
#[derive(Debug)]
enum ReorderFailure {
    Missing(Uuid),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for ReorderFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

/// Failure inside an append transaction.
#[derive(Debug)]
enum AppendFailure {
    PositionsExhausted,
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for AppendFailure {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

#[async_trait]
impl PlaylistRepository for DieselPlaylistRepository {
    async fn create(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewPlaylistRow {
            id: playlist.id,
            owner_id: *playlist.owner_id.as_uuid(),
            title: &playlist.title,
            description: playlist.description.as_deref(),
            is_public: playlist.is_public,
            created_at: playlist.created_at,
            updated_at: playlist.created_at,
        };
        diesel::insert_into(playlists::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find(&self, id: &Uuid) -> Result<Option<Playlist>, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = playlists::table
            .filter(playlists::id.eq(id))
            .filter(playlists::deleted_at.is_null())
            .select(PlaylistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Playlist::from))
    }

    async fn update(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PlaylistChangeset {
            title: &playlist.title,
            description: playlist.description.as_deref(),
            is_public: playlist.is_public,
        };
        let rows = diesel::update(
            playlists::table
                .filter(playlists::id.eq(playlist.id))
                .filter(playlists::deleted_at.is_null()),
        )
        .set((&changes, playlists::updated_at.eq(diesel::dsl::now)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if rows == 0 {
            return Err(PlaylistRepositoryError::query(format!(
                "playlist {} no longer exists",
                playlist.id
            )));
        }
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = diesel::update(
            playlists::table
                .filter(playlists::id.eq(id))
                .filter(playlists::deleted_at.is_null()),
        )
        .set((
            playlists::deleted_at.eq(diesel::dsl::now),
            playlists::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(rows > 0)
    }

    async fn entries(
        &self,
        playlist_id: &Uuid,
    ) -> Result<Vec<PlaylistEntry>, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PlaylistEntryRow> = playlist_songs::table
            .filter(playlist_songs::playlist_id.eq(playlist_id))
            .order((playlist_songs::position.asc(), playlist_songs::added_at.asc()))
            .select(PlaylistEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(PlaylistEntry::from).collect())
    }

    async fn songs(&self, playlist_id: &Uuid) -> Result<Vec<Song>, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<SongRow> = playlist_songs::table
            .inner_join(songs::table)
            .filter(playlist_songs::playlist_id.eq(playlist_id))
            .filter(songs::deleted_at.is_null())
            .order((playlist_songs::position.asc(), playlist_songs::added_at.asc()))
            .select(SongRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Song::from).collect())
    }

    async fn append_song(
        &self,
        playlist_id: &Uuid,
        song_id: &Uuid,
        added_at: DateTime<Utc>,
    ) -> Result<PlaylistEntry, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let playlist_id = *playlist_id;
        let song_id = *song_id;

        let result = conn
            .transaction::<_, AppendFailure, _>(|conn| {
                async move {
                    let last: Option<i32> = playlist_songs::table
                        .filter(playlist_songs::playlist_id.eq(playlist_id))
                        .select(diesel::dsl::max(playlist_songs::position))
                        .get_result(conn)
                        .await?;
                    let position = match last {
                        Some(last) => last
                            .checked_add(1)
                            .ok_or(AppendFailure::PositionsExhausted)?,
                        None => 0,
                    };
                    let row = PlaylistEntryRow {
                        playlist_id,
                        song_id,
                        position,
                        added_at,
                    };
                    diesel::insert_into(playlist_songs::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await;

        match result {
            Ok(row) => Ok(PlaylistEntry::from(row)),
            Err(AppendFailure::PositionsExhausted) => {
                Err(PlaylistRepositoryError::positions_exhausted())
            }
            Err(AppendFailure::Diesel(error)) => Err(match classify_diesel_error(&error) {
                DieselFailure::UniqueViolation => PlaylistRepositoryError::duplicate_entry(song_id),
                DieselFailure::Connection(message) => PlaylistRepositoryError::connection(message),
                DieselFailure::Query(message) => PlaylistRepositoryError::query(message),
            }),
        }
    }

    async fn remove_song(
        &self,
        playlist_id: &Uuid,
        song_id: &Uuid,
    ) -> Result<bool, PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            playlist_songs::table
                .filter(playlist_songs::playlist_id.eq(playlist_id))
                .filter(playlist_songs::song_id.eq(song_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn reorder(
        &self,
        playlist_id: &Uuid,
        batch: &ReorderBatch,
    ) -> Result<(), PlaylistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let playlist_id = *playlist_id;
        let positions = batch.positions().to_vec();

        conn.transaction::<_, ReorderFailure, _>(|conn| {
            async move {
                for entry in positions {
                    let updated = diesel::update(
                        playlist_songs::table
                            .filter(playlist_songs::playlist_id.eq(playlist_id))
                            .filter(playlist_songs::song_id.eq(entry.song_id)),
                    )
                    .set(playlist_songs::position.eq(entry.position))
                    .execute(conn)
                    .await?;
                    if updated == 0 {
                        return Err(ReorderFailure::Missing(entry.song_id));
                    }
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| match failure {
            ReorderFailure::Missing(song_id) => PlaylistRepositoryError::missing_entry(song_id),
            ReorderFailure::Diesel(error) => map_diesel_error(error),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn diesel_errors_convert_into_reorder_failures() {
        let failure = ReorderFailure::from(diesel::result::Error::NotFound);
        assert!(matches!(failure, ReorderFailure::Diesel(_)));
    }

    #[rstest]
    fn pool_errors_become_connection_errors() {
        let err = map_pool_error(PoolError::checkout("timed out"));
        assert!(matches!(err, PlaylistRepositoryError::Connection { .. }));
    }
}
