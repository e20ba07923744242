//! PostgreSQL-backed `CatalogueRepository`.
//!
//! Reads skip soft-deleted rows. Owner updates touch only the editable
//! columns and stamp `updated_at` with the database clock; deletes set
//! `deleted_at` so purchase history keeps its foreign keys.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError};
use crate::domain::{Album, Artist, Contributor, ItemRef, Song, UserId};

use super::diesel_error_mapping::{
    DieselFailure, classify_diesel_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    AlbumChangeset, AlbumRow, ArtistRow, ContributorRow, NewAlbumRow, NewArtistRow,
    NewContributorRow, NewSongRow, SongChangeset, SongRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{albums, artists, contributors, songs};

/// Diesel implementation of the catalogue repository port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

fn ensure_updated(rows: usize, what: &str, id: Uuid) -> Result<(), CatalogueRepositoryError> {
    if rows == 0 {
        return Err(CatalogueRepositoryError::query(format!(
            "{what} {id} no longer exists"
        )));
    }
    Ok(())
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn find_song(&self, id: &Uuid) -> Result<Option<Song>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = songs::table
            .filter(songs::id.eq(id))
            .filter(songs::deleted_at.is_null())
            .select(SongRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Song::from))
    }

    async fn find_album(&self, id: &Uuid) -> Result<Option<Album>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = albums::table
            .filter(albums::id.eq(id))
            .filter(albums::deleted_at.is_null())
            .select(AlbumRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Album::from))
    }

    async fn find_artist(&self, id: &Uuid) -> Result<Option<Artist>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = artists::table
            .filter(artists::id.eq(id))
            .filter(artists::deleted_at.is_null())
            .select(ArtistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Artist::from))
    }

    async fn find_artist_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Artist>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = artists::table
            .filter(artists::user_id.eq(user_id.as_uuid()))
            .filter(artists::deleted_at.is_null())
            .select(ArtistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Artist::from))
    }

    async fn create_artist(&self, artist: &Artist) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(artists::table)
            .values(NewArtistRow::from(artist))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match classify_diesel_error(&error) {
                DieselFailure::UniqueViolation => {
                    CatalogueRepositoryError::duplicate_artist(artist.user_id.to_string())
                }
                DieselFailure::Connection(message) => CatalogueRepositoryError::connection(message),
                DieselFailure::Query(message) => CatalogueRepositoryError::query(message),
            })
    }

    async fn create_song(&self, song: &Song) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(songs::table)
            .values(NewSongRow::from(song))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn create_album(&self, album: &Album) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(albums::table)
            .values(NewAlbumRow::from(album))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn delete_song(&self, id: &Uuid) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = diesel::update(
            songs::table
                .filter(songs::id.eq(id))
                .filter(songs::deleted_at.is_null()),
        )
        .set((
            songs::deleted_at.eq(diesel::dsl::now),
            songs::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(rows > 0)
    }

    async fn delete_album(&self, id: &Uuid) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = diesel::update(
            albums::table
                .filter(albums::id.eq(id))
                .filter(albums::deleted_at.is_null()),
        )
        .set((
            albums::deleted_at.eq(diesel::dsl::now),
            albums::updated_at.eq(diesel::dsl::now),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(rows > 0)
    }

    async fn update_song(&self, song: &Song) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = SongChangeset {
            title: &song.title,
            price: song.price,
            genre_id: song.genre_id,
            preview_url: song.preview_url.as_deref(),
        };
        let rows = diesel::update(
            songs::table
                .filter(songs::id.eq(song.id))
                .filter(songs::deleted_at.is_null()),
        )
        .set((&changes, songs::updated_at.eq(diesel::dsl::now)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        ensure_updated(rows, "song", song.id)
    }

    async fn update_album(&self, album: &Album) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = AlbumChangeset {
            title: &album.title,
            price: album.price,
            genre_id: album.genre_id,
            description: album.description.as_deref(),
        };
        let rows = diesel::update(
            albums::table
                .filter(albums::id.eq(album.id))
                .filter(albums::deleted_at.is_null()),
        )
        .set((&changes, albums::updated_at.eq(diesel::dsl::now)))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        ensure_updated(rows, "album", album.id)
    }

    async fn add_contributor(
        &self,
        contributor: &Contributor,
    ) -> Result<(), CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewContributorRow {
            item_kind: contributor.item.kind.as_str(),
            item_id: contributor.item.id,
            artist_id: contributor.artist_id,
            contribution_type: contributor.contribution_type.as_str(),
            royalty_percentage: i32::from(contributor.royalty_share.percent()),
        };
        diesel::insert_into(contributors::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| match classify_diesel_error(&error) {
                DieselFailure::UniqueViolation => {
                    CatalogueRepositoryError::duplicate_contributor(contributor.artist_id)
                }
                DieselFailure::Connection(message) => CatalogueRepositoryError::connection(message),
                DieselFailure::Query(message) => CatalogueRepositoryError::query(message),
            })
    }

    async fn list_contributors(
        &self,
        item: &ItemRef,
    ) -> Result<Vec<Contributor>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ContributorRow> = contributors::table
            .filter(contributors::item_kind.eq(item.kind.as_str()))
            .filter(contributors::item_id.eq(item.id))
            .order(contributors::created_at.asc())
            .select(ContributorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|row| Contributor::try_from(row).map_err(CatalogueRepositoryError::query))
            .collect()
    }
}
