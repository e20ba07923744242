//! Port for playlists and their song entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Playlist, PlaylistEntry, ReorderBatch, Song};

use super::define_port_error;

define_port_error! {
    /// Errors raised by playlist repository adapters.
    pub enum PlaylistRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "playlist repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "playlist repository query failed: {message}",
        /// The song is already part of the playlist.
        DuplicateEntry { song_id: Uuid } => "song {song_id} is already in the playlist",
        /// A reorder referenced a song that is not in the playlist.
        MissingEntry { song_id: Uuid } => "song {song_id} is not in the playlist",
        /// The last entry already sits at the highest storable position.
        PositionsExhausted => "no position is left after the last playlist entry",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    async fn create(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError>;

    async fn find(&self, id: &Uuid) -> Result<Option<Playlist>, PlaylistRepositoryError>;

    /// Persist title, description, and visibility of an existing playlist.
    async fn update(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError>;

    /// Delete a playlist; `false` when it did not exist.
    async fn delete(&self, id: &Uuid) -> Result<bool, PlaylistRepositoryError>;

    /// Entries ordered by position.
    async fn entries(&self, playlist_id: &Uuid)
    -> Result<Vec<PlaylistEntry>, PlaylistRepositoryError>;

    /// Songs ordered by their playlist position.
    async fn songs(&self, playlist_id: &Uuid) -> Result<Vec<Song>, PlaylistRepositoryError>;

    /// Append a song after the current last position.
    ///
    /// Fails with [`PlaylistRepositoryError::PositionsExhausted`] when the
    /// last position is `i32::MAX`.
    async fn append_song(
        &self,
        playlist_id: &Uuid,
        song_id: &Uuid,
        added_at: DateTime<Utc>,
    ) -> Result<PlaylistEntry, PlaylistRepositoryError>;

    /// Remove a song; `false` when it was not present.
    async fn remove_song(
        &self,
        playlist_id: &Uuid,
        song_id: &Uuid,
    ) -> Result<bool, PlaylistRepositoryError>;

    /// Apply every position update or none of them.
    ///
    /// Fails with [`PlaylistRepositoryError::MissingEntry`] when any update
    /// matches no entry; all earlier updates in the batch are rolled back.
    async fn reorder(
        &self,
        playlist_id: &Uuid,
        batch: &ReorderBatch,
    ) -> Result<(), PlaylistRepositoryError>;
}
