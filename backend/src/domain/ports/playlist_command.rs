//! Driving port for playlists.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Caller, Error, Playlist, PlaylistDraft, PlaylistEntry, PlaylistUpdate, ReorderBatch, Song,
    UserId,
};

#[async_trait]
pub trait PlaylistCommand: Send + Sync {
    /// Create a playlist for `owner_id`, who must be the caller.
    async fn create(
        &self,
        caller: &Caller,
        owner_id: &UserId,
        draft: PlaylistDraft,
    ) -> Result<Playlist, Error>;

    /// Fetch a playlist. Private playlists are visible to their owner only.
    async fn playlist(&self, viewer: Option<&Caller>, id: &Uuid) -> Result<Playlist, Error>;

    /// Edit a playlist the caller owns.
    async fn update(
        &self,
        caller: &Caller,
        id: &Uuid,
        update: PlaylistUpdate,
    ) -> Result<Playlist, Error>;

    /// Delete a playlist the caller owns.
    async fn delete(&self, caller: &Caller, id: &Uuid) -> Result<(), Error>;

    /// Songs in playlist order, with the same visibility as [`Self::playlist`].
    async fn songs(&self, viewer: Option<&Caller>, id: &Uuid) -> Result<Vec<Song>, Error>;

    /// Append a song. Adding a song twice is `conflict`.
    async fn add_song(
        &self,
        caller: &Caller,
        playlist_id: &Uuid,
        song_id: &Uuid,
    ) -> Result<PlaylistEntry, Error>;

    async fn remove_song(
        &self,
        caller: &Caller,
        playlist_id: &Uuid,
        song_id: &Uuid,
    ) -> Result<(), Error>;

    /// Apply a batch of position updates atomically and return the new order.
    ///
    /// When any song in the batch is not in the playlist nothing changes and
    /// the call fails `not_found`.
    async fn reorder_songs(
        &self,
        caller: &Caller,
        playlist_id: &Uuid,
        batch: ReorderBatch,
    ) -> Result<Vec<PlaylistEntry>, Error>;
}
