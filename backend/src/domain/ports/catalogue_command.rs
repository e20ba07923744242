//! Driving port for publishing, reading, and editing catalogue entries.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Album, AlbumDraft, AlbumUpdate, Caller, Contributor, Error, ItemRef, Song, SongDraft,
    SongUpdate,
};

#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    async fn song(&self, id: &Uuid) -> Result<Song, Error>;

    async fn album(&self, id: &Uuid) -> Result<Album, Error>;

    /// Publish a song under the caller's artist profile.
    ///
    /// A draft naming another artist is `forbidden`; a referenced album must
    /// exist and belong to the same artist.
    async fn create_song(&self, caller: &Caller, draft: SongDraft) -> Result<Song, Error>;

    /// Publish an album under the caller's artist profile.
    async fn create_album(&self, caller: &Caller, draft: AlbumDraft) -> Result<Album, Error>;

    /// Remove a song owned by the caller's artist profile.
    async fn delete_song(&self, caller: &Caller, id: &Uuid) -> Result<(), Error>;

    /// Remove an album owned by the caller's artist profile.
    async fn delete_album(&self, caller: &Caller, id: &Uuid) -> Result<(), Error>;

    /// Edit a song owned by the caller's artist profile.
    async fn update_song(
        &self,
        caller: &Caller,
        id: &Uuid,
        update: SongUpdate,
    ) -> Result<Song, Error>;

    /// Edit an album owned by the caller's artist profile.
    async fn update_album(
        &self,
        caller: &Caller,
        id: &Uuid,
        update: AlbumUpdate,
    ) -> Result<Album, Error>;

    /// Credit another artist on an item the caller owns.
    ///
    /// Fails `conflict` when the artist already holds that contribution type.
    async fn add_contributor(
        &self,
        caller: &Caller,
        contributor: Contributor,
    ) -> Result<Contributor, Error>;

    async fn contributors(&self, item: &ItemRef) -> Result<Vec<Contributor>, Error>;
}
