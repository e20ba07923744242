//! Port for catalogue reads and owner-driven catalogue writes.
//!
//! Reads resolve songs, albums, and artists so other components can validate
//! foreign references and ownership. Soft-deleted rows are never returned.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Album, Artist, Contributor, ItemRef, Song, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
        /// The (item, artist, contribution type) triple already exists.
        DuplicateContributor { artist_id: Uuid } =>
            "artist {artist_id} is already credited with this contribution type",
        /// The user already has an artist profile.
        DuplicateArtist { user_id: String } => "user {user_id} already has an artist profile",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    async fn find_song(&self, id: &Uuid) -> Result<Option<Song>, CatalogueRepositoryError>;

    async fn find_album(&self, id: &Uuid) -> Result<Option<Album>, CatalogueRepositoryError>;

    async fn find_artist(&self, id: &Uuid) -> Result<Option<Artist>, CatalogueRepositoryError>;

    /// Resolve the artist profile linked to a user, if any.
    async fn find_artist_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Artist>, CatalogueRepositoryError>;

    /// Insert an artist profile.
    ///
    /// Fails with [`CatalogueRepositoryError::DuplicateArtist`] when the user
    /// already has one.
    async fn create_artist(&self, artist: &Artist) -> Result<(), CatalogueRepositoryError>;

    async fn create_song(&self, song: &Song) -> Result<(), CatalogueRepositoryError>;

    async fn create_album(&self, album: &Album) -> Result<(), CatalogueRepositoryError>;

    /// Soft-delete a song; `false` when no live row matched.
    async fn delete_song(&self, id: &Uuid) -> Result<bool, CatalogueRepositoryError>;

    /// Soft-delete an album; `false` when no live row matched.
    async fn delete_album(&self, id: &Uuid) -> Result<bool, CatalogueRepositoryError>;

    /// Persist the editable fields of an existing song.
    async fn update_song(&self, song: &Song) -> Result<(), CatalogueRepositoryError>;

    /// Persist the editable fields of an existing album.
    async fn update_album(&self, album: &Album) -> Result<(), CatalogueRepositoryError>;

    /// Credit an artist on a song or album.
    ///
    /// Fails with [`CatalogueRepositoryError::DuplicateContributor`] when the
    /// triple is already present.
    async fn add_contributor(&self, contributor: &Contributor)
    -> Result<(), CatalogueRepositoryError>;

    /// Contributors credited on `item`.
    async fn list_contributors(
        &self,
        item: &ItemRef,
    ) -> Result<Vec<Contributor>, CatalogueRepositoryError>;
}
