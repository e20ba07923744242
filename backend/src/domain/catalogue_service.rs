//! Catalogue publishing, reads, and owner-only edits.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use crate::domain::authorization::{map_catalogue_error, resolve_item};
use crate::domain::ports::{CatalogueCommand, CatalogueRepository};
use crate::domain::{
    Album, AlbumDraft, AlbumUpdate, Artist, Caller, CatalogueItem, Contributor, Error, ItemRef,
    OwnershipGuard, Song, SongDraft, SongUpdate,
};

/// Fail unless a claimed artist id, when given, is the caller's own profile.
fn require_claimed_artist(artist: &Artist, claimed: Option<Uuid>) -> Result<(), Error> {
    match claimed {
        Some(id) if id != artist.id => Err(Error::forbidden(
            "cannot publish under another artist's profile",
        )),
        _ => Ok(()),
    }
}

pub struct CatalogueService<C> {
    catalogue: Arc<C>,
    guard: OwnershipGuard<C>,
}

impl<C> CatalogueService<C>
where
    C: CatalogueRepository,
{
    pub fn new(catalogue: Arc<C>) -> Self {
        Self {
            guard: OwnershipGuard::new(Arc::clone(&catalogue)),
            catalogue,
        }
    }
}

#[async_trait]
impl<C> CatalogueCommand for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn song(&self, id: &Uuid) -> Result<Song, Error> {
        self.catalogue
            .find_song(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("song {id} not found")))
    }

    async fn album(&self, id: &Uuid) -> Result<Album, Error> {
        self.catalogue
            .find_album(id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("album {id} not found")))
    }

    async fn create_song(&self, caller: &Caller, draft: SongDraft) -> Result<Song, Error> {
        let artist = self.guard.require_artist_profile(caller).await?;
        require_claimed_artist(&artist, draft.artist_id)?;
        if let Some(album_id) = draft.album_id {
            let album = self
                .catalogue
                .find_album(&album_id)
                .await
                .map_err(map_catalogue_error)?
                .ok_or_else(|| Error::not_found(format!("album {album_id} not found")))?;
            if album.artist_id != artist.id {
                return Err(Error::forbidden(format!(
                    "album {album_id} belongs to another artist"
                )));
            }
        }
        let song = draft.into_song(artist.id)?;
        self.catalogue
            .create_song(&song)
            .await
            .map_err(map_catalogue_error)?;
        info!(song_id = %song.id, artist_id = %artist.id, "song published");
        Ok(song)
    }

    async fn create_album(&self, caller: &Caller, draft: AlbumDraft) -> Result<Album, Error> {
        let artist = self.guard.require_artist_profile(caller).await?;
        require_claimed_artist(&artist, draft.artist_id)?;
        let album = draft.into_album(artist.id)?;
        self.catalogue
            .create_album(&album)
            .await
            .map_err(map_catalogue_error)?;
        info!(album_id = %album.id, artist_id = %artist.id, "album published");
        Ok(album)
    }

    async fn delete_song(&self, caller: &Caller, id: &Uuid) -> Result<(), Error> {
        self.guard
            .require_item_owner(caller, &ItemRef::song(*id))
            .await?;
        if !self
            .catalogue
            .delete_song(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(Error::not_found(format!("song {id} not found")));
        }
        info!(song_id = %id, "song deleted");
        Ok(())
    }

    async fn delete_album(&self, caller: &Caller, id: &Uuid) -> Result<(), Error> {
        self.guard
            .require_item_owner(caller, &ItemRef::album(*id))
            .await?;
        if !self
            .catalogue
            .delete_album(id)
            .await
            .map_err(map_catalogue_error)?
        {
            return Err(Error::not_found(format!("album {id} not found")));
        }
        info!(album_id = %id, "album deleted");
        Ok(())
    }

    async fn update_song(
        &self,
        caller: &Caller,
        id: &Uuid,
        update: SongUpdate,
    ) -> Result<Song, Error> {
        let CatalogueItem::Song(song) = self
            .guard
            .require_item_owner(caller, &ItemRef::song(*id))
            .await?
        else {
            return Err(Error::internal("catalogue returned an album for a song id"));
        };
        let song = update.apply(song)?;
        self.catalogue
            .update_song(&song)
            .await
            .map_err(map_catalogue_error)?;
        info!(song_id = %song.id, "song updated");
        Ok(song)
    }

    async fn update_album(
        &self,
        caller: &Caller,
        id: &Uuid,
        update: AlbumUpdate,
    ) -> Result<Album, Error> {
        let CatalogueItem::Album(album) = self
            .guard
            .require_item_owner(caller, &ItemRef::album(*id))
            .await?
        else {
            return Err(Error::internal("catalogue returned a song for an album id"));
        };
        let album = update.apply(album)?;
        self.catalogue
            .update_album(&album)
            .await
            .map_err(map_catalogue_error)?;
        info!(album_id = %album.id, "album updated");
        Ok(album)
    }

    async fn add_contributor(
        &self,
        caller: &Caller,
        contributor: Contributor,
    ) -> Result<Contributor, Error> {
        self.guard
            .require_item_owner(caller, &contributor.item)
            .await?;
        if self
            .catalogue
            .find_artist(&contributor.artist_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(Error::not_found(format!(
                "artist {} not found",
                contributor.artist_id
            )));
        }
        self.catalogue
            .add_contributor(&contributor)
            .await
            .map_err(map_catalogue_error)?;
        info!(
            item = %contributor.item,
            artist_id = %contributor.artist_id,
            contribution = contributor.contribution_type.as_str(),
            "contributor added"
        );
        Ok(contributor)
    }

    async fn contributors(&self, item: &ItemRef) -> Result<Vec<Contributor>, Error> {
        resolve_item(self.catalogue.as_ref(), item).await?;
        self.catalogue
            .list_contributors(item)
            .await
            .map_err(map_catalogue_error)
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
