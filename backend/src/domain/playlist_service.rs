//! Playlist management.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::authorization::map_catalogue_error;
use crate::domain::ports::{
    CatalogueRepository, PlaylistCommand, PlaylistRepository, PlaylistRepositoryError,
};
use crate::domain::{
    Caller, Error, Playlist, PlaylistDraft, PlaylistEntry, PlaylistUpdate, ReorderBatch, Song,
    UserId, require_playlist_owner, require_self,
};

fn map_playlist_error(error: PlaylistRepositoryError) -> Error {
    match error {
        PlaylistRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("playlist store unavailable: {message}"))
        }
        PlaylistRepositoryError::Query { message } => {
            Error::internal(format!("playlist store error: {message}"))
        }
        PlaylistRepositoryError::DuplicateEntry { song_id } => {
            Error::conflict(format!("song {song_id} is already in the playlist"))
        }
        PlaylistRepositoryError::MissingEntry { song_id } => {
            Error::not_found(format!("song {song_id} is not in the playlist"))
        }
        PlaylistRepositoryError::PositionsExhausted => Error::conflict(
            "the playlist has no position left after its last song; reorder it first",
        ),
    }
}

pub struct PlaylistService<C, P> {
    catalogue: Arc<C>,
    playlists: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, P> PlaylistService<C, P> {
    pub fn new(catalogue: Arc<C>, playlists: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalogue,
            playlists,
            clock,
        }
    }
}

impl<C, P> PlaylistService<C, P>
where
    C: CatalogueRepository,
    P: PlaylistRepository,
{
    async fn load(&self, id: &Uuid) -> Result<Playlist, Error> {
        self.playlists
            .find(id)
            .await
            .map_err(map_playlist_error)?
            .ok_or_else(|| Error::not_found(format!("playlist {id} not found")))
    }

    async fn load_visible(&self, viewer: Option<&Caller>, id: &Uuid) -> Result<Playlist, Error> {
        let playlist = self.load(id).await?;
        if playlist.is_visible_to(viewer.map(Caller::user_id)) {
            Ok(playlist)
        } else {
            Err(Error::forbidden("playlist is private"))
        }
    }

    async fn load_owned(&self, caller: &Caller, id: &Uuid) -> Result<Playlist, Error> {
        let playlist = self.load(id).await?;
        require_playlist_owner(caller, &playlist)?;
        Ok(playlist)
    }
}

#[async_trait]
impl<C, P> PlaylistCommand for PlaylistService<C, P>
where
    C: CatalogueRepository,
    P: PlaylistRepository,
{
    async fn create(
        &self,
        caller: &Caller,
        owner_id: &UserId,
        draft: PlaylistDraft,
    ) -> Result<Playlist, Error> {
        require_self(caller, owner_id)?;
        let playlist = draft.into_playlist(owner_id.clone(), self.clock.utc());
        self.playlists
            .create(&playlist)
            .await
            .map_err(map_playlist_error)?;
        info!(playlist_id = %playlist.id, owner_id = %playlist.owner_id, "playlist created");
        Ok(playlist)
    }

    async fn playlist(&self, viewer: Option<&Caller>, id: &Uuid) -> Result<Playlist, Error> {
        self.load_visible(viewer, id).await
    }

    async fn update(
        &self,
        caller: &Caller,
        id: &Uuid,
        update: PlaylistUpdate,
    ) -> Result<Playlist, Error> {
        let playlist = update.apply(self.load_owned(caller, id).await?)?;
        self.playlists
            .update(&playlist)
            .await
            .map_err(map_playlist_error)?;
        info!(playlist_id = %playlist.id, "playlist updated");
        Ok(playlist)
    }

    async fn delete(&self, caller: &Caller, id: &Uuid) -> Result<(), Error> {
        self.load_owned(caller, id).await?;
        if !self.playlists.delete(id).await.map_err(map_playlist_error)? {
            return Err(Error::not_found(format!("playlist {id} not found")));
        }
        info!(playlist_id = %id, "playlist deleted");
        Ok(())
    }

    async fn songs(&self, viewer: Option<&Caller>, id: &Uuid) -> Result<Vec<Song>, Error> {
        self.load_visible(viewer, id).await?;
        self.playlists.songs(id).await.map_err(map_playlist_error)
    }

    async fn add_song(
        &self,
        caller: &Caller,
        playlist_id: &Uuid,
        song_id: &Uuid,
    ) -> Result<PlaylistEntry, Error> {
        self.load_owned(caller, playlist_id).await?;
        if self
            .catalogue
            .find_song(song_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("song {song_id} not found")));
        }
        self.playlists
            .append_song(playlist_id, song_id, self.clock.utc())
            .await
            .map_err(map_playlist_error)
    }

    async fn remove_song(
        &self,
        caller: &Caller,
        playlist_id: &Uuid,
        song_id: &Uuid,
    ) -> Result<(), Error> {
        self.load_owned(caller, playlist_id).await?;
        let removed = self
            .playlists
            .remove_song(playlist_id, song_id)
            .await
            .map_err(map_playlist_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!(
                "song {song_id} is not in the playlist"
            )))
        }
    }

    async fn reorder_songs(
        &self,
        caller: &Caller,
        playlist_id: &Uuid,
        batch: ReorderBatch,
    ) -> Result<Vec<PlaylistEntry>, Error> {
        self.load_owned(caller, playlist_id).await?;
        self.playlists
            .reorder(playlist_id, &batch)
            .await
            .map_err(map_playlist_error)?;
        info!(%playlist_id, updates = batch.positions().len(), "playlist reordered");
        self.playlists
            .entries(playlist_id)
            .await
            .map_err(map_playlist_error)
    }
}

#[cfg(test)]
#[path = "playlist_service_tests.rs"]
mod tests;
