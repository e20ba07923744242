//! Play recording with entitlement-gated full streams.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use mockable::Clock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::authorization::map_catalogue_error;
use crate::domain::ports::{
    CatalogueRepository, PurchaseRepository, PurchaseRepositoryError, StreamCommand,
    StreamRepository, StreamRepositoryError,
};
use crate::domain::{
    Caller, Error, ItemRef, STREAM_COUNT_WINDOW_DAYS, Song, StreamEvent, StreamRequest,
};

fn map_stream_error(error: StreamRepositoryError) -> Error {
    match error {
        StreamRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("stream log unavailable: {message}"))
        }
        StreamRepositoryError::Query { message } => {
            Error::internal(format!("stream log error: {message}"))
        }
    }
}

fn map_purchase_error(error: PurchaseRepositoryError) -> Error {
    match error {
        PurchaseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("purchase ledger unavailable: {message}"))
        }
        other => Error::internal(format!("purchase ledger error: {other}")),
    }
}

/// Repositories the stream service depends on.
pub struct StreamServiceDeps<C, P, S> {
    pub catalogue: Arc<C>,
    pub purchases: Arc<P>,
    pub streams: Arc<S>,
    pub clock: Arc<dyn Clock>,
}

pub struct StreamService<C, P, S> {
    catalogue: Arc<C>,
    purchases: Arc<P>,
    streams: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<C, P, S> StreamService<C, P, S> {
    pub fn new(deps: StreamServiceDeps<C, P, S>) -> Self {
        Self {
            catalogue: deps.catalogue,
            purchases: deps.purchases,
            streams: deps.streams,
            clock: deps.clock,
        }
    }
}

impl<C, P, S> StreamService<C, P, S>
where
    C: CatalogueRepository,
    P: PurchaseRepository,
{
    async fn may_stream_in_full(&self, caller: &Caller, song: &Song) -> Result<bool, Error> {
        let user_id = caller.user_id();
        if self
            .purchases
            .is_owned(user_id, &ItemRef::song(song.id))
            .await
            .map_err(map_purchase_error)?
        {
            return Ok(true);
        }
        if let Some(album_id) = song.album_id {
            if self
                .purchases
                .is_owned(user_id, &ItemRef::album(album_id))
                .await
                .map_err(map_purchase_error)?
            {
                return Ok(true);
            }
        }
        let artist = self
            .catalogue
            .find_artist_by_user(user_id)
            .await
            .map_err(map_catalogue_error)?;
        Ok(artist.is_some_and(|artist| artist.id == song.artist_id))
    }
}

#[async_trait]
impl<C, P, S> StreamCommand for StreamService<C, P, S>
where
    C: CatalogueRepository,
    P: PurchaseRepository,
    S: StreamRepository,
{
    async fn record(
        &self,
        caller: Option<&Caller>,
        request: StreamRequest,
    ) -> Result<StreamEvent, Error> {
        let song = self
            .catalogue
            .find_song(&request.song_id)
            .await
            .map_err(map_catalogue_error)?
            .ok_or_else(|| Error::not_found(format!("song {} not found", request.song_id)))?;

        if !request.is_preview {
            let Some(caller) = caller else {
                return Err(Error::unauthorized(
                    "sign in to stream full tracks; anonymous plays must be previews",
                ));
            };
            if !self.may_stream_in_full(caller, &song).await? {
                debug!(song_id = %song.id, user_id = %caller.user_id(), "full stream denied");
                return Err(Error::forbidden("purchase the song to stream it in full"));
            }
        }

        let event = StreamEvent::record(
            request,
            caller.map(|caller| caller.user_id().clone()),
            self.clock.utc(),
        )?;
        self.streams.record(&event).await.map_err(map_stream_error)?;
        info!(
            stream_id = %event.id,
            song_id = %event.song_id,
            preview = event.is_preview,
            "stream recorded"
        );
        Ok(event)
    }

    async fn recent_count(&self, song_id: &Uuid) -> Result<i64, Error> {
        if self
            .catalogue
            .find_song(song_id)
            .await
            .map_err(map_catalogue_error)?
            .is_none()
        {
            return Err(Error::not_found(format!("song {song_id} not found")));
        }
        let since = self.clock.utc() - Duration::days(STREAM_COUNT_WINDOW_DAYS);
        self.streams
            .count_since(song_id, since)
            .await
            .map_err(map_stream_error)
    }
}

#[cfg(test)]
#[path = "stream_service_tests.rs"]
mod tests;
