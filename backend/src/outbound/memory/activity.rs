//! Moderation flags, playlists, and play events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{
    ContentFlagRepository, ContentFlagRepositoryError, PlaylistRepository,
    PlaylistRepositoryError, StreamRepository, StreamRepositoryError,
};
use crate::domain::{
    ContentFlag, FlagStatus, Playlist, PlaylistEntry, ReorderBatch, Song, StreamEvent,
};

use super::InMemoryMarketplace;

#[async_trait]
impl ContentFlagRepository for InMemoryMarketplace {
    async fn insert(&self, flag: &ContentFlag) -> Result<(), ContentFlagRepositoryError> {
        self.lock().flags.insert(flag.id, flag.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: &Uuid,
        status: FlagStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<ContentFlag>, ContentFlagRepositoryError> {
        Ok(self.lock().flags.get_mut(id).map(|flag| {
            flag.status = status;
            flag.updated_at = updated_at;
            flag.clone()
        }))
    }

    async fn list_by_status(
        &self,
        status: FlagStatus,
    ) -> Result<Vec<ContentFlag>, ContentFlagRepositoryError> {
        let mut flags: Vec<ContentFlag> = self
            .lock()
            .flags
            .values()
            .filter(|flag| flag.status == status)
            .cloned()
            .collect();
        flags.sort_by_key(|flag| flag.created_at);
        Ok(flags)
    }
}

#[async_trait]
impl PlaylistRepository for InMemoryMarketplace {
    async fn create(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError> {
        let mut state = self.lock();
        state.playlists.insert(playlist.id, playlist.clone());
        state.playlist_entries.entry(playlist.id).or_default();
        Ok(())
    }

    async fn find(&self, id: &Uuid) -> Result<Option<Playlist>, PlaylistRepositoryError> {
        Ok(self.lock().playlists.get(id).cloned())
    }

    async fn update(&self, playlist: &Playlist) -> Result<(), PlaylistRepositoryError> {
        let mut state = self.lock();
        let stored = state.playlists.get_mut(&playlist.id).ok_or_else(|| {
            PlaylistRepositoryError::query(format!("playlist {} vanished", playlist.id))
        })?;
        stored.title.clone_from(&playlist.title);
        stored.description.clone_from(&playlist.description);
        stored.is_public = playlist.is_public;
        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, PlaylistRepositoryError> {
        let mut state = self.lock();
        state.playlist_entries.remove(id);
        Ok(state.playlists.remove(id).is_some())
    }

    async fn entries(
        &self,
        playlist_id: &Uuid,
    ) -> Result<Vec<PlaylistEntry>, PlaylistRepositoryError> {
        let mut entries = self
            .lock()
            .playlist_entries
            .get(playlist_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by_key(|entry| (entry.position, entry.added_at));
        Ok(entries)
    }

    async fn songs(&self, playlist_id: &Uuid) -> Result<Vec<Song>, PlaylistRepositoryError> {
        let state = self.lock();
        let mut entries = state
            .playlist_entries
            .get(playlist_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by_key(|entry| (entry.position, entry.added_at));
        Ok(entries
            .iter()
            .filter_map(|entry| state.songs.get(&entry.song_id).cloned())
            .collect())
    }

    async fn append_song(
        &self,
        playlist_id: &Uuid,
        song_id: &Uuid,
        added_at: DateTime<Utc>,
    ) -> Result<PlaylistEntry, PlaylistRepositoryError> {
        let mut state = self.lock();
        let entries = state.playlist_entries.entry(*playlist_id).or_default();
        if entries.iter().any(|entry| &entry.song_id == song_id) {
            return Err(PlaylistRepositoryError::duplicate_entry(*song_id));
        }
        let position = match entries.iter().map(|entry| entry.position).max() {
            Some(last) => last
                .checked_add(1)
                .ok_or_else(PlaylistRepositoryError::positions_exhausted)?,
            None => 0,
        };
        let entry = PlaylistEntry {
            song_id: *song_id,
            position,
            added_at,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn remove_song(
        &self,
        playlist_id: &Uuid,
        song_id: &Uuid,
    ) -> Result<bool, PlaylistRepositoryError> {
        let mut state = self.lock();
        let Some(entries) = state.playlist_entries.get_mut(playlist_id) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|entry| &entry.song_id != song_id);
        Ok(entries.len() != before)
    }

    async fn reorder(
        &self,
        playlist_id: &Uuid,
        batch: &ReorderBatch,
    ) -> Result<(), PlaylistRepositoryError> {
        let mut state = self.lock();
        let entries = state.playlist_entries.entry(*playlist_id).or_default();
        let mut staged = entries.clone();
        for update in batch.positions() {
            let entry = staged
                .iter_mut()
                .find(|entry| entry.song_id == update.song_id)
                .ok_or_else(|| PlaylistRepositoryError::missing_entry(update.song_id))?;
            entry.position = update.position;
        }
        *entries = staged;
        Ok(())
    }
}

#[async_trait]
impl StreamRepository for InMemoryMarketplace {
    async fn record(&self, event: &StreamEvent) -> Result<(), StreamRepositoryError> {
        let mut state = self.lock();
        let song = state.songs.get_mut(&event.song_id).ok_or_else(|| {
            StreamRepositoryError::query(format!("song {} does not exist", event.song_id))
        })?;
        song.plays_count = song.plays_count.saturating_add(1);
        state.streams.push(event.clone());
        Ok(())
    }

    async fn count_since(
        &self,
        song_id: &Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64, StreamRepositoryError> {
        let count = self
            .lock()
            .streams
            .iter()
            .filter(|event| &event.song_id == song_id && event.streamed_at >= since)
            .count();
        i64::try_from(count).map_err(|err| StreamRepositoryError::query(err.to_string()))
    }
}
