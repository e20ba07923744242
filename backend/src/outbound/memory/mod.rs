//! In-memory adapters for every driven port.
//!
//! Used when no database is configured and by tests. All state sits behind
//! one mutex, so each port call observes and mutates a consistent snapshot;
//! that gives the same uniqueness and all-or-nothing guarantees the
//! PostgreSQL adapters get from constraints and transactions.

mod activity;
mod catalogue;
mod ledger;

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use crate::domain::{
    Album, Artist, ContentFlag, Contributor, MonthlyRoyalty, Playlist, PlaylistEntry, Purchase,
    RoyaltyPeriod, Song, StreamEvent, Tip, UserAccount, UserId,
};

#[derive(Default)]
struct MarketplaceState {
    users: HashMap<UserId, UserAccount>,
    artists: HashMap<Uuid, Artist>,
    songs: HashMap<Uuid, Song>,
    albums: HashMap<Uuid, Album>,
    contributors: Vec<Contributor>,
    purchases: Vec<Purchase>,
    tips: Vec<Tip>,
    royalties: HashMap<(Uuid, RoyaltyPeriod), MonthlyRoyalty>,
    flags: HashMap<Uuid, ContentFlag>,
    playlists: HashMap<Uuid, Playlist>,
    playlist_entries: HashMap<Uuid, Vec<PlaylistEntry>>,
    streams: Vec<StreamEvent>,
}

/// Process-local marketplace store.
#[derive(Default)]
pub struct InMemoryMarketplace {
    state: Mutex<MarketplaceState>,
}

impl InMemoryMarketplace {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MarketplaceState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn insert_user(&self, account: UserAccount) {
        self.lock().users.insert(account.id.clone(), account);
    }

    pub fn insert_artist(&self, artist: Artist) {
        self.lock().artists.insert(artist.id, artist);
    }

    pub fn insert_song(&self, song: Song) {
        self.lock().songs.insert(song.id, song);
    }

    pub fn insert_album(&self, album: Album) {
        self.lock().albums.insert(album.id, album);
    }

    /// Stored account with its current roles.
    pub fn account(&self, id: &UserId) -> Option<UserAccount> {
        self.lock().users.get(id).cloned()
    }

    /// Current play counter of a song, if it exists.
    pub fn plays_count(&self, song_id: &Uuid) -> Option<i64> {
        self.lock().songs.get(song_id).map(|song| song.plays_count)
    }

    /// Number of purchase rows held; used to assert at-most-once recording.
    pub fn purchase_count(&self) -> usize {
        self.lock().purchases.len()
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
