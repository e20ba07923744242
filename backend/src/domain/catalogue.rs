//! Catalogue entities: artists, songs, albums, and their contributors.
//!
//! Prices are integers in the smallest currency unit. Every song and album is
//! owned by exactly one [`Artist`], which in turn belongs to one user.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Error, UserId};

/// Kind of purchasable or flaggable catalogue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Song,
    Album,
}

impl ItemKind {
    /// Canonical lowercase name used in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Album => "album",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown [`ItemKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("item kind must be song or album, got {0}")]
pub struct ParseItemKindError(pub String);

impl FromStr for ItemKind {
    type Err = ParseItemKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "song" => Ok(Self::Song),
            "album" => Ok(Self::Album),
            other => Err(ParseItemKindError(other.to_owned())),
        }
    }
}

/// Reference to a song or album by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemRef {
    pub kind: ItemKind,
    pub id: Uuid,
}

impl ItemRef {
    pub const fn song(id: Uuid) -> Self {
        Self {
            kind: ItemKind::Song,
            id,
        }
    }

    pub const fn album(id: Uuid) -> Self {
        Self {
            kind: ItemKind::Album,
            id,
        }
    }
}

impl fmt::Display for ItemRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}

/// Artist profile linked one-to-one with a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artist {
    pub id: Uuid,
    pub user_id: UserId,
    pub name: String,
    pub verified: bool,
    /// Always non-negative.
    pub wallet_balance: i64,
    pub monthly_listeners: i64,
}

/// A published track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
    pub duration_seconds: i32,
    pub price: i64,
    pub audio_url: Option<String>,
    pub preview_url: Option<String>,
    pub plays_count: i64,
    pub is_flagged: bool,
    pub release_date: Option<NaiveDate>,
}

/// A published collection of songs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Album {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub genre_id: Option<Uuid>,
    pub description: Option<String>,
    pub price: i64,
    pub cover_image_url: Option<String>,
    pub is_flagged: bool,
    pub release_date: Option<NaiveDate>,
}

/// Resolved catalogue item with its owner and current list price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogueItem {
    Song(Song),
    Album(Album),
}

impl CatalogueItem {
    pub fn artist_id(&self) -> Uuid {
        match self {
            Self::Song(song) => song.artist_id,
            Self::Album(album) => album.artist_id,
        }
    }

    pub fn price(&self) -> i64 {
        match self {
            Self::Song(song) => song.price,
            Self::Album(album) => album.price,
        }
    }
}

/// Partial update applied to a song by its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongUpdate {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub genre_id: Option<Uuid>,
    pub preview_url: Option<String>,
}

/// Partial update applied to an album by its owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumUpdate {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub genre_id: Option<Uuid>,
    pub description: Option<String>,
}

fn validate_title(title: Option<&String>) -> Result<(), Error> {
    match title {
        Some(value) if value.trim().is_empty() => Err(Error::invalid_request("title must not be empty")),
        _ => Ok(()),
    }
}

fn validate_price(price: Option<i64>) -> Result<(), Error> {
    match price {
        Some(value) if value < 0 => Err(Error::invalid_amount("price must not be negative")),
        _ => Ok(()),
    }
}

impl SongUpdate {
    /// Apply the update to `song`, returning the new state.
    pub fn apply(self, mut song: Song) -> Result<Song, Error> {
        validate_title(self.title.as_ref())?;
        validate_price(self.price)?;
        if let Some(title) = self.title {
            song.title = title.trim().to_owned();
        }
        if let Some(price) = self.price {
            song.price = price;
        }
        if self.genre_id.is_some() {
            song.genre_id = self.genre_id;
        }
        if self.preview_url.is_some() {
            song.preview_url = self.preview_url;
        }
        Ok(song)
    }
}

impl AlbumUpdate {
    /// Apply the update to `album`, returning the new state.
    pub fn apply(self, mut album: Album) -> Result<Album, Error> {
        validate_title(self.title.as_ref())?;
        validate_price(self.price)?;
        if let Some(title) = self.title {
            album.title = title.trim().to_owned();
        }
        if let Some(price) = self.price {
            album.price = price;
        }
        if self.genre_id.is_some() {
            album.genre_id = self.genre_id;
        }
        if self.description.is_some() {
            album.description = self.description;
        }
        Ok(album)
    }
}

/// Maximum artist display name length.
pub const ARTIST_NAME_MAX: usize = 255;

/// Artist profile requested by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtistDraft {
    name: String,
}

impl ArtistDraft {
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_request("artistName must not be empty"));
        }
        if name.chars().count() > ARTIST_NAME_MAX {
            return Err(Error::invalid_request(format!(
                "artistName must be at most {ARTIST_NAME_MAX} characters"
            )));
        }
        Ok(Self {
            name: name.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unverified profile with an empty wallet.
    pub fn into_artist(self, user_id: UserId) -> Artist {
        Artist {
            id: Uuid::new_v4(),
            user_id,
            name: self.name,
            verified: false,
            wallet_balance: 0,
            monthly_listeners: 0,
        }
    }
}

/// New song submitted by an artist.
///
/// `artist_id`, when present, must name the caller's own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub artist_id: Option<Uuid>,
    pub album_id: Option<Uuid>,
    pub duration_seconds: i32,
    pub price: i64,
    pub audio_url: Option<String>,
    pub preview_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl SongDraft {
    /// Validate and build the song for `artist_id`.
    pub fn into_song(self, artist_id: Uuid) -> Result<Song, Error> {
        validate_title(Some(&self.title))?;
        validate_price(Some(self.price))?;
        if self.duration_seconds < 0 {
            return Err(Error::invalid_request("durationSeconds must not be negative"));
        }
        Ok(Song {
            id: Uuid::new_v4(),
            title: self.title.trim().to_owned(),
            artist_id,
            album_id: self.album_id,
            genre_id: None,
            duration_seconds: self.duration_seconds,
            price: self.price,
            audio_url: self.audio_url,
            preview_url: self.preview_url,
            plays_count: 0,
            is_flagged: false,
            release_date: self.release_date,
        })
    }
}

/// New album submitted by an artist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumDraft {
    pub title: String,
    pub artist_id: Option<Uuid>,
    pub description: Option<String>,
    pub price: i64,
    pub cover_image_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

impl AlbumDraft {
    pub fn into_album(self, artist_id: Uuid) -> Result<Album, Error> {
        validate_title(Some(&self.title))?;
        validate_price(Some(self.price))?;
        Ok(Album {
            id: Uuid::new_v4(),
            title: self.title.trim().to_owned(),
            artist_id,
            genre_id: None,
            description: self.description,
            price: self.price,
            cover_image_url: self.cover_image_url,
            is_flagged: false,
            release_date: self.release_date,
        })
    }
}

/// Maximum length of a contribution type tag.
pub const CONTRIBUTION_TYPE_MAX: usize = 100;

/// Free-form contribution tag such as `producer` or `featured`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContributionType(String);

impl ContributionType {
    /// Validate a tag; it is trimmed, lowercased and bounded in length.
    pub fn new(raw: &str) -> Result<Self, Error> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(Error::invalid_request("contributionType must not be empty"));
        }
        if normalized.chars().count() > CONTRIBUTION_TYPE_MAX {
            return Err(Error::invalid_request(format!(
                "contributionType must be at most {CONTRIBUTION_TYPE_MAX} characters"
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Royalty share granted to a contributor, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoyaltyShare(u8);

impl RoyaltyShare {
    pub fn new(percent: i32) -> Result<Self, Error> {
        u8::try_from(percent)
            .ok()
            .filter(|value| *value <= 100)
            .map(Self)
            .ok_or_else(|| Error::invalid_request("royaltyPercentage must be between 0 and 100"))
    }

    pub const fn percent(self) -> u8 {
        self.0
    }
}

/// Artist credited on a song or album.
///
/// `(item, artist_id, contribution_type)` is unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contributor {
    pub item: ItemRef,
    pub artist_id: Uuid,
    pub contribution_type: ContributionType,
    pub royalty_share: RoyaltyShare,
}
