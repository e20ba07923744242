//! Internal Diesel row structs for database operations.
//!
//! These types stay inside the persistence layer. Conversions into domain
//! types live next to the rows; conversions that parse stored enum text
//! return a message describing the corrupt value instead of panicking.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Album, Artist, ContentFlag, ContributionType, Contributor, FlagStatus, ItemKind, ItemRef,
    MonthlyRoyalty, PaymentStatus, Playlist, PlaylistEntry, Purchase, RoyaltyPeriod, RoyaltyShare,
    Song, Tip, UserId,
};

use super::schema::{
    albums, artist_tips, artists, content_flags, contributors, monthly_royalties, playlist_songs,
    playlists, purchases, songs, streams, user_roles, users,
};

fn parse_kind(raw: &str) -> Result<ItemKind, String> {
    raw.parse::<ItemKind>().map_err(|err| err.to_string())
}

// ---------------------------------------------------------------------------
// Accounts and catalogue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_roles)]
pub(crate) struct NewUserRoleRow {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ArtistRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub verified: bool,
    pub wallet_balance: i64,
    pub monthly_listeners: i64,
}

impl From<ArtistRow> for Artist {
    fn from(row: ArtistRow) -> Self {
        Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            name: row.name,
            verified: row.verified,
            wallet_balance: row.wallet_balance,
            monthly_listeners: row.monthly_listeners,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = artists)]
pub(crate) struct NewArtistRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: &'a str,
    pub verified: bool,
    pub wallet_balance: i64,
    pub monthly_listeners: i64,
}

impl<'a> From<&'a Artist> for NewArtistRow<'a> {
    fn from(artist: &'a Artist) -> Self {
        Self {
            id: artist.id,
            user_id: *artist.user_id.as_uuid(),
            name: &artist.name,
            verified: artist.verified,
            wallet_balance: artist.wallet_balance,
            monthly_listeners: artist.monthly_listeners,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = songs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SongRow {
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

impl From<SongRow> for Song {
    fn from(row: SongRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            artist_id: row.artist_id,
            album_id: row.album_id,
            genre_id: row.genre_id,
            duration_seconds: row.duration_seconds,
            price: row.price,
            audio_url: row.audio_url,
            preview_url: row.preview_url,
            plays_count: row.plays_count,
            is_flagged: row.is_flagged,
            release_date: row.release_date,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = songs)]
pub(crate) struct NewSongRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
    pub duration_seconds: i32,
    pub price: i64,
    pub audio_url: Option<&'a str>,
    pub preview_url: Option<&'a str>,
    pub plays_count: i64,
    pub is_flagged: bool,
    pub release_date: Option<NaiveDate>,
}

impl<'a> From<&'a Song> for NewSongRow<'a> {
    fn from(song: &'a Song) -> Self {
        Self {
            id: song.id,
            title: &song.title,
            artist_id: song.artist_id,
            album_id: song.album_id,
            genre_id: song.genre_id,
            duration_seconds: song.duration_seconds,
            price: song.price,
            audio_url: song.audio_url.as_deref(),
            preview_url: song.preview_url.as_deref(),
            plays_count: song.plays_count,
            is_flagged: song.is_flagged,
            release_date: song.release_date,
        }
    }
}

/// Editable song columns written by owner updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = songs)]
pub(crate) struct SongChangeset<'a> {
    pub title: &'a str,
    pub price: i64,
    pub genre_id: Option<Uuid>,
    pub preview_url: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = albums)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AlbumRow {
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

impl From<AlbumRow> for Album {
    fn from(row: AlbumRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            artist_id: row.artist_id,
            genre_id: row.genre_id,
            description: row.description,
            price: row.price,
            cover_image_url: row.cover_image_url,
            is_flagged: row.is_flagged,
            release_date: row.release_date,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = albums)]
pub(crate) struct NewAlbumRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub artist_id: Uuid,
    pub genre_id: Option<Uuid>,
    pub description: Option<&'a str>,
    pub price: i64,
    pub cover_image_url: Option<&'a str>,
    pub is_flagged: bool,
    pub release_date: Option<NaiveDate>,
}

impl<'a> From<&'a Album> for NewAlbumRow<'a> {
    fn from(album: &'a Album) -> Self {
        Self {
            id: album.id,
            title: &album.title,
            artist_id: album.artist_id,
            genre_id: album.genre_id,
            description: album.description.as_deref(),
            price: album.price,
            cover_image_url: album.cover_image_url.as_deref(),
            is_flagged: album.is_flagged,
            release_date: album.release_date,
        }
    }
}

/// Editable album columns written by owner updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = albums)]
pub(crate) struct AlbumChangeset<'a> {
    pub title: &'a str,
    pub price: i64,
    pub genre_id: Option<Uuid>,
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contributors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContributorRow {
    pub item_kind: String,
    pub item_id: Uuid,
    pub artist_id: Uuid,
    pub contribution_type: String,
    pub royalty_percentage: i32,
}

impl TryFrom<ContributorRow> for Contributor {
    type Error = String;

    fn try_from(row: ContributorRow) -> Result<Self, Self::Error> {
        Ok(Self {
            item: ItemRef {
                kind: parse_kind(&row.item_kind)?,
                id: row.item_id,
            },
            artist_id: row.artist_id,
            contribution_type: ContributionType::new(&row.contribution_type)
                .map_err(|err| err.to_string())?,
            royalty_share: RoyaltyShare::new(row.royalty_percentage)
                .map_err(|err| err.to_string())?,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contributors)]
pub(crate) struct NewContributorRow<'a> {
    pub item_kind: &'a str,
    pub item_id: Uuid,
    pub artist_id: Uuid,
    pub contribution_type: &'a str,
    pub royalty_percentage: i32,
}

// ---------------------------------------------------------------------------
// Ledgers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = purchases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PurchaseRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_kind: String,
    pub item_id: Uuid,
    pub price: i64,
    pub currency: String,
    pub payment_status: String,
    pub transaction_reference: Option<String>,
    pub purchased_at: DateTime<Utc>,
}

impl TryFrom<PurchaseRow> for Purchase {
    type Error = String;

    fn try_from(row: PurchaseRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: UserId::from_uuid(row.user_id),
            item: ItemRef {
                kind: parse_kind(&row.item_kind)?,
                id: row.item_id,
            },
            price: row.price,
            currency: row.currency,
            payment_status: row
                .payment_status
                .parse::<PaymentStatus>()
                .map_err(|err| err.to_string())?,
            transaction_reference: row.transaction_reference,
            purchased_at: row.purchased_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = purchases)]
pub(crate) struct NewPurchaseRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub item_kind: &'a str,
    pub item_id: Uuid,
    pub price: i64,
    pub currency: &'a str,
    pub payment_status: &'a str,
    pub transaction_reference: Option<&'a str>,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = artist_tips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TipRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub artist_id: Uuid,
    pub amount: i64,
    pub currency: String,
    pub message: Option<String>,
    pub payment_status: String,
    pub transaction_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<TipRow> for Tip {
    type Error = String;

    fn try_from(row: TipRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            sender_id: UserId::from_uuid(row.sender_id),
            artist_id: row.artist_id,
            amount: row.amount,
            currency: row.currency,
            message: row.message,
            payment_status: row
                .payment_status
                .parse::<PaymentStatus>()
                .map_err(|err| err.to_string())?,
            transaction_reference: row.transaction_reference,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = artist_tips)]
pub(crate) struct NewTipRow<'a> {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub artist_id: Uuid,
    pub amount: i64,
    pub currency: &'a str,
    pub message: Option<&'a str>,
    pub payment_status: &'a str,
    pub transaction_reference: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = monthly_royalties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RoyaltyRow {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub amount: i64,
    pub currency: String,
    pub paid_status: bool,
}

impl TryFrom<RoyaltyRow> for MonthlyRoyalty {
    type Error = String;

    fn try_from(row: RoyaltyRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            artist_id: row.artist_id,
            period: RoyaltyPeriod::new(row.year, row.month).map_err(|err| err.to_string())?,
            amount: row.amount,
            currency: row.currency,
            paid: row.paid_status,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = monthly_royalties)]
pub(crate) struct NewRoyaltyRow<'a> {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub amount: i64,
    pub currency: &'a str,
    pub paid_status: bool,
}

// ---------------------------------------------------------------------------
// Moderation, playlists, and streams
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = content_flags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FlagRow {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_kind: String,
    pub target_id: Uuid,
    pub reason: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<FlagRow> for ContentFlag {
    type Error = String;

    fn try_from(row: FlagRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            reporter_id: UserId::from_uuid(row.reporter_id),
            target: ItemRef {
                kind: parse_kind(&row.target_kind)?,
                id: row.target_id,
            },
            reason: row.reason,
            description: row.description,
            status: row
                .status
                .parse::<FlagStatus>()
                .map_err(|err| err.to_string())?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = content_flags)]
pub(crate) struct NewFlagRow<'a> {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_kind: &'a str,
    pub target_id: Uuid,
    pub reason: &'a str,
    pub description: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = playlists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaylistRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PlaylistRow> for Playlist {
    fn from(row: PlaylistRow) -> Self {
        Self {
            id: row.id,
            owner_id: UserId::from_uuid(row.owner_id),
            title: row.title,
            description: row.description,
            is_public: row.is_public,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = playlists)]
pub(crate) struct NewPlaylistRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Playlist columns an owner may change.
///
/// `description` is written as given, so `None` clears it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = playlists)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PlaylistChangeset<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub is_public: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = playlist_songs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PlaylistEntryRow {
    pub playlist_id: Uuid,
    pub song_id: Uuid,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

impl From<PlaylistEntryRow> for PlaylistEntry {
    fn from(row: PlaylistEntryRow) -> Self {
        Self {
            song_id: row.song_id,
            position: row.position,
            added_at: row.added_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = streams)]
pub(crate) struct NewStreamRow<'a> {
    pub id: Uuid,
    pub song_id: Uuid,
    pub user_id: Option<Uuid>,
    pub is_preview: bool,
    pub device_type: Option<&'a str>,
    pub country_code: Option<&'a str>,
    pub streamed_at: DateTime<Utc>,
}
