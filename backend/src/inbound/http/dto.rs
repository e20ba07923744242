//! Response bodies shared by several handler modules.
//!
//! Domain entities never serialise directly; each has a camelCase view here
//! so the wire format can change independently of the domain.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    Album, Artist, ContentFlag, Contributor, MonthlyRoyalty, Playlist, PlaylistEntry, Purchase,
    Song, StreamEvent, Tip, UserAccount,
};

/// Public view of an account; the password hash never leaves the server.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub roles: Vec<String>,
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        Self {
            id: *account.id.as_uuid(),
            email: account.email,
            username: account.username,
            roles: account
                .roles
                .into_iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtistResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub verified: bool,
    pub monthly_listeners: i64,
}

impl From<Artist> for ArtistResponse {
    fn from(artist: Artist) -> Self {
        Self {
            id: artist.id,
            user_id: *artist.user_id.as_uuid(),
            name: artist.name,
            verified: artist.verified,
            monthly_listeners: artist.monthly_listeners,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub id: Uuid,
    pub title: String,
    pub artist_id: Uuid,
    pub album_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
    pub duration_seconds: i32,
    /// Price in minor currency units.
    pub price: i64,
    pub preview_url: Option<String>,
    pub plays_count: i64,
    pub is_flagged: bool,
    pub release_date: Option<NaiveDate>,
}

impl From<Song> for SongResponse {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: song.title,
            artist_id: song.artist_id,
            album_id: song.album_id,
            genre_id: song.genre_id,
            duration_seconds: song.duration_seconds,
            price: song.price,
            preview_url: song.preview_url,
            plays_count: song.plays_count,
            is_flagged: song.is_flagged,
            release_date: song.release_date,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumResponse {
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

impl From<Album> for AlbumResponse {
    fn from(album: Album) -> Self {
        Self {
            id: album.id,
            title: album.title,
            artist_id: album.artist_id,
            genre_id: album.genre_id,
            description: album.description,
            price: album.price,
            cover_image_url: album.cover_image_url,
            is_flagged: album.is_flagged,
            release_date: album.release_date,
        }
    }
}

/// A completed purchase. `price` is the catalogue price at purchase time.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    /// `song` or `album`.
    pub item_kind: String,
    pub item_id: Uuid,
    pub price: i64,
    pub currency: String,
    pub payment_status: String,
    pub transaction_reference: Option<String>,
    pub purchased_at: DateTime<Utc>,
}

impl From<Purchase> for PurchaseResponse {
    fn from(purchase: Purchase) -> Self {
        Self {
            id: purchase.id,
            user_id: *purchase.user_id.as_uuid(),
            item_kind: purchase.item.kind.as_str().to_owned(),
            item_id: purchase.item.id,
            price: purchase.price,
            currency: purchase.currency,
            payment_status: purchase.payment_status.as_str().to_owned(),
            transaction_reference: purchase.transaction_reference,
            purchased_at: purchase.purchased_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TipResponse {
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

impl From<Tip> for TipResponse {
    fn from(tip: Tip) -> Self {
        Self {
            id: tip.id,
            sender_id: *tip.sender_id.as_uuid(),
            artist_id: tip.artist_id,
            amount: tip.amount,
            currency: tip.currency,
            message: tip.message,
            payment_status: tip.payment_status.as_str().to_owned(),
            transaction_reference: tip.transaction_reference,
            created_at: tip.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoyaltyResponse {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub amount: i64,
    pub currency: String,
    pub paid: bool,
}

impl From<MonthlyRoyalty> for RoyaltyResponse {
    fn from(royalty: MonthlyRoyalty) -> Self {
        Self {
            id: royalty.id,
            artist_id: royalty.artist_id,
            year: royalty.period.year(),
            month: royalty.period.month(),
            amount: royalty.amount,
            currency: royalty.currency,
            paid: royalty.paid,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlagResponse {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_kind: String,
    pub target_id: Uuid,
    pub reason: String,
    pub description: Option<String>,
    /// `pending`, `approved`, or `rejected`.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ContentFlag> for FlagResponse {
    fn from(flag: ContentFlag) -> Self {
        Self {
            id: flag.id,
            reporter_id: *flag.reporter_id.as_uuid(),
            target_kind: flag.target.kind.as_str().to_owned(),
            target_id: flag.target.id,
            reason: flag.reason,
            description: flag.description,
            status: flag.status.as_str().to_owned(),
            created_at: flag.created_at,
            updated_at: flag.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributorResponse {
    pub item_kind: String,
    pub item_id: Uuid,
    pub artist_id: Uuid,
    pub contribution_type: String,
    pub royalty_percentage: u8,
}

impl From<Contributor> for ContributorResponse {
    fn from(contributor: Contributor) -> Self {
        Self {
            item_kind: contributor.item.kind.as_str().to_owned(),
            item_id: contributor.item.id,
            artist_id: contributor.artist_id,
            contribution_type: contributor.contribution_type.as_str().to_owned(),
            royalty_percentage: contributor.royalty_share.percent(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Playlist> for PlaylistResponse {
    fn from(playlist: Playlist) -> Self {
        Self {
            id: playlist.id,
            owner_id: *playlist.owner_id.as_uuid(),
            title: playlist.title,
            description: playlist.description,
            is_public: playlist.is_public,
            created_at: playlist.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntryResponse {
    pub song_id: Uuid,
    pub position: i32,
    pub added_at: DateTime<Utc>,
}

impl From<PlaylistEntry> for PlaylistEntryResponse {
    fn from(entry: PlaylistEntry) -> Self {
        Self {
            song_id: entry.song_id,
            position: entry.position,
            added_at: entry.added_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    pub id: Uuid,
    pub song_id: Uuid,
    pub user_id: Option<Uuid>,
    pub is_preview: bool,
    pub device_type: Option<String>,
    pub country_code: Option<String>,
    pub streamed_at: DateTime<Utc>,
}

impl From<StreamEvent> for StreamResponse {
    fn from(event: StreamEvent) -> Self {
        Self {
            id: event.id,
            song_id: event.song_id,
            user_id: event.user_id.map(|id| *id.as_uuid()),
            is_preview: event.is_preview,
            device_type: event.device_type,
            country_code: event.country_code,
            streamed_at: event.streamed_at,
        }
    }
}

/// Map a list of domain values into response bodies.
pub(crate) fn map_all<T, R: From<T>>(items: Vec<T>) -> Vec<R> {
    items.into_iter().map(R::from).collect()
}
