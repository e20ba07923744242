//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the response schemas, and the
//! bearer token security scheme. The document is served by Swagger UI in
//! debug builds and exported via `cargo run --bin openapi-dump`.

use crate::inbound::http::accounts::{ArtistBody, RegistrationBody};
use crate::inbound::http::catalogue::{
    AlbumBody, AlbumUpdateBody, ContributorBody, SongBody, SongUpdateBody,
};
use crate::inbound::http::dto::{
    AccountResponse, AlbumResponse, ArtistResponse, ContributorResponse, FlagResponse, PlaylistEntryResponse, PlaylistResponse,
    PurchaseResponse, RoyaltyResponse, SongResponse, StreamResponse, TipResponse,
};
use crate::inbound::http::entitlements::{
    AlbumPurchaseRequest, OwnershipResponse, SongPurchaseRequest,
};
use crate::inbound::http::flags::{FlagBody, FlagStatusBody};
use crate::inbound::http::login::{LoginRequest, LoginResponse, LoginUser};
use crate::inbound::http::playlists::{
    PlaylistBody, PlaylistSongBody, PlaylistUpdateBody, ReorderBody, SongPositionBody,
};
use crate::inbound::http::royalties::{AccrualBody, PendingTotalResponse, TipBody};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::streams::{StreamBody, StreamCountResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer token scheme referenced by protected operations.
pub const BEARER_SCHEME: &str = "bearer";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Music marketplace API",
        description = "Accounts, catalogue, purchases, tips, royalties, moderation, playlists, and streams.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::login::login,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::create_admin,
        crate::inbound::http::accounts::create_artist,
        crate::inbound::http::entitlements::purchase_song,
        crate::inbound::http::entitlements::purchase_album,
        crate::inbound::http::entitlements::purchase_history,
        crate::inbound::http::entitlements::owned_songs,
        crate::inbound::http::entitlements::owned_albums,
        crate::inbound::http::entitlements::song_ownership,
        crate::inbound::http::royalties::send_tip,
        crate::inbound::http::royalties::artist_tips,
        crate::inbound::http::royalties::sent_tips,
        crate::inbound::http::royalties::accrue_royalty,
        crate::inbound::http::royalties::mark_paid,
        crate::inbound::http::royalties::pending_total,
        crate::inbound::http::royalties::artist_royalties,
        crate::inbound::http::flags::submit_flag,
        crate::inbound::http::flags::review_flag,
        crate::inbound::http::flags::list_flags,
        crate::inbound::http::catalogue::create_song,
        crate::inbound::http::catalogue::delete_song,
        crate::inbound::http::catalogue::create_album,
        crate::inbound::http::catalogue::delete_album,
        crate::inbound::http::catalogue::get_song,
        crate::inbound::http::catalogue::update_song,
        crate::inbound::http::catalogue::get_album,
        crate::inbound::http::catalogue::update_album,
        crate::inbound::http::catalogue::add_song_contributor,
        crate::inbound::http::catalogue::list_song_contributors,
        crate::inbound::http::catalogue::add_album_contributor,
        crate::inbound::http::catalogue::list_album_contributors,
        crate::inbound::http::playlists::create_playlist,
        crate::inbound::http::playlists::get_playlist,
        crate::inbound::http::playlists::update_playlist,
        crate::inbound::http::playlists::delete_playlist,
        crate::inbound::http::playlists::playlist_songs,
        crate::inbound::http::playlists::add_song,
        crate::inbound::http::playlists::remove_song,
        crate::inbound::http::playlists::reorder_songs,
        crate::inbound::http::streams::record_stream,
        crate::inbound::http::streams::stream_count,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        LoginResponse,
        LoginUser,
        RegistrationBody,
        AccountResponse,
        ArtistBody,
        ArtistResponse,
        SongPurchaseRequest,
        AlbumPurchaseRequest,
        OwnershipResponse,
        PurchaseResponse,
        TipBody,
        TipResponse,
        AccrualBody,
        RoyaltyResponse,
        PendingTotalResponse,
        FlagBody,
        FlagStatusBody,
        FlagResponse,
        SongResponse,
        AlbumResponse,
        SongBody,
        AlbumBody,
        SongUpdateBody,
        AlbumUpdateBody,
        ContributorBody,
        ContributorResponse,
        PlaylistBody,
        PlaylistUpdateBody,
        PlaylistSongBody,
        SongPositionBody,
        ReorderBody,
        PlaylistResponse,
        PlaylistEntryResponse,
        StreamBody,
        StreamResponse,
        StreamCountResponse,
    )),
    tags(
        (name = "auth", description = "Token issuance"),
        (name = "accounts", description = "Sign-up and artist profiles"),
        (name = "purchases", description = "Song and album purchases"),
        (name = "library", description = "Owned items and ownership checks"),
        (name = "tips", description = "Tips from listeners to artists"),
        (name = "royalties", description = "Monthly royalty accrual and settlement"),
        (name = "moderation", description = "Content flags"),
        (name = "catalogue", description = "Songs, albums, and contributor credits"),
        (name = "playlists", description = "User playlists"),
        (name = "streams", description = "Play events"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
