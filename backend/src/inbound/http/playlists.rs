//! Playlist handlers.
//!
//! ```text
//! POST /api/v1/users/{id}/playlists {"title":"Road trip","isPublic":true}
//! GET /api/v1/playlists/{id}
//! PUT /api/v1/playlists/{id} {"title":"Night drive","isPublic":false}
//! DELETE /api/v1/playlists/{id}
//! GET /api/v1/playlists/{id}/songs
//! POST /api/v1/playlists/{id}/songs {"songId":"…"}
//! DELETE /api/v1/playlists/{id}/songs/{songId}
//! PUT /api/v1/playlists/{id}/order {"songs":[{"songId":"…","position":0}]}
//! ```
//!
//! Reads accept anonymous callers; private playlists answer `403` to anyone
//! but their owner.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PlaylistDraft, PlaylistUpdate, ReorderBatch, SongPosition};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Authenticated, MaybeAuthenticated};
use crate::inbound::http::dto::{PlaylistEntryResponse, PlaylistResponse, SongResponse, map_all};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_user_id, parse_uuid, require};

const ID: FieldName = FieldName::new("id");
const SONG_ID: FieldName = FieldName::new("songId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistBody {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Defaults to private.
    #[serde(default)]
    pub is_public: bool,
}

/// Owner edits. Absent fields keep their current value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistUpdateBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongBody {
    pub song_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongPositionBody {
    pub song_id: Option<String>,
    pub position: Option<i32>,
}

/// Position updates applied together; any failure leaves the order untouched.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReorderBody {
    #[serde(default)]
    pub songs: Vec<SongPositionBody>,
}

impl TryFrom<ReorderBody> for ReorderBatch {
    type Error = crate::domain::Error;

    fn try_from(body: ReorderBody) -> Result<Self, Self::Error> {
        let positions = body
            .songs
            .into_iter()
            .map(|entry| {
                Ok(SongPosition {
                    song_id: parse_uuid(require(entry.song_id, SONG_ID)?, SONG_ID)?,
                    position: require(entry.position, FieldName::new("position"))?,
                })
            })
            .collect::<Result<Vec<_>, Self::Error>>()?;
        ReorderBatch::new(positions)
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/playlists",
    params(("id" = String, Path, description = "Owner user id")),
    request_body = PlaylistBody,
    responses(
        (status = 201, description = "Playlist created", body = PlaylistResponse),
        (status = 400, description = "Invalid title", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Owner is not the caller", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "createPlaylist",
    security(("bearer" = []))
)]
#[post("/users/{id}/playlists")]
pub async fn create_playlist(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<PlaylistBody>,
) -> ApiResult<HttpResponse> {
    let owner_id = parse_user_id(path.into_inner(), ID)?;
    let body = payload.into_inner();
    let title = require(body.title, FieldName::new("title"))?;
    let draft = PlaylistDraft::new(&title, body.description, body.is_public)?;
    let playlist = state
        .playlists
        .create(auth.caller(), &owner_id, draft)
        .await?;
    Ok(HttpResponse::Created().json(PlaylistResponse::from(playlist)))
}

#[utoipa::path(
    get,
    path = "/api/v1/playlists/{id}",
    params(("id" = String, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "Playlist", body = PlaylistResponse),
        (status = 403, description = "Playlist is private", body = ErrorSchema),
        (status = 404, description = "Playlist not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "getPlaylist",
    security((), ("bearer" = []))
)]
#[get("/playlists/{id}")]
pub async fn get_playlist(
    state: web::Data<HttpState>,
    auth: MaybeAuthenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<PlaylistResponse>> {
    let id = parse_uuid(path.into_inner(), ID)?;
    let playlist = state.playlists.playlist(auth.caller(), &id).await?;
    Ok(web::Json(playlist.into()))
}

#[utoipa::path(
    put,
    path = "/api/v1/playlists/{id}",
    params(("id" = String, Path, description = "Playlist id")),
    request_body = PlaylistUpdateBody,
    responses(
        (status = 200, description = "Updated playlist", body = PlaylistResponse),
        (status = 400, description = "Invalid title", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Playlist belongs to another user", body = ErrorSchema),
        (status = 404, description = "Playlist not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "updatePlaylist",
    security(("bearer" = []))
)]
#[put("/playlists/{id}")]
pub async fn update_playlist(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<PlaylistUpdateBody>,
) -> ApiResult<web::Json<PlaylistResponse>> {
    let id = parse_uuid(path.into_inner(), ID)?;
    let body = payload.into_inner();
    let update = PlaylistUpdate {
        title: body.title,
        description: body.description,
        is_public: body.is_public,
    };
    let playlist = state.playlists.update(auth.caller(), &id, update).await?;
    Ok(web::Json(playlist.into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{id}",
    params(("id" = String, Path, description = "Playlist id")),
    responses(
        (status = 204, description = "Playlist deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Playlist belongs to another user", body = ErrorSchema),
        (status = 404, description = "Playlist not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "deletePlaylist",
    security(("bearer" = []))
)]
#[delete("/playlists/{id}")]
pub async fn delete_playlist(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner(), ID)?;
    state.playlists.delete(auth.caller(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Songs in playlist order.
#[utoipa::path(
    get,
    path = "/api/v1/playlists/{id}/songs",
    params(("id" = String, Path, description = "Playlist id")),
    responses(
        (status = 200, description = "Songs in order", body = [SongResponse]),
        (status = 403, description = "Playlist is private", body = ErrorSchema),
        (status = 404, description = "Playlist not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "playlistSongs",
    security((), ("bearer" = []))
)]
#[get("/playlists/{id}/songs")]
pub async fn playlist_songs(
    state: web::Data<HttpState>,
    auth: MaybeAuthenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<SongResponse>>> {
    let id = parse_uuid(path.into_inner(), ID)?;
    let songs = state.playlists.songs(auth.caller(), &id).await?;
    Ok(web::Json(map_all(songs)))
}

/// Append a song to the end of a playlist.
#[utoipa::path(
    post,
    path = "/api/v1/playlists/{id}/songs",
    params(("id" = String, Path, description = "Playlist id")),
    request_body = PlaylistSongBody,
    responses(
        (status = 201, description = "Song added", body = PlaylistEntryResponse),
        (status = 403, description = "Not the playlist owner", body = ErrorSchema),
        (status = 404, description = "Playlist or song not found", body = ErrorSchema),
        (status = 409, description = "Song already in the playlist", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "addPlaylistSong",
    security(("bearer" = []))
)]
#[post("/playlists/{id}/songs")]
pub async fn add_song(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<PlaylistSongBody>,
) -> ApiResult<HttpResponse> {
    let playlist_id = parse_uuid(path.into_inner(), ID)?;
    let song_id = parse_uuid(require(payload.into_inner().song_id, SONG_ID)?, SONG_ID)?;
    let entry = state
        .playlists
        .add_song(auth.caller(), &playlist_id, &song_id)
        .await?;
    Ok(HttpResponse::Created().json(PlaylistEntryResponse::from(entry)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{id}/songs/{songId}",
    params(
        ("id" = String, Path, description = "Playlist id"),
        ("songId" = String, Path, description = "Song id")
    ),
    responses(
        (status = 204, description = "Song removed"),
        (status = 403, description = "Not the playlist owner", body = ErrorSchema),
        (status = 404, description = "Playlist or entry not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "removePlaylistSong",
    security(("bearer" = []))
)]
#[delete("/playlists/{id}/songs/{song_id}")]
pub async fn remove_song(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<(String, String)>,
) -> ApiResult<HttpResponse> {
    let (playlist_id, song_id) = path.into_inner();
    let playlist_id = parse_uuid(playlist_id, ID)?;
    let song_id = parse_uuid(song_id, SONG_ID)?;
    state
        .playlists
        .remove_song(auth.caller(), &playlist_id, &song_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Move songs to new positions in one atomic batch.
#[utoipa::path(
    put,
    path = "/api/v1/playlists/{id}/order",
    params(("id" = String, Path, description = "Playlist id")),
    request_body = ReorderBody,
    responses(
        (status = 200, description = "Entries in their new order", body = [PlaylistEntryResponse]),
        (status = 400, description = "Empty batch, duplicate song, or negative position", body = ErrorSchema),
        (status = 403, description = "Not the playlist owner", body = ErrorSchema),
        (status = 404, description = "Playlist or entry not found", body = ErrorSchema)
    ),
    tags = ["playlists"],
    operation_id = "reorderPlaylistSongs",
    security(("bearer" = []))
)]
#[put("/playlists/{id}/order")]
pub async fn reorder_songs(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ReorderBody>,
) -> ApiResult<web::Json<Vec<PlaylistEntryResponse>>> {
    let playlist_id = parse_uuid(path.into_inner(), ID)?;
    let batch = ReorderBatch::try_from(payload.into_inner())?;
    let entries = state
        .playlists
        .reorder_songs(auth.caller(), &playlist_id, batch)
        .await?;
    Ok(web::Json(map_all(entries)))
}

#[cfg(test)]
#[path = "playlists_tests.rs"]
mod tests;
