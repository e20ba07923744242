//! Catalogue publishing, read, and edit handlers.
//!
//! ```text
//! POST /api/v1/songs {"title":"Rush","durationSeconds":185,"price":150}
//! POST /api/v1/albums {"title":"19 & Dangerous","price":900}
//! DELETE /api/v1/songs/{id}
//! DELETE /api/v1/albums/{id}
//! GET /api/v1/songs/{id}
//! PUT /api/v1/songs/{id} {"title":"New title","price":150}
//! GET /api/v1/albums/{id}
//! PUT /api/v1/albums/{id} {"description":"Deluxe edition"}
//! POST /api/v1/songs/{id}/contributors {"artistId":"…","contributionType":"producer","royaltyPercentage":10}
//! GET /api/v1/albums/{id}/contributors
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AlbumDraft, AlbumUpdate, Caller, ContributionType, Contributor, Error, ItemRef, RoyaltyShare,
    SongDraft, SongUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{AlbumResponse, ContributorResponse, SongResponse, map_all};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_date, parse_uuid, require};

const ID: FieldName = FieldName::new("id");
const TITLE: FieldName = FieldName::new("title");
const RELEASE_DATE: FieldName = FieldName::new("releaseDate");
const GENRE_ID: FieldName = FieldName::new("genreId");
const ARTIST_ID: FieldName = FieldName::new("artistId");

/// New song. `artistId`, when sent, must be the caller's own profile.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongBody {
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub album_id: Option<String>,
    pub duration_seconds: Option<i32>,
    /// Price in minor currency units; defaults to 0.
    pub price: Option<i64>,
    pub audio_url: Option<String>,
    pub preview_url: Option<String>,
    /// `YYYY-MM-DD`.
    pub release_date: Option<String>,
}

/// New album. `artistId`, when sent, must be the caller's own profile.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumBody {
    pub title: Option<String>,
    pub artist_id: Option<String>,
    pub description: Option<String>,
    /// Price in minor currency units; defaults to 0.
    pub price: Option<i64>,
    pub cover_image_url: Option<String>,
    /// `YYYY-MM-DD`.
    pub release_date: Option<String>,
}

fn optional_uuid(raw: Option<String>, field: FieldName) -> ApiResult<Option<Uuid>> {
    raw.map(|value| parse_uuid(value, field)).transpose()
}

fn optional_date(raw: Option<String>) -> ApiResult<Option<NaiveDate>> {
    raw.map(|value| parse_date(&value, RELEASE_DATE)).transpose()
}

impl TryFrom<SongBody> for SongDraft {
    type Error = Error;

    fn try_from(body: SongBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: require(body.title, TITLE)?,
            artist_id: optional_uuid(body.artist_id, ARTIST_ID)?,
            album_id: optional_uuid(body.album_id, FieldName::new("albumId"))?,
            duration_seconds: body.duration_seconds.unwrap_or(0),
            price: body.price.unwrap_or(0),
            audio_url: body.audio_url,
            preview_url: body.preview_url,
            release_date: optional_date(body.release_date)?,
        })
    }
}

impl TryFrom<AlbumBody> for AlbumDraft {
    type Error = Error;

    fn try_from(body: AlbumBody) -> Result<Self, Self::Error> {
        Ok(Self {
            title: require(body.title, TITLE)?,
            artist_id: optional_uuid(body.artist_id, ARTIST_ID)?,
            description: body.description,
            price: body.price.unwrap_or(0),
            cover_image_url: body.cover_image_url,
            release_date: optional_date(body.release_date)?,
        })
    }
}

/// Fields an artist may change on a song. Absent fields are left as is.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongUpdateBody {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub genre_id: Option<String>,
    pub preview_url: Option<String>,
}

/// Fields an artist may change on an album. Absent fields are left as is.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumUpdateBody {
    pub title: Option<String>,
    pub price: Option<i64>,
    pub genre_id: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContributorBody {
    pub artist_id: Option<String>,
    /// Free-form tag such as `producer` or `featured`.
    pub contribution_type: Option<String>,
    /// Share of royalties, 0 to 100.
    pub royalty_percentage: Option<i32>,
}

fn contributor_from_body(item: ItemRef, body: ContributorBody) -> ApiResult<Contributor> {
    Ok(Contributor {
        item,
        artist_id: parse_uuid(require(body.artist_id, ARTIST_ID)?, ARTIST_ID)?,
        contribution_type: ContributionType::new(&require(
            body.contribution_type,
            FieldName::new("contributionType"),
        )?)?,
        royalty_share: RoyaltyShare::new(body.royalty_percentage.unwrap_or(0))?,
    })
}

async fn add_contributor_to(
    state: &HttpState,
    caller: &Caller,
    item: ItemRef,
    body: ContributorBody,
) -> ApiResult<HttpResponse> {
    let contributor = contributor_from_body(item, body)?;
    let added = state.catalogue.add_contributor(caller, contributor).await?;
    Ok(HttpResponse::Created().json(ContributorResponse::from(added)))
}

async fn list_contributors_of(
    state: &HttpState,
    item: ItemRef,
) -> ApiResult<web::Json<Vec<ContributorResponse>>> {
    let contributors = state.catalogue.contributors(&item).await?;
    Ok(web::Json(map_all(contributors)))
}

/// Publish a song under the caller's artist profile.
#[utoipa::path(
    post,
    path = "/api/v1/songs",
    request_body = SongBody,
    responses(
        (status = 201, description = "Song published", body = SongResponse),
        (status = 400, description = "Invalid song fields", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "No artist profile, or another artist's id or album", body = ErrorSchema),
        (status = 404, description = "Album not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createSong",
    security(("bearer" = []))
)]
#[post("/songs")]
pub async fn create_song(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<SongBody>,
) -> ApiResult<HttpResponse> {
    let draft = SongDraft::try_from(payload.into_inner())?;
    let song = state.catalogue.create_song(auth.caller(), draft).await?;
    Ok(HttpResponse::Created().json(SongResponse::from(song)))
}

/// Withdraw a song. Only the owning artist may delete it.
#[utoipa::path(
    delete,
    path = "/api/v1/songs/{id}",
    params(("id" = String, Path, description = "Song id")),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Song belongs to another artist", body = ErrorSchema),
        (status = 404, description = "Song not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "deleteSong",
    security(("bearer" = []))
)]
#[delete("/songs/{id}")]
pub async fn delete_song(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner(), ID)?;
    state.catalogue.delete_song(auth.caller(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Publish an album under the caller's artist profile.
#[utoipa::path(
    post,
    path = "/api/v1/albums",
    request_body = AlbumBody,
    responses(
        (status = 201, description = "Album published", body = AlbumResponse),
        (status = 400, description = "Invalid album fields", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "No artist profile, or another artist's id", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createAlbum",
    security(("bearer" = []))
)]
#[post("/albums")]
pub async fn create_album(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<AlbumBody>,
) -> ApiResult<HttpResponse> {
    let draft = AlbumDraft::try_from(payload.into_inner())?;
    let album = state.catalogue.create_album(auth.caller(), draft).await?;
    Ok(HttpResponse::Created().json(AlbumResponse::from(album)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/albums/{id}",
    params(("id" = String, Path, description = "Album id")),
    responses(
        (status = 204, description = "Album deleted"),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Album belongs to another artist", body = ErrorSchema),
        (status = 404, description = "Album not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "deleteAlbum",
    security(("bearer" = []))
)]
#[delete("/albums/{id}")]
pub async fn delete_album(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner(), ID)?;
    state.catalogue.delete_album(auth.caller(), &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/v1/songs/{id}",
    params(("id" = String, Path, description = "Song id")),
    responses(
        (status = 200, description = "Song", body = SongResponse),
        (status = 404, description = "Song not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getSong",
    security([])
)]
#[get("/songs/{id}")]
pub async fn get_song(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<SongResponse>> {
    let id = parse_uuid(path.into_inner(), ID)?;
    Ok(web::Json(state.catalogue.song(&id).await?.into()))
}

/// Edit a song. Only the owning artist may edit, whatever the payload.
#[utoipa::path(
    put,
    path = "/api/v1/songs/{id}",
    params(("id" = String, Path, description = "Song id")),
    request_body = SongUpdateBody,
    responses(
        (status = 200, description = "Updated song", body = SongResponse),
        (status = 400, description = "Invalid title or price", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Song belongs to another artist", body = ErrorSchema),
        (status = 404, description = "Song not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "updateSong",
    security(("bearer" = []))
)]
#[put("/songs/{id}")]
pub async fn update_song(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<SongUpdateBody>,
) -> ApiResult<web::Json<SongResponse>> {
    let id = parse_uuid(path.into_inner(), ID)?;
    let body = payload.into_inner();
    let update = SongUpdate {
        title: body.title,
        price: body.price,
        genre_id: body
            .genre_id
            .map(|raw| parse_uuid(raw, GENRE_ID))
            .transpose()?,
        preview_url: body.preview_url,
    };
    let song = state.catalogue.update_song(auth.caller(), &id, update).await?;
    Ok(web::Json(song.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/albums/{id}",
    params(("id" = String, Path, description = "Album id")),
    responses(
        (status = 200, description = "Album", body = AlbumResponse),
        (status = 404, description = "Album not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getAlbum",
    security([])
)]
#[get("/albums/{id}")]
pub async fn get_album(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AlbumResponse>> {
    let id = parse_uuid(path.into_inner(), ID)?;
    Ok(web::Json(state.catalogue.album(&id).await?.into()))
}

/// Edit an album. Only the owning artist may edit, whatever the payload.
#[utoipa::path(
    put,
    path = "/api/v1/albums/{id}",
    params(("id" = String, Path, description = "Album id")),
    request_body = AlbumUpdateBody,
    responses(
        (status = 200, description = "Updated album", body = AlbumResponse),
        (status = 400, description = "Invalid title or price", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Album belongs to another artist", body = ErrorSchema),
        (status = 404, description = "Album not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "updateAlbum",
    security(("bearer" = []))
)]
#[put("/albums/{id}")]
pub async fn update_album(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<AlbumUpdateBody>,
) -> ApiResult<web::Json<AlbumResponse>> {
    let id = parse_uuid(path.into_inner(), ID)?;
    let body = payload.into_inner();
    let update = AlbumUpdate {
        title: body.title,
        price: body.price,
        genre_id: body
            .genre_id
            .map(|raw| parse_uuid(raw, GENRE_ID))
            .transpose()?,
        description: body.description,
    };
    let album = state
        .catalogue
        .update_album(auth.caller(), &id, update)
        .await?;
    Ok(web::Json(album.into()))
}

/// Credit an artist on a song the caller owns.
#[utoipa::path(
    post,
    path = "/api/v1/songs/{id}/contributors",
    params(("id" = String, Path, description = "Song id")),
    request_body = ContributorBody,
    responses(
        (status = 201, description = "Contributor added", body = ContributorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Song belongs to another artist", body = ErrorSchema),
        (status = 404, description = "Song or artist not found", body = ErrorSchema),
        (status = 409, description = "Contributor already credited", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "addSongContributor",
    security(("bearer" = []))
)]
#[post("/songs/{id}/contributors")]
pub async fn add_song_contributor(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ContributorBody>,
) -> ApiResult<HttpResponse> {
    let item = ItemRef::song(parse_uuid(path.into_inner(), ID)?);
    add_contributor_to(&state, auth.caller(), item, payload.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/songs/{id}/contributors",
    params(("id" = String, Path, description = "Song id")),
    responses(
        (status = 200, description = "Contributors", body = [ContributorResponse]),
        (status = 404, description = "Song not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listSongContributors",
    security([])
)]
#[get("/songs/{id}/contributors")]
pub async fn list_song_contributors(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ContributorResponse>>> {
    let item = ItemRef::song(parse_uuid(path.into_inner(), ID)?);
    list_contributors_of(&state, item).await
}

/// Credit an artist on an album the caller owns.
#[utoipa::path(
    post,
    path = "/api/v1/albums/{id}/contributors",
    params(("id" = String, Path, description = "Album id")),
    request_body = ContributorBody,
    responses(
        (status = 201, description = "Contributor added", body = ContributorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Album belongs to another artist", body = ErrorSchema),
        (status = 404, description = "Album or artist not found", body = ErrorSchema),
        (status = 409, description = "Contributor already credited", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "addAlbumContributor",
    security(("bearer" = []))
)]
#[post("/albums/{id}/contributors")]
pub async fn add_album_contributor(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<ContributorBody>,
) -> ApiResult<HttpResponse> {
    let item = ItemRef::album(parse_uuid(path.into_inner(), ID)?);
    add_contributor_to(&state, auth.caller(), item, payload.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/v1/albums/{id}/contributors",
    params(("id" = String, Path, description = "Album id")),
    responses(
        (status = 200, description = "Contributors", body = [ContributorResponse]),
        (status = 404, description = "Album not found", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listAlbumContributors",
    security([])
)]
#[get("/albums/{id}/contributors")]
pub async fn list_album_contributors(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ContributorResponse>>> {
    let item = ItemRef::album(parse_uuid(path.into_inner(), ID)?);
    list_contributors_of(&state, item).await
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
