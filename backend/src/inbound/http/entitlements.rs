//! Purchase and library handlers.
//!
//! ```text
//! POST /api/v1/purchases/songs {"userId":"…","songId":"…"}
//! POST /api/v1/purchases/albums {"userId":"…","albumId":"…"}
//! GET /api/v1/users/{id}/purchases?kind=song
//! GET /api/v1/users/{id}/library/songs
//! GET /api/v1/users/{id}/library/albums
//! GET /api/v1/songs/{id}/ownership
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ItemRef, PurchaseRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{AlbumResponse, PurchaseResponse, SongResponse, map_all};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_item_kind, parse_user_id, parse_uuid, require,
};

const USER_ID: FieldName = FieldName::new("userId");
const SONG_ID: FieldName = FieldName::new("songId");
const ALBUM_ID: FieldName = FieldName::new("albumId");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongPurchaseRequest {
    pub user_id: Option<String>,
    pub song_id: Option<String>,
    /// Reference issued by the payment gateway.
    pub payment_reference: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumPurchaseRequest {
    pub user_id: Option<String>,
    pub album_id: Option<String>,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Restrict to `song` or `album` purchases.
    pub kind: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnershipResponse {
    pub owned: bool,
}

/// Buy a song for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/purchases/songs",
    request_body = SongPurchaseRequest,
    responses(
        (status = 201, description = "Purchase recorded", body = PurchaseResponse),
        (status = 400, description = "Invalid request or already owned", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "userId is not the caller", body = ErrorSchema),
        (status = 404, description = "Song not found", body = ErrorSchema)
    ),
    tags = ["purchases"],
    operation_id = "purchaseSong",
    security(("bearer" = []))
)]
#[post("/purchases/songs")]
pub async fn purchase_song(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<SongPurchaseRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = PurchaseRequest {
        user_id: parse_user_id(require(body.user_id, USER_ID)?, USER_ID)?,
        item: ItemRef::song(parse_uuid(require(body.song_id, SONG_ID)?, SONG_ID)?),
        payment_reference: body.payment_reference,
    };
    let purchase = state.entitlements.purchase_item(auth.caller(), request).await?;
    Ok(HttpResponse::Created().json(PurchaseResponse::from(purchase)))
}

/// Buy an album for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/purchases/albums",
    request_body = AlbumPurchaseRequest,
    responses(
        (status = 201, description = "Purchase recorded", body = PurchaseResponse),
        (status = 400, description = "Invalid request or already owned", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "userId is not the caller", body = ErrorSchema),
        (status = 404, description = "Album not found", body = ErrorSchema)
    ),
    tags = ["purchases"],
    operation_id = "purchaseAlbum",
    security(("bearer" = []))
)]
#[post("/purchases/albums")]
pub async fn purchase_album(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<AlbumPurchaseRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = PurchaseRequest {
        user_id: parse_user_id(require(body.user_id, USER_ID)?, USER_ID)?,
        item: ItemRef::album(parse_uuid(require(body.album_id, ALBUM_ID)?, ALBUM_ID)?),
        payment_reference: body.payment_reference,
    };
    let purchase = state.entitlements.purchase_item(auth.caller(), request).await?;
    Ok(HttpResponse::Created().json(PurchaseResponse::from(purchase)))
}

/// Purchase history of a user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/purchases",
    params(("id" = String, Path, description = "User id"), HistoryQuery),
    responses(
        (status = 200, description = "Purchases", body = [PurchaseResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Not the caller's history", body = ErrorSchema)
    ),
    tags = ["purchases"],
    operation_id = "purchaseHistory",
    security(("bearer" = []))
)]
#[get("/users/{id}/purchases")]
pub async fn purchase_history(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
) -> ApiResult<web::Json<Vec<PurchaseResponse>>> {
    let user_id = parse_user_id(path.into_inner(), FieldName::new("id"))?;
    let kind = query
        .into_inner()
        .kind
        .map(|raw| parse_item_kind(&raw, FieldName::new("kind")))
        .transpose()?;
    let purchases = state
        .entitlements
        .purchase_history(auth.caller(), &user_id, kind)
        .await?;
    Ok(web::Json(map_all(purchases)))
}

/// Songs the user owns directly.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/library/songs",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Owned songs", body = [SongResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Not the caller's library", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "ownedSongs",
    security(("bearer" = []))
)]
#[get("/users/{id}/library/songs")]
pub async fn owned_songs(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<SongResponse>>> {
    let user_id = parse_user_id(path.into_inner(), FieldName::new("id"))?;
    let songs = state.entitlements.owned_songs(auth.caller(), &user_id).await?;
    Ok(web::Json(map_all(songs)))
}

/// Albums the user owns.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/library/albums",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Owned albums", body = [AlbumResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Not the caller's library", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "ownedAlbums",
    security(("bearer" = []))
)]
#[get("/users/{id}/library/albums")]
pub async fn owned_albums(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<AlbumResponse>>> {
    let user_id = parse_user_id(path.into_inner(), FieldName::new("id"))?;
    let albums = state.entitlements.owned_albums(auth.caller(), &user_id).await?;
    Ok(web::Json(map_all(albums)))
}

/// Whether the caller holds a completed purchase of the song.
#[utoipa::path(
    get,
    path = "/api/v1/songs/{id}/ownership",
    params(("id" = String, Path, description = "Song id")),
    responses(
        (status = 200, description = "Ownership flag", body = OwnershipResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema)
    ),
    tags = ["library"],
    operation_id = "songOwnership",
    security(("bearer" = []))
)]
#[get("/songs/{id}/ownership")]
pub async fn song_ownership(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<OwnershipResponse>> {
    let song_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let owned = state
        .entitlements
        .is_owned(auth.caller().user_id(), &ItemRef::song(song_id))
        .await?;
    Ok(web::Json(OwnershipResponse { owned }))
}

#[cfg(test)]
#[path = "entitlements_tests.rs"]
mod tests;
