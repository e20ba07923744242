//! Tip and royalty handlers.
//!
//! ```text
//! POST /api/v1/tips {"senderId":"…","artistId":"…","amount":500}
//! GET /api/v1/artists/{id}/tips?limit=20
//! GET /api/v1/users/{id}/tips?limit=20
//! POST /api/v1/admin/royalties {"artistId":"…","year":2025,"month":3,"amount":100}
//! POST /api/v1/admin/royalties/{artistId}/{year}/{month}/paid
//! GET /api/v1/admin/royalties/pending
//! GET /api/v1/artists/{id}/royalties
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::DEFAULT_TIP_LIMIT;
use crate::domain::{DEFAULT_CURRENCY, RoyaltyPeriod, TipRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{RoyaltyResponse, TipResponse, map_all};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_i32, parse_user_id, parse_uuid, require,
};

const SENDER_ID: FieldName = FieldName::new("senderId");
const ARTIST_ID: FieldName = FieldName::new("artistId");
const AMOUNT: FieldName = FieldName::new("amount");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TipBody {
    pub sender_id: Option<String>,
    pub artist_id: Option<String>,
    /// Amount in minor currency units; must be positive.
    pub amount: Option<i64>,
    pub message: Option<String>,
    pub payment_reference: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LimitQuery {
    /// Maximum number of tips, 1 to 100.
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccrualBody {
    pub artist_id: Option<String>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    /// Amount to add, in minor currency units.
    pub amount: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingTotalResponse {
    pub amount: i64,
    pub currency: String,
}

/// Send a tip to an artist.
#[utoipa::path(
    post,
    path = "/api/v1/tips",
    request_body = TipBody,
    responses(
        (status = 201, description = "Tip recorded", body = TipResponse),
        (status = 400, description = "Invalid request or amount", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "senderId is not the caller", body = ErrorSchema),
        (status = 404, description = "Sender or artist not found", body = ErrorSchema)
    ),
    tags = ["tips"],
    operation_id = "sendTip",
    security(("bearer" = []))
)]
#[post("/tips")]
pub async fn send_tip(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<TipBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let request = TipRequest {
        sender_id: parse_user_id(require(body.sender_id, SENDER_ID)?, SENDER_ID)?,
        artist_id: parse_uuid(require(body.artist_id, ARTIST_ID)?, ARTIST_ID)?,
        amount: require(body.amount, AMOUNT)?,
        message: body.message,
        payment_reference: body.payment_reference,
    };
    let tip = state.royalties.send_tip(auth.caller(), request).await?;
    Ok(HttpResponse::Created().json(TipResponse::from(tip)))
}

/// Tips received by an artist, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/artists/{id}/tips",
    params(("id" = String, Path, description = "Artist id"), LimitQuery),
    responses(
        (status = 200, description = "Tips", body = [TipResponse]),
        (status = 400, description = "Invalid limit", body = ErrorSchema),
        (status = 403, description = "Not the artist or an admin", body = ErrorSchema),
        (status = 404, description = "Artist not found", body = ErrorSchema)
    ),
    tags = ["tips"],
    operation_id = "artistTips",
    security(("bearer" = []))
)]
#[get("/artists/{id}/tips")]
pub async fn artist_tips(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<TipResponse>>> {
    let artist_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let limit = query.limit.unwrap_or(DEFAULT_TIP_LIMIT);
    let tips = state
        .royalties
        .artist_tips(auth.caller(), &artist_id, limit)
        .await?;
    Ok(web::Json(map_all(tips)))
}

/// Tips sent by a user, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/tips",
    params(("id" = String, Path, description = "Sender user id"), LimitQuery),
    responses(
        (status = 200, description = "Tips", body = [TipResponse]),
        (status = 400, description = "Invalid limit", body = ErrorSchema),
        (status = 403, description = "Not the caller", body = ErrorSchema)
    ),
    tags = ["tips"],
    operation_id = "sentTips",
    security(("bearer" = []))
)]
#[get("/users/{id}/tips")]
pub async fn sent_tips(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    query: web::Query<LimitQuery>,
) -> ApiResult<web::Json<Vec<TipResponse>>> {
    let user_id = parse_user_id(path.into_inner(), FieldName::new("id"))?;
    let limit = query.limit.unwrap_or(DEFAULT_TIP_LIMIT);
    let tips = state
        .royalties
        .sent_tips(auth.caller(), &user_id, limit)
        .await?;
    Ok(web::Json(map_all(tips)))
}

/// Add to an artist's royalty for a month (admin only).
#[utoipa::path(
    post,
    path = "/api/v1/admin/royalties",
    request_body = AccrualBody,
    responses(
        (status = 200, description = "Accrued royalty row", body = RoyaltyResponse),
        (status = 400, description = "Invalid period or amount", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Artist not found", body = ErrorSchema)
    ),
    tags = ["royalties"],
    operation_id = "accrueRoyalty",
    security(("bearer" = []))
)]
#[post("/admin/royalties")]
pub async fn accrue_royalty(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<AccrualBody>,
) -> ApiResult<web::Json<RoyaltyResponse>> {
    let body = payload.into_inner();
    let artist_id = parse_uuid(require(body.artist_id, ARTIST_ID)?, ARTIST_ID)?;
    let period = RoyaltyPeriod::new(
        require(body.year, FieldName::new("year"))?,
        require(body.month, FieldName::new("month"))?,
    )?;
    let amount = require(body.amount, AMOUNT)?;
    let royalty = state
        .royalties
        .accrue_royalty(auth.caller(), &artist_id, period, amount)
        .await?;
    Ok(web::Json(RoyaltyResponse::from(royalty)))
}

/// Settle an artist's royalty for a month (admin only). One-way.
#[utoipa::path(
    post,
    path = "/api/v1/admin/royalties/{artistId}/{year}/{month}/paid",
    params(
        ("artistId" = String, Path, description = "Artist id"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = i32, Path, description = "Month, 1 to 12")
    ),
    responses(
        (status = 200, description = "Settled royalty row", body = RoyaltyResponse),
        (status = 400, description = "Invalid period", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "No royalty for the period", body = ErrorSchema),
        (status = 409, description = "Already paid", body = ErrorSchema)
    ),
    tags = ["royalties"],
    operation_id = "markRoyaltyPaid",
    security(("bearer" = []))
)]
#[post("/admin/royalties/{artist_id}/{year}/{month}/paid")]
pub async fn mark_paid(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<(String, String, String)>,
) -> ApiResult<web::Json<RoyaltyResponse>> {
    let (artist_id, year, month) = path.into_inner();
    let artist_id = parse_uuid(artist_id, ARTIST_ID)?;
    let period = RoyaltyPeriod::new(
        parse_i32(&year, FieldName::new("year"))?,
        parse_i32(&month, FieldName::new("month"))?,
    )?;
    let royalty = state
        .royalties
        .mark_paid(auth.caller(), &artist_id, period)
        .await?;
    Ok(web::Json(RoyaltyResponse::from(royalty)))
}

/// Total of all unpaid royalties (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/admin/royalties/pending",
    responses(
        (status = 200, description = "Unpaid total", body = PendingTotalResponse),
        (status = 403, description = "Admin role required", body = ErrorSchema)
    ),
    tags = ["royalties"],
    operation_id = "pendingRoyalties",
    security(("bearer" = []))
)]
#[get("/admin/royalties/pending")]
pub async fn pending_total(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<PendingTotalResponse>> {
    let amount = state.royalties.pending_total(auth.caller()).await?;
    Ok(web::Json(PendingTotalResponse {
        amount,
        currency: DEFAULT_CURRENCY.to_owned(),
    }))
}

/// Royalty rows of an artist, newest period first.
#[utoipa::path(
    get,
    path = "/api/v1/artists/{id}/royalties",
    params(("id" = String, Path, description = "Artist id")),
    responses(
        (status = 200, description = "Royalty rows", body = [RoyaltyResponse]),
        (status = 403, description = "Not the artist or an admin", body = ErrorSchema),
        (status = 404, description = "Artist not found", body = ErrorSchema)
    ),
    tags = ["royalties"],
    operation_id = "artistRoyalties",
    security(("bearer" = []))
)]
#[get("/artists/{id}/royalties")]
pub async fn artist_royalties(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<RoyaltyResponse>>> {
    let artist_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let rows = state
        .royalties
        .artist_royalties(auth.caller(), &artist_id)
        .await?;
    Ok(web::Json(map_all(rows)))
}

#[cfg(test)]
#[path = "royalties_tests.rs"]
mod tests;
