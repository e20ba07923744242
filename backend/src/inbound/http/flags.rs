//! Content flag handlers.
//!
//! ```text
//! POST /api/v1/flags {"targetKind":"song","targetId":"…","reason":"spam"}
//! PUT /api/v1/flags/{id}/status {"status":"approved"}
//! GET /api/v1/flags?status=pending
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{FlagStatus, FlagSubmission};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{FlagResponse, map_all};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid, require};

const TARGET_ID: FieldName = FieldName::new("targetId");

/// Flag submission. The reporter is always the caller.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlagBody {
    /// `song` or `album`.
    #[serde(alias = "targetType")]
    pub target_kind: Option<String>,
    pub target_id: Option<String>,
    pub reason: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct FlagStatusBody {
    /// `pending`, `approved`, or `rejected`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct FlagListQuery {
    /// Defaults to `pending`.
    pub status: Option<String>,
}

/// Report a song or album.
#[utoipa::path(
    post,
    path = "/api/v1/flags",
    request_body = FlagBody,
    responses(
        (status = 201, description = "Flag opened", body = FlagResponse),
        (status = 400, description = "Invalid request or target kind", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 404, description = "Target not found", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "submitFlag",
    security(("bearer" = []))
)]
#[post("/flags")]
pub async fn submit_flag(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<FlagBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let submission = FlagSubmission {
        reporter_id: auth.caller().user_id().clone(),
        target_kind: require(body.target_kind, FieldName::new("targetKind"))?,
        target_id: parse_uuid(require(body.target_id, TARGET_ID)?, TARGET_ID)?,
        reason: require(body.reason, FieldName::new("reason"))?,
        description: body.description,
    };
    let flag = state.flags.submit(auth.caller(), submission).await?;
    Ok(HttpResponse::Created().json(FlagResponse::from(flag)))
}

/// Set the review status of a flag (admin only).
#[utoipa::path(
    put,
    path = "/api/v1/flags/{id}/status",
    params(("id" = String, Path, description = "Flag id")),
    request_body = FlagStatusBody,
    responses(
        (status = 200, description = "Updated flag", body = FlagResponse),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 404, description = "Flag not found", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "reviewFlag",
    security(("bearer" = []))
)]
#[put("/flags/{id}/status")]
pub async fn review_flag(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<String>,
    payload: web::Json<FlagStatusBody>,
) -> ApiResult<web::Json<FlagResponse>> {
    let flag_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let status = require(payload.into_inner().status, FieldName::new("status"))?;
    let flag = state.flags.review(auth.caller(), &flag_id, &status).await?;
    Ok(web::Json(FlagResponse::from(flag)))
}

/// Flags in a status, oldest first (admin only).
#[utoipa::path(
    get,
    path = "/api/v1/flags",
    params(FlagListQuery),
    responses(
        (status = 200, description = "Flags", body = [FlagResponse]),
        (status = 400, description = "Invalid status", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema)
    ),
    tags = ["moderation"],
    operation_id = "listFlags",
    security(("bearer" = []))
)]
#[get("/flags")]
pub async fn list_flags(
    state: web::Data<HttpState>,
    auth: Authenticated,
    query: web::Query<FlagListQuery>,
) -> ApiResult<web::Json<Vec<FlagResponse>>> {
    let status = match query.into_inner().status {
        Some(raw) => raw.parse::<FlagStatus>()?,
        None => FlagStatus::Pending,
    };
    let flags = state.flags.list(auth.caller(), status).await?;
    Ok(web::Json(map_all(flags)))
}
