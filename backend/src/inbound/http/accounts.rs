//! Sign-up and artist onboarding handlers.
//!
//! ```text
//! POST /api/v1/users {"email":"ada@example.com","username":"ada","password":"…"}
//! POST /api/v1/admin/users {"email":"ops@example.com","username":"ops","password":"…"}
//! POST /api/v1/artists {"artistName":"Ada"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{ArtistDraft, Error, Registration, RegistrationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{AccountResponse, ArtistResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require};

const EMAIL: FieldName = FieldName::new("email");
const USERNAME: FieldName = FieldName::new("username");
const PASSWORD: FieldName = FieldName::new("password");

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationBody {
    pub email: Option<String>,
    pub username: Option<String>,
    /// Plaintext; at least eight characters.
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArtistBody {
    pub artist_name: Option<String>,
}

fn map_registration_error(err: RegistrationError) -> Error {
    let (field, code) = match err {
        RegistrationError::InvalidEmail => ("email", "invalid_email"),
        RegistrationError::InvalidUsername => ("username", "invalid_username"),
        RegistrationError::WeakPassword => ("password", "weak_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn registration_from_body(body: RegistrationBody) -> ApiResult<Registration> {
    let email = require(body.email, EMAIL)?;
    let username = require(body.username, USERNAME)?;
    let password = zeroize::Zeroizing::new(require(body.password, PASSWORD)?);
    Registration::try_from_parts(&email, &username, &password).map_err(map_registration_error)
}

/// Create a listener account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegistrationBody,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid email, username, or password", body = ErrorSchema),
        (status = 409, description = "Email or username already taken", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegistrationBody>,
) -> ApiResult<HttpResponse> {
    let registration = registration_from_body(payload.into_inner())?;
    let account = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Create an administrator account. Admin only.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users",
    request_body = RegistrationBody,
    responses(
        (status = 201, description = "Admin account created", body = AccountResponse),
        (status = 400, description = "Invalid email, username, or password", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 403, description = "Admin role required", body = ErrorSchema),
        (status = 409, description = "Email or username already taken", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "createAdmin",
    security(("bearer" = []))
)]
#[post("/admin/users")]
pub async fn create_admin(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<RegistrationBody>,
) -> ApiResult<HttpResponse> {
    let registration = registration_from_body(payload.into_inner())?;
    let account = state
        .accounts
        .create_admin(auth.caller(), registration)
        .await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(account)))
}

/// Attach an artist profile to the caller.
#[utoipa::path(
    post,
    path = "/api/v1/artists",
    request_body = ArtistBody,
    responses(
        (status = 201, description = "Artist profile created", body = ArtistResponse),
        (status = 400, description = "Invalid artist name", body = ErrorSchema),
        (status = 401, description = "Missing or invalid token", body = ErrorSchema),
        (status = 409, description = "Caller already has an artist profile", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "createArtist",
    security(("bearer" = []))
)]
#[post("/artists")]
pub async fn create_artist(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<ArtistBody>,
) -> ApiResult<HttpResponse> {
    let name = require(payload.into_inner().artist_name, FieldName::new("artistName"))?;
    let draft = ArtistDraft::new(&name)?;
    let artist = state.accounts.create_artist(auth.caller(), draft).await?;
    Ok(HttpResponse::Created().json(ArtistResponse::from(artist)))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
