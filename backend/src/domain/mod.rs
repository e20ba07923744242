//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the marketplace's strongly typed entities and the
//! services that enforce its invariants. Inbound adapters talk to the
//! driving ports in [`ports`]; services reach storage through the driven
//! ports declared there.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifiers.
//! - UserId, Role, UserAccount: identities and credentials.
//! - Caller and the guard helpers in [`authorization`].
//! - Catalogue, entitlement, royalty, moderation, playlist, and stream
//!   entities, plus one service per driving port.

pub mod account_service;
pub mod auth;
pub mod authorization;
pub mod catalogue;
pub mod catalogue_service;
pub mod entitlement;
pub mod entitlement_service;
pub mod error;
pub mod flag_service;
pub mod login_service;
pub mod moderation;
pub mod playlist;
pub mod playlist_service;
pub mod ports;
pub mod royalty;
pub mod royalty_service;
pub mod stream;
pub mod stream_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    IssuedToken, LoginCredentials, LoginIdentifier, LoginValidationError, TokenClaims,
    bearer_token,
};
pub use self::authorization::{
    Caller, OwnershipGuard, require_playlist_owner, require_role, require_self,
};
pub use self::catalogue::{
    ARTIST_NAME_MAX, Album, AlbumDraft, AlbumUpdate, Artist, ArtistDraft, CONTRIBUTION_TYPE_MAX,
    CatalogueItem, ContributionType, Contributor, ItemKind, ItemRef, ParseItemKindError,
    RoyaltyShare, Song, SongDraft, SongUpdate,
};
pub use self::catalogue_service::CatalogueService;
pub use self::entitlement::{
    DEFAULT_CURRENCY, ParsePaymentStatusError, PaymentStatus, Purchase, PurchaseRequest,
};
pub use self::entitlement_service::EntitlementService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::flag_service::FlagService;
pub use self::login_service::CredentialLoginService;
pub use self::moderation::{
    ContentFlag, FLAG_REASON_MAX, FlagStatus, FlagSubmission, parse_flag_target_kind,
};
pub use self::playlist::{
    PLAYLIST_TITLE_MAX, Playlist, PlaylistDraft, PlaylistEntry, PlaylistUpdate, ReorderBatch,
    SongPosition,
};
pub use self::playlist_service::PlaylistService;
pub use self::royalty::{
    MonthlyRoyalty, RoyaltyPeriod, TIP_MESSAGE_MAX, Tip, TipRequest, validate_accrual_amount,
};
pub use self::royalty_service::{RoyaltyService, RoyaltyServiceDeps};
pub use self::stream::{STREAM_COUNT_WINDOW_DAYS, StreamEvent, StreamRequest};
pub use self::stream_service::{StreamService, StreamServiceDeps};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    PASSWORD_MIN, Registration, RegistrationError, Role, USERNAME_MAX, UserAccount, UserId,
    UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use marketplace::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
