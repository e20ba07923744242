//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `CredentialStore`, `PasswordHasher`,
//! `PasswordVerifier`, `TokenService`) are implemented by outbound adapters
//! and return typed port errors. Driving ports (`LoginService`,
//! `AccountCommand`, ...) are implemented by domain services and return
//! [`crate::domain::Error`].

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod catalogue_command;
mod catalogue_repository;
mod content_flag_queue;
mod content_flag_repository;
mod credential_store;
mod entitlement_ledger;
mod login_service;
mod playlist_command;
mod playlist_repository;
mod purchase_repository;
mod royalty_ledger;
mod royalty_repository;
mod stream_command;
mod stream_repository;
mod token_service;

pub use account_command::AccountCommand;
pub use catalogue_command::CatalogueCommand;
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{CatalogueRepository, CatalogueRepositoryError};
pub use content_flag_queue::ContentFlagQueue;
#[cfg(test)]
pub use content_flag_repository::MockContentFlagRepository;
pub use content_flag_repository::{ContentFlagRepository, ContentFlagRepositoryError};
pub use credential_store::{
    CredentialStore, CredentialStoreError, PasswordHashError, PasswordHasher, PasswordVerifier,
};
#[cfg(test)]
pub use credential_store::{MockCredentialStore, MockPasswordHasher, MockPasswordVerifier};
pub use entitlement_ledger::EntitlementLedger;
pub use login_service::{LoginService, LoginSession};
pub use playlist_command::PlaylistCommand;
#[cfg(test)]
pub use playlist_repository::MockPlaylistRepository;
pub use playlist_repository::{PlaylistRepository, PlaylistRepositoryError};
#[cfg(test)]
pub use purchase_repository::MockPurchaseRepository;
pub use purchase_repository::{PurchaseRepository, PurchaseRepositoryError};
pub use royalty_ledger::{DEFAULT_TIP_LIMIT, MAX_TIP_LIMIT, RoyaltyLedger};
#[cfg(test)]
pub use royalty_repository::{MockRoyaltyRepository, MockTipRepository};
pub use royalty_repository::{RoyaltyRepository, RoyaltyRepositoryError, TipRepository};
pub use stream_command::StreamCommand;
#[cfg(test)]
pub use stream_repository::MockStreamRepository;
pub use stream_repository::{StreamRepository, StreamRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
