//! PostgreSQL persistence adapters built on Diesel.
//!
//! Repositories here are thin: they translate between Diesel rows and
//! domain types and map driver failures onto each port's error enum. Row
//! structs (`models`) and table definitions (`schema`) stay private to this
//! module.
//!
//! ```ignore
//! use marketplace::outbound::persistence::{DbPool, DieselPurchaseRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/marketplace")).await?;
//! let purchases = DieselPurchaseRepository::new(pool);
//! ```

mod diesel_catalogue_repository;
mod diesel_content_flag_repository;
mod diesel_credential_store;
mod diesel_error_mapping;
mod diesel_playlist_repository;
mod diesel_purchase_repository;
mod diesel_royalty_repository;
mod diesel_stream_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_content_flag_repository::DieselContentFlagRepository;
pub use diesel_credential_store::DieselCredentialStore;
pub use diesel_playlist_repository::DieselPlaylistRepository;
pub use diesel_purchase_repository::DieselPurchaseRepository;
pub use diesel_royalty_repository::{DieselRoyaltyRepository, DieselTipRepository};
pub use diesel_stream_repository::DieselStreamRepository;
pub use migrations::{MIGRATIONS, MigrationError, migrate, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
