//! Builders for the HTTP state over Diesel or in-memory adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use marketplace::inbound::http::state::{HttpState, MarketplaceAdapters, SecurityPorts};
use marketplace::outbound::memory::InMemoryMarketplace;
use marketplace::outbound::persistence::{
    DbPool, DieselCatalogueRepository, DieselContentFlagRepository, DieselCredentialStore,
    DieselPlaylistRepository, DieselPurchaseRepository, DieselRoyaltyRepository,
    DieselStreamRepository, DieselTipRepository,
};
use marketplace::outbound::security::{
    Argon2PasswordHasher, Argon2PasswordVerifier, JwtTokenService,
};

use super::ServerConfig;

/// Token and password collaborators shared by both adapter sets.
fn build_security(config: &ServerConfig, clock: Arc<dyn Clock>) -> SecurityPorts {
    SecurityPorts {
        tokens: Arc::new(JwtTokenService::new(config.tokens.clone(), clock)),
        passwords: Arc::new(Argon2PasswordVerifier),
        hasher: Arc::new(Argon2PasswordHasher),
    }
}

fn diesel_adapters(
    pool: &DbPool,
) -> MarketplaceAdapters<
    DieselCatalogueRepository,
    DieselCredentialStore,
    DieselPurchaseRepository,
    DieselTipRepository,
    DieselRoyaltyRepository,
    DieselContentFlagRepository,
    DieselPlaylistRepository,
    DieselStreamRepository,
> {
    MarketplaceAdapters {
        catalogue: Arc::new(DieselCatalogueRepository::new(pool.clone())),
        users: Arc::new(DieselCredentialStore::new(pool.clone())),
        purchases: Arc::new(DieselPurchaseRepository::new(pool.clone())),
        tips: Arc::new(DieselTipRepository::new(pool.clone())),
        royalties: Arc::new(DieselRoyaltyRepository::new(pool.clone())),
        flags: Arc::new(DieselContentFlagRepository::new(pool.clone())),
        playlists: Arc::new(DieselPlaylistRepository::new(pool.clone())),
        streams: Arc::new(DieselStreamRepository::new(pool.clone())),
    }
}

/// Build the HTTP state, preferring PostgreSQL when a pool is configured.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let security = build_security(config, Arc::clone(&clock));
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL adapters");
            HttpState::from_adapters(diesel_adapters(pool), security, clock)
        }
        None => {
            warn!("no database configured; state is kept in memory and lost on restart");
            let store = Arc::new(InMemoryMarketplace::default());
            HttpState::from_adapters(MarketplaceAdapters::shared(store), security, clock)
        }
    }
}
