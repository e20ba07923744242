//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountCommand, CatalogueCommand, CatalogueRepository, ContentFlagQueue,
    ContentFlagRepository, CredentialStore, EntitlementLedger, LoginService, PasswordHasher,
    PasswordVerifier, PlaylistCommand, PlaylistRepository, PurchaseRepository, RoyaltyLedger,
    RoyaltyRepository, StreamCommand, StreamRepository, TipRepository, TokenService,
};
use crate::domain::{
    AccountService, CatalogueService, CredentialLoginService, EntitlementService, FlagService, PlaylistService,
    RoyaltyService, RoyaltyServiceDeps, StreamService, StreamServiceDeps,
};

/// Driving ports reachable from handlers, plus the token verifier used by
/// the bearer extractor.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub entitlements: Arc<dyn EntitlementLedger>,
    pub royalties: Arc<dyn RoyaltyLedger>,
    pub flags: Arc<dyn ContentFlagQueue>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub playlists: Arc<dyn PlaylistCommand>,
    pub streams: Arc<dyn StreamCommand>,
    pub tokens: Arc<dyn TokenService>,
}

/// Driven adapters backing every port.
///
/// The in-memory store fills every slot with the same `Arc`; the Diesel
/// adapters use one repository per slot.
pub struct MarketplaceAdapters<C, U, P, T, R, F, L, S> {
    pub catalogue: Arc<C>,
    pub users: Arc<U>,
    pub purchases: Arc<P>,
    pub tips: Arc<T>,
    pub royalties: Arc<R>,
    pub flags: Arc<F>,
    pub playlists: Arc<L>,
    pub streams: Arc<S>,
}

/// Token issuing, password hashing, and password checking collaborators.
#[derive(Clone)]
pub struct SecurityPorts {
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordVerifier>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl HttpState {
    /// Wire the domain services over a set of adapters.
    ///
    /// # Examples
    /// ```ignore
    /// let store = Arc::new(InMemoryMarketplace::new());
    /// let state = HttpState::from_adapters(
    ///     MarketplaceAdapters::shared(store),
    ///     SecurityPorts { tokens, passwords, hasher },
    ///     Arc::new(DefaultClock),
    /// );
    /// ```
    pub fn from_adapters<C, U, P, T, R, F, L, S>(
        adapters: MarketplaceAdapters<C, U, P, T, R, F, L, S>,
        security: SecurityPorts,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        C: CatalogueRepository + 'static,
        U: CredentialStore + 'static,
        P: PurchaseRepository + 'static,
        T: TipRepository + 'static,
        R: RoyaltyRepository + 'static,
        F: ContentFlagRepository + 'static,
        L: PlaylistRepository + 'static,
        S: StreamRepository + 'static,
    {
        let MarketplaceAdapters {
            catalogue,
            users,
            purchases,
            tips,
            royalties,
            flags,
            playlists,
            streams,
        } = adapters;

        Self {
            login: Arc::new(CredentialLoginService::new(
                Arc::clone(&users),
                security.passwords,
                Arc::clone(&security.tokens),
            )),
            accounts: Arc::new(AccountService::new(
                Arc::clone(&users),
                Arc::clone(&catalogue),
                security.hasher,
            )),
            entitlements: Arc::new(EntitlementService::new(
                Arc::clone(&catalogue),
                Arc::clone(&purchases),
                Arc::clone(&clock),
            )),
            royalties: Arc::new(RoyaltyService::new(RoyaltyServiceDeps {
                catalogue: Arc::clone(&catalogue),
                users,
                tips,
                royalties,
                clock: Arc::clone(&clock),
            })),
            flags: Arc::new(FlagService::new(
                Arc::clone(&catalogue),
                flags,
                Arc::clone(&clock),
            )),
            catalogue: Arc::new(CatalogueService::new(Arc::clone(&catalogue))),
            playlists: Arc::new(PlaylistService::new(
                Arc::clone(&catalogue),
                playlists,
                Arc::clone(&clock),
            )),
            streams: Arc::new(StreamService::new(StreamServiceDeps {
                catalogue,
                purchases,
                streams,
                clock,
            })),
            tokens: security.tokens,
        }
    }
}

impl<A> MarketplaceAdapters<A, A, A, A, A, A, A, A> {
    /// Use one adapter for every port.
    pub fn shared(adapter: Arc<A>) -> Self {
        Self {
            catalogue: Arc::clone(&adapter),
            users: Arc::clone(&adapter),
            purchases: Arc::clone(&adapter),
            tips: Arc::clone(&adapter),
            royalties: Arc::clone(&adapter),
            flags: Arc::clone(&adapter),
            playlists: Arc::clone(&adapter),
            streams: adapter,
        }
    }
}
