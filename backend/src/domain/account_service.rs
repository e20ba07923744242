//! Account sign-up, admin provisioning, and artist onboarding.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::authorization::map_catalogue_error;
use crate::domain::login_service::map_store_error;
use crate::domain::ports::{AccountCommand, CatalogueRepository, CredentialStore, PasswordHasher};
use crate::domain::{
    Artist, ArtistDraft, Caller, Error, Registration, Role, UserAccount, require_role,
};

pub struct AccountService<U, C> {
    store: Arc<U>,
    catalogue: Arc<C>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U, C> AccountService<U, C> {
    pub fn new(store: Arc<U>, catalogue: Arc<C>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            catalogue,
            hasher,
        }
    }
}

impl<U, C> AccountService<U, C>
where
    U: CredentialStore,
{
    /// Reject taken identifiers up front; the store's unique indexes still
    /// settle concurrent sign-ups.
    async fn ensure_available(&self, registration: &Registration) -> Result<(), Error> {
        if self
            .store
            .find_by_email(registration.email())
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "email {} is already registered",
                registration.email()
            )));
        }
        if self
            .store
            .find_by_username(registration.username())
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            return Err(Error::conflict(format!(
                "username {} is already taken",
                registration.username()
            )));
        }
        Ok(())
    }

    async fn open_account(
        &self,
        registration: Registration,
        roles: Vec<Role>,
    ) -> Result<UserAccount, Error> {
        self.ensure_available(&registration).await?;
        let hash = self.hasher.hash(registration.password()).map_err(|err| {
            error!(error = %err, "failed to hash password");
            Error::internal("failed to hash password")
        })?;
        let account = registration.into_account(hash, roles);
        self.store
            .create_account(&account)
            .await
            .map_err(map_store_error)?;
        Ok(account)
    }
}

#[async_trait]
impl<U, C> AccountCommand for AccountService<U, C>
where
    U: CredentialStore,
    C: CatalogueRepository,
{
    async fn register(&self, registration: Registration) -> Result<UserAccount, Error> {
        let account = self.open_account(registration, vec![Role::Listener]).await?;
        info!(user_id = %account.id, "account registered");
        Ok(account)
    }

    async fn create_admin(
        &self,
        caller: &Caller,
        registration: Registration,
    ) -> Result<UserAccount, Error> {
        require_role(caller, Role::Admin)?;
        let account = self.open_account(registration, vec![Role::Admin]).await?;
        info!(user_id = %account.id, created_by = %caller.user_id(), "admin account created");
        Ok(account)
    }

    async fn create_artist(&self, caller: &Caller, draft: ArtistDraft) -> Result<Artist, Error> {
        if self
            .catalogue
            .find_artist_by_user(caller.user_id())
            .await
            .map_err(map_catalogue_error)?
            .is_some()
        {
            return Err(Error::conflict("user already has an artist profile"));
        }
        self.store
            .grant_role(caller.user_id(), Role::Artist)
            .await
            .map_err(map_store_error)?;
        let artist = draft.into_artist(caller.user_id().clone());
        self.catalogue
            .create_artist(&artist)
            .await
            .map_err(map_catalogue_error)?;
        info!(artist_id = %artist.id, user_id = %artist.user_id, "artist profile created");
        Ok(artist)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
