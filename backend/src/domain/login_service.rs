//! Credential-checking login service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{
    CredentialStore, CredentialStoreError, LoginService, LoginSession, PasswordVerifier,
    TokenService,
};
use crate::domain::{Error, LoginCredentials, LoginIdentifier};

const INVALID_CREDENTIALS: &str = "invalid email or password";

pub(crate) fn map_store_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Connection { message } => {
            Error::service_unavailable(format!("credential store unavailable: {message}"))
        }
        CredentialStoreError::Query { message } => {
            Error::internal(format!("credential store error: {message}"))
        }
        CredentialStoreError::DuplicateEmail { email } => {
            Error::conflict(format!("email {email} is already registered"))
        }
        CredentialStoreError::DuplicateUsername { username } => {
            Error::conflict(format!("username {username} is already taken"))
        }
    }
}

/// Login service backed by a credential store, a password verifier, and a
/// token service.
pub struct CredentialLoginService<S> {
    store: Arc<S>,
    verifier: Arc<dyn PasswordVerifier>,
    tokens: Arc<dyn TokenService>,
}

impl<S> CredentialLoginService<S> {
    pub fn new(
        store: Arc<S>,
        verifier: Arc<dyn PasswordVerifier>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            store,
            verifier,
            tokens,
        }
    }
}

#[async_trait]
impl<S> LoginService for CredentialLoginService<S>
where
    S: CredentialStore,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error> {
        let account = match credentials.identifier() {
            LoginIdentifier::Email(email) => self.store.find_by_email(email).await,
            LoginIdentifier::Username(username) => self.store.find_by_username(username).await,
        }
        .map_err(map_store_error)?;

        let Some(account) = account else {
            debug!("login rejected: unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        if !self
            .verifier
            .verify(&account.password_hash, credentials.password())
        {
            debug!(user_id = %account.id, "login rejected: password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let token = self.tokens.issue(&account).map_err(|err| {
            error!(error = %err, "failed to issue session token");
            Error::internal("failed to issue session token")
        })?;

        Ok(LoginSession {
            token,
            user_id: account.id,
            email: account.email,
            roles: account.roles,
        })
    }
}

#[cfg(test)]
#[path = "login_service_tests.rs"]
mod tests;
