//! Driving port for login.
//!
//! Inbound adapters call this to exchange credentials for a session token
//! without knowing how accounts are stored or how tokens are signed.

use async_trait::async_trait;

use crate::domain::{Error, IssuedToken, LoginCredentials, Role, UserId};

/// Successful login outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub token: IssuedToken,
    pub user_id: UserId,
    pub email: String,
    pub roles: Vec<Role>,
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a session token.
    ///
    /// Unknown accounts and wrong passwords fail identically with
    /// `unauthorized`.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error>;
}
