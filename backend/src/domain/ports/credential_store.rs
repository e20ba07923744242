//! Ports for account storage, password hashing, and password verification.

use async_trait::async_trait;

use crate::domain::{Role, UserAccount, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "credential store connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "credential store query failed: {message}",
        /// Another active account already uses this email.
        DuplicateEmail { email: String } => "email {email} is already registered",
        /// Another active account already uses this username.
        DuplicateUsername { username: String } => "username {username} is already taken",
    }
}

/// Failure to derive a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    pub message: String,
}

impl PasswordHashError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Storage for user accounts, their password hashes, and roles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find an active account by email address (case-insensitive).
    async fn find_by_email(&self, email: &str)
    -> Result<Option<UserAccount>, CredentialStoreError>;

    /// Find an active account by username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserAccount>, CredentialStoreError>;

    /// Find an active account by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, CredentialStoreError>;

    /// Insert a new account together with its roles.
    async fn create_account(&self, account: &UserAccount) -> Result<(), CredentialStoreError>;

    /// Attach `role` to an existing account. Granting a held role is a no-op.
    async fn grant_role(&self, id: &UserId, role: Role) -> Result<(), CredentialStoreError>;
}

/// Derives a storable hash from a plaintext password.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;
}

/// Compares a plaintext password against a stored hash.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordVerifier: Send + Sync {
    /// `true` when `plaintext` matches `hash`. Unparseable hashes never match.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}
