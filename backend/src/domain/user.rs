//! Marketplace user identities and role membership.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors returned by [`UserId::new`] and [`Role::from_str`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier was not a canonical UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The role name is not one of listener, artist, or admin.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role granted to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Browses, buys, streams, and tips.
    Listener,
    /// Publishes songs and albums through a linked artist profile.
    Artist,
    /// Moderates flags and settles royalties.
    Admin,
}

impl Role {
    /// Canonical lowercase name used in storage and token claims.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Listener => "listener",
            Self::Artist => "artist",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "listener" => Ok(Self::Listener),
            "artist" => Ok(Self::Artist),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Account record held by the credential store.
///
/// `password_hash` is a PHC string and never leaves the domain; it is
/// excluded from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub roles: Vec<Role>,
}

impl UserAccount {
    /// Whether the account carries `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

/// Maximum username length, matching the `users.username` column.
pub const USERNAME_MAX: usize = 64;
/// Shortest password accepted at sign-up.
pub const PASSWORD_MIN: usize = 8;

/// Reasons a sign-up payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("email must look like name@domain")]
    InvalidEmail,
    #[error("username must be 1 to {USERNAME_MAX} characters without whitespace")]
    InvalidUsername,
    #[error("password must be at least {PASSWORD_MIN} characters")]
    WeakPassword,
}

/// Validated sign-up input. The password stays plaintext until the account
/// service hashes it and is excluded from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    email: String,
    username: String,
    password: Zeroizing<String>,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Registration {
    /// Validate raw sign-up fields; email and username are trimmed.
    ///
    /// # Examples
    /// ```
    /// use marketplace::domain::Registration;
    ///
    /// let reg = Registration::try_from_parts(" ada@example.com ", "ada", "s3cret-pass").unwrap();
    /// assert_eq!(reg.email(), "ada@example.com");
    /// ```
    pub fn try_from_parts(
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, RegistrationError> {
        let email = email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_email || email.chars().any(char::is_whitespace) {
            return Err(RegistrationError::InvalidEmail);
        }

        let username = username.trim();
        if username.is_empty()
            || username.chars().count() > USERNAME_MAX
            || username.chars().any(char::is_whitespace)
        {
            return Err(RegistrationError::InvalidUsername);
        }

        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationError::WeakPassword);
        }

        Ok(Self {
            email: email.to_owned(),
            username: username.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Build the stored account from this input and an already computed hash.
    pub fn into_account(self, password_hash: String, roles: Vec<Role>) -> UserAccount {
        UserAccount {
            id: UserId::random(),
            email: self.email,
            username: self.username,
            password_hash,
            roles,
        }
    }
}
