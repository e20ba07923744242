//! Authentication primitives: login credentials, session token claims, and
//! bearer header parsing.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::TokenError;
use crate::domain::{Role, UserId};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email or username was missing or blank once trimmed.
    EmptyIdentifier,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// How a login identifier should be looked up in the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentifier<'a> {
    Email(&'a str),
    Username(&'a str),
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `identifier` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use marketplace::domain::{LoginCredentials, LoginIdentifier};
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "password").unwrap();
/// assert_eq!(creds.identifier(), LoginIdentifier::Email("ada@example.com"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = identifier.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyIdentifier);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            identifier: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Identifier classified as an email address or a username.
    pub fn identifier(&self) -> LoginIdentifier<'_> {
        if self.identifier.contains('@') {
            LoginIdentifier::Email(self.identifier.as_str())
        } else {
            LoginIdentifier::Username(self.identifier.as_str())
        }
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Decoded payload of a session token.
///
/// Field names match the token wire payload: `user_id`, `email`, `role`,
/// `exp` and `iat` (unix seconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub email: String,
    #[serde(rename = "role")]
    pub roles: Vec<Role>,
    pub exp: i64,
    pub iat: i64,
}

/// A freshly signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Extract the token from an `Authorization` header value.
///
/// The scheme must be exactly `Bearer` followed by a single space and a
/// non-empty token.
///
/// # Examples
/// ```
/// use marketplace::domain::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
/// assert!(bearer_token("Basic abc").is_err());
/// ```
pub fn bearer_token(header_value: &str) -> Result<&str, TokenError> {
    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| TokenError::malformed("authorization header must use the Bearer scheme"))?
        .trim();
    if token.is_empty() {
        return Err(TokenError::malformed("bearer token is empty"));
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyIdentifier)]
    #[case("   ", "pw", LoginValidationError::EmptyIdentifier)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] identifier: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(identifier, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada@example.com ", LoginIdentifier::Email("ada@example.com"))]
    #[case("ada", LoginIdentifier::Username("ada"))]
    fn identifiers_are_trimmed_and_classified(
        #[case] raw: &str,
        #[case] expected: LoginIdentifier<'static>,
    ) {
        let creds = LoginCredentials::try_from_parts(raw, "secret").expect("valid inputs");
        assert_eq!(creds.identifier(), expected);
        assert_eq!(creds.password(), "secret");
    }

    #[rstest]
    #[case("Bearer")]
    #[case("Bearer ")]
    #[case("bearer abc")]
    #[case("Token abc")]
    #[case("abc.def.ghi")]
    fn bearer_token_rejects_bad_headers(#[case] header: &str) {
        let err = bearer_token(header).expect_err("header rejected");
        assert!(matches!(err, TokenError::Malformed { .. }));
    }

    #[rstest]
    fn claims_use_wire_field_names() {
        let claims = TokenClaims {
            user_id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id"),
            email: "ada@example.com".to_owned(),
            roles: vec![Role::Listener, Role::Artist],
            exp: 1_700_086_400,
            iat: 1_700_000_000,
        };
        let value = serde_json::to_value(&claims).expect("serialise claims");
        assert_eq!(value["user_id"], "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert_eq!(value["role"], serde_json::json!(["listener", "artist"]));
        assert_eq!(value["exp"], 1_700_086_400);
    }
}
