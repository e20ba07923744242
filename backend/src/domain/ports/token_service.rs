//! Port for issuing and verifying signed session tokens.
//!
//! Verification is stateless: implementations must not consult the
//! credential store, so a token stays valid until it expires. Revocation is
//! not supported.

use crate::domain::{IssuedToken, TokenClaims, UserAccount};

use super::define_port_error;

define_port_error! {
    /// Failures raised while issuing or verifying tokens.
    pub enum TokenError {
        /// The signature or signing algorithm does not match.
        InvalidSignature => "token signature is invalid",
        /// The current time is at or past the token expiry.
        Expired => "token has expired",
        /// The header or token structure is missing or unreadable.
        Malformed { message: String } => "token is malformed: {message}",
        /// Signing failed while issuing a token.
        Signing { message: String } => "token signing failed: {message}",
    }
}

impl TokenError {
    /// Stable code reported to clients alongside an `unauthorized` error.
    pub const fn reason_code(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "token_expired",
            Self::Malformed { .. } => "malformed_token",
            Self::Signing { .. } => "signing_failed",
        }
    }
}

/// Issues tokens for authenticated accounts and decodes presented tokens.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token carrying the account's identity and roles.
    fn issue(&self, account: &UserAccount) -> Result<IssuedToken, TokenError>;

    /// Verify the signature and expiry of `token` and return its claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
