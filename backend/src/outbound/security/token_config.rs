//! Token configuration parsing and validation.
//!
//! `JWT_SECRET` is required in every build. `JWT_EXPIRY` is optional and
//! accepts a positive integer with an `h`, `m`, or `s` suffix; a bare number
//! is read as hours.

use std::fmt;

use chrono::TimeDelta;
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

pub(crate) const SECRET_ENV: &str = "JWT_SECRET";
pub(crate) const EXPIRY_ENV: &str = "JWT_EXPIRY";
const EXPIRY_EXPECTED: &str = "a positive duration such as 24h, 90m, or 3600s";
const DEFAULT_EXPIRY_HOURS: i64 = 24;
const SECRET_MIN_LEN: usize = 32;
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for token configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds accept short secrets with a warning.
    Debug,
    /// Release builds require secrets of at least 32 bytes.
    Release,
}

impl BuildMode {
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated token settings.
#[derive(Clone)]
pub struct TokenSettings {
    secret: Zeroizing<Vec<u8>>,
    expiry: TimeDelta,
}

impl TokenSettings {
    /// Build settings directly; used by tests and tooling.
    pub fn new(secret: impl Into<Vec<u8>>, expiry: TimeDelta) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            expiry,
        }
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_slice()
    }

    pub fn expiry(&self) -> TimeDelta {
        self.expiry
    }

    /// Truncated SHA-256 of the secret, safe to log.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::TimeDelta;
    /// use marketplace::outbound::security::TokenSettings;
    ///
    /// let settings = TokenSettings::new(b"x".repeat(32), TimeDelta::hours(1));
    /// let fp = settings.fingerprint();
    /// assert_eq!(fp.len(), 16);
    /// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.secret.as_slice());
        hex::encode(&digest[..FINGERPRINT_BYTES])
    }
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Errors raised while validating token configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{name} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        name: &'static str,
        length: usize,
        min_len: usize,
    },
}

/// Build token settings from environment variables.
///
/// # Examples
///
/// ```rust
/// use marketplace::outbound::security::{BuildMode, token_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     "JWT_EXPIRY" => Some("2h".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env, BuildMode::Release).expect("valid settings");
/// assert_eq!(settings.expiry().num_hours(), 2);
/// ```
pub fn token_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSettings, TokenConfigError> {
    let secret = env
        .string(SECRET_ENV)
        .map(Zeroizing::new)
        .filter(|value| !value.is_empty())
        .ok_or(TokenConfigError::MissingEnv { name: SECRET_ENV })?;
    if secret.len() < SECRET_MIN_LEN {
        if mode == BuildMode::Release {
            return Err(TokenConfigError::SecretTooShort {
                name: SECRET_ENV,
                length: secret.len(),
                min_len: SECRET_MIN_LEN,
            });
        }
        warn!(length = secret.len(), "JWT_SECRET shorter than recommended");
    }

    let expiry = match env.string(EXPIRY_ENV) {
        Some(value) => parse_expiry(&value).ok_or(TokenConfigError::InvalidEnv {
            name: EXPIRY_ENV,
            value,
            expected: EXPIRY_EXPECTED,
        })?,
        None => TimeDelta::hours(DEFAULT_EXPIRY_HOURS),
    };

    Ok(TokenSettings::new(secret.as_bytes().to_vec(), expiry))
}

fn parse_expiry(raw: &str) -> Option<TimeDelta> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last() {
        Some((index, unit)) if unit.is_ascii_alphabetic() => (&raw[..index], unit),
        _ => (raw, 'h'),
    };
    let amount: i64 = digits.parse().ok().filter(|value| *value > 0)?;
    match unit.to_ascii_lowercase() {
        'h' => TimeDelta::try_hours(amount),
        'm' => TimeDelta::try_minutes(amount),
        's' => TimeDelta::try_seconds(amount),
        _ => None,
    }
}

#[cfg(test)]
#[path = "token_config_tests.rs"]
mod tests;
