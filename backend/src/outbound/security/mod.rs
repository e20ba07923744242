//! Token signing, password hashing and verification, and their configuration.

mod jwt;
mod password;
pub mod token_config;

pub use jwt::JwtTokenService;
pub use password::{Argon2PasswordHasher, Argon2PasswordVerifier};
pub use token_config::{BuildMode, TokenConfigError, TokenSettings, token_settings_from_env};
