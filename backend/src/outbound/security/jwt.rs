//! HS256 session tokens.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{IssuedToken, TokenClaims, UserAccount};

use super::TokenSettings;

fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::invalid_signature(),
        ErrorKind::ExpiredSignature => TokenError::expired(),
        _ => TokenError::malformed(error.to_string()),
    }
}

/// Signs and verifies tokens with a shared secret.
///
/// Expiry is checked against the injected clock rather than the system
/// time, and a token is rejected once `now >= exp`.
pub struct JwtTokenService {
    settings: TokenSettings,
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    pub fn new(settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(settings.secret()),
            decoding: DecodingKey::from_secret(settings.secret()),
            settings,
            validation,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, account: &UserAccount) -> Result<IssuedToken, TokenError> {
        let issued_at = self.clock.utc();
        let expires_at = issued_at + self.settings.expiry();
        let claims = TokenClaims {
            user_id: account.id.clone(),
            email: account.email.clone(),
            roles: account.roles.clone(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let data = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(map_decode_error)?;
        if self.clock.utc().timestamp() >= data.claims.exp {
            return Err(TokenError::expired());
        }
        Ok(data.claims)
    }
}
