//! Signed session tokens carried in the `access_code` cookie.
//!
//! A token wraps the id of a redeemed access code in an HS256 MAC keyed by the
//! process secret. It carries no expiry: a token stays valid for as long as
//! the access code record it names still exists.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::cookie::ACCESS_CODE;

/// Errors returned by [`SessionCodec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Authentication failed or the payload is malformed. Deliberately a
    /// single variant so callers cannot tell the two apart.
    #[error("invalid token")]
    InvalidToken,
    #[error("failed to sign token")]
    Sign,
}

/// Claims inside a session token.
///
/// `aud` binds the token to the cookie name, so a value minted for another
/// purpose with the same secret does not verify here.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    aud: String,
}

/// Sign and verify session tokens. Cheap to clone; keys are built once at
/// startup from the configured secret.
#[derive(Clone)]
pub struct SessionCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCodec").finish_non_exhaustive()
    }
}

impl SessionCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation.set_required_spec_claims(&["sub", "aud"]);
        validation.set_audience(&[ACCESS_CODE]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Wrap an access code id into a signed token.
    pub fn encode(&self, id: &str) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: id.to_owned(),
            aud: ACCESS_CODE.to_owned(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "session token signing failed");
            TokenError::Sign
        })
    }

    /// Verify a token and return the access code id it wraps.
    pub fn decode(&self, token: &str) -> Result<String, TokenError> {
        let data = decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map_err(|_| TokenError::InvalidToken)?;
        if data.claims.sub.is_empty() {
            return Err(TokenError::InvalidToken);
        }
        Ok(data.claims.sub)
    }
}
