//! Upstream identity assertions.
//!
//! The identity provider in front of the service signs a short-lived HS256
//! assertion (`sub` = email, `admin`, `exp`) and forwards it in
//! `x-photofind-identity`. Anything missing, malformed, forged, or expired is
//! treated as an anonymous caller, so the admin bypass cannot be claimed by a
//! client-supplied header.

use std::convert::Infallible;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::extract::{FromRef, FromRequestParts};
use http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Header carrying the signed identity assertion.
pub const X_PHOTOFIND_IDENTITY: &str = "x-photofind-identity";

/// Authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub admin: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct IdentityClaims {
    sub: String,
    #[serde(default)]
    admin: bool,
    exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Mint an identity assertion. Used by the identity provider side and tests.
pub fn issue_identity_token(
    identity: &Identity,
    secret: &[u8],
    ttl_secs: u64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = IdentityClaims {
        sub: identity.email.clone(),
        admin: identity.admin,
        exp: now_secs() + ttl_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
}

/// Verifies identity assertions. Obtained from router state via [`FromRef`].
#[derive(Clone)]
pub struct IdentityVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<IdentityClaims>(token, &self.decoding, &self.validation) {
            Ok(data) if !data.claims.sub.is_empty() => Some(Identity {
                email: data.claims.sub,
                admin: data.claims.admin,
            }),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "ignoring invalid identity assertion");
                None
            }
        }
    }
}

/// Optional caller identity. Never rejects: anonymous requests get `None`.
#[derive(Debug, Clone, Default)]
pub struct MaybeIdentity(pub Option<Identity>);

impl MaybeIdentity {
    pub fn is_admin(&self) -> bool {
        self.0.as_ref().is_some_and(|i| i.admin)
    }
}

impl<S> FromRequestParts<S> for MaybeIdentity
where
    IdentityVerifier: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    // Resolve synchronously and hand back a 'static future; see axum-core 0.5
    // `FromRequestParts` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = parts
            .headers
            .get(X_PHOTOFIND_IDENTITY)
            .and_then(|v| v.to_str().ok())
            .and_then(|token| IdentityVerifier::from_ref(state).verify(token));

        async move { Ok(Self(identity)) }
    }
}
