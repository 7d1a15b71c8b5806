//! Mock identity helpers for integration tests.
//!
//! Requests reaching the service carry an identity assertion signed by the
//! upstream provider. `MockIdentity` signs one with the test secret so no real
//! provider is needed.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use photofind_access_types::identity::{Identity, X_PHOTOFIND_IDENTITY, issue_identity_token};

/// Identity secret shared by test states and `MockIdentity`.
pub const TEST_IDENTITY_SECRET: &str = "test-identity-secret-for-unit-tests-only";

/// Configurable identity injected into test requests.
pub struct MockIdentity {
    pub identity: Identity,
}

impl MockIdentity {
    pub fn admin() -> Self {
        Self {
            identity: Identity {
                email: "admin@example.com".to_owned(),
                admin: true,
            },
        }
    }

    pub fn user() -> Self {
        Self {
            identity: Identity {
                email: "user@example.com".to_owned(),
                admin: false,
            },
        }
    }

    /// Signed assertion value for `x-photofind-identity`.
    pub fn token(&self) -> String {
        issue_identity_token(&self.identity, TEST_IDENTITY_SECRET.as_bytes(), 300).unwrap()
    }

    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(X_PHOTOFIND_IDENTITY),
            HeaderValue::from_str(&self.token()).unwrap(),
        )
    }

    /// Return headers as if the identity provider injected them.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        let (name, value) = self.header();
        map.insert(name, value);
        map
    }
}
