use photofind_access_types::identity::Identity;
use photofind_access_types::token::SessionCodec;

use crate::domain::repository::CodeStore;
use crate::error::GateError;

/// Per-request authorization for gated routes. Read-only.
pub struct CheckAccessUseCase<S: CodeStore> {
    pub store: S,
    pub codec: SessionCodec,
}

impl<S: CodeStore> CheckAccessUseCase<S> {
    /// Admins pass without touching the store. Otherwise the session cookie
    /// must verify and name a record that still exists; its `used` flag and
    /// age do not matter once redeemed.
    ///
    /// Only a store failure is an `Err`; an absent or invalid cookie is a
    /// plain `false`.
    pub async fn execute(
        &self,
        identity: Option<&Identity>,
        cookie: Option<&str>,
    ) -> Result<bool, GateError> {
        if identity.is_some_and(|i| i.admin) {
            return Ok(true);
        }
        let Some(token) = cookie else {
            return Ok(false);
        };
        let Ok(id) = self.codec.decode(token) else {
            return Ok(false);
        };
        Ok(self.store.get(&id).await?.is_some())
    }
}
