use axum::{extract::State, response::Html};

use photofind_access_types::identity::MaybeIdentity;

use crate::domain::repository::CodeStore;
use crate::error::GateError;
use crate::state::AppState;

// ── POST /share ───────────────────────────────────────────────────────────────

pub async fn share<S: CodeStore>(
    State(state): State<AppState<S>>,
    identity: MaybeIdentity,
) -> Result<Html<String>, GateError> {
    let issuer = identity.0.ok_or(GateError::Forbidden)?;
    let issued = state.issue_code().execute(&issuer).await?;
    Ok(Html(format!(
        r#"<a href="{}">Access link</a>"#,
        issued.share_path
    )))
}
