use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Html,
};
use axum_extra::extract::CookieJar;

use photofind_access_types::{
    cookie::{access_code_cookie, set_access_code_cookie},
    identity::MaybeIdentity,
};

use crate::domain::repository::CodeStore;
use crate::error::GateError;
use crate::state::AppState;

pub const INDEX_HTML: &str = include_str!("../../templates/index.html");

const CODE_PARAM: &str = "code";

/// Query string as raw pairs, so repeated keys never reject the request.
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// First non-empty `code` value, if any.
fn code_param(query: QueryPairs) -> Option<String> {
    let Query(pairs) = query.ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == CODE_PARAM)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

// ── GET / ─────────────────────────────────────────────────────────────────────

/// Serve the index to callers that already have access. Anyone else must
/// present `?code=`, which is redeemed for an `access_code` cookie.
pub async fn index<S: CodeStore>(
    State(state): State<AppState<S>>,
    identity: MaybeIdentity,
    jar: CookieJar,
    query: QueryPairs,
) -> Result<(CookieJar, Html<&'static str>), GateError> {
    let cookie = access_code_cookie(&jar);
    let authorized = state
        .check_access()
        .execute(identity.0.as_ref(), cookie.as_deref())
        .await?;
    if authorized {
        return Ok((jar, Html(INDEX_HTML)));
    }

    let code = code_param(query).ok_or(GateError::Forbidden)?;
    let token = state.redeem_code().execute(&code).await?;
    let jar = set_access_code_cookie(jar, token, state.settings.secure_cookies);
    Ok((jar, Html(INDEX_HTML)))
}
