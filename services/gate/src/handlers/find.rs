use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use axum_extra::extract::CookieJar;

use photofind_access_types::{cookie::access_code_cookie, identity::MaybeIdentity};

use crate::domain::repository::CodeStore;
use crate::error::GateError;
use crate::state::AppState;

const IMAGES_FIELD: &str = "images";

// ── POST /find ────────────────────────────────────────────────────────────────

/// Run text detection over every uploaded `images` part and return one
/// annotation result per image, in upload order.
///
/// The body is taken as `Result` so unauthorized callers get 403 before the
/// multipart framing is looked at.
pub async fn find<S: CodeStore>(
    State(state): State<AppState<S>>,
    identity: MaybeIdentity,
    jar: CookieJar,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<serde_json::Value>>, GateError> {
    let cookie = access_code_cookie(&jar);
    let authorized = state
        .check_access()
        .execute(identity.0.as_ref(), cookie.as_deref())
        .await?;
    if !authorized {
        return Err(GateError::Forbidden);
    }

    let mut multipart = multipart.map_err(|_| GateError::BadRequest("expected multipart form"))?;
    let mut images = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| GateError::BadRequest("invalid multipart body"))?
    {
        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|_| GateError::BadRequest("invalid multipart body"))?;
        if !bytes.is_empty() {
            images.push(bytes.to_vec());
        }
    }
    if images.is_empty() {
        return Err(GateError::BadRequest("no images"));
    }

    let results = state.annotator.annotate(images).await?;
    Ok(Json(results))
}
