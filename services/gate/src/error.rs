use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use photofind_access_types::token::TokenError;
use photofind_core::retry::Retryable;

/// Gate service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("access code not found")]
    NotFound,
    #[error("access code already used")]
    AlreadyUsed,
    #[error("access code expired")]
    Expired,
    /// A concurrent transaction on the same key committed first. Absorbed by
    /// [`photofind_core::retry::with_retry`]; only escapes once retries run out.
    #[error("transaction conflict")]
    Conflict,
    #[error("invalid token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error("bad request: {0}")]
    BadRequest(&'static str),
    #[error("failed to schedule cleanup: {0}")]
    Schedule(String),
    #[error("store error")]
    Store(#[from] anyhow::Error),
    #[error("internal error")]
    Internal(#[source] anyhow::Error),
}

impl GateError {
    pub fn kind(&self) -> &'static str {
        match self {
            // Redemption and access failures share one kind so callers cannot
            // probe which codes exist.
            Self::NotFound
            | Self::AlreadyUsed
            | Self::Expired
            | Self::InvalidToken
            | Self::Forbidden => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict | Self::Schedule(_) | Self::Store(_) | Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound
            | Self::AlreadyUsed
            | Self::Expired
            | Self::InvalidToken
            | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict | Self::Schedule(_) | Self::Store(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self.status() {
            StatusCode::FORBIDDEN => "forbidden".to_owned(),
            StatusCode::INTERNAL_SERVER_ERROR => "internal error".to_owned(),
            _ => self.to_string(),
        }
    }
}

impl Retryable for GateError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

impl From<TokenError> for GateError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::InvalidToken => Self::InvalidToken,
            TokenError::Sign => Self::Internal(anyhow::anyhow!("session token signing failed")),
        }
    }
}

impl IntoResponse for GateError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Log 500s only. TraceLayer already records method/uri/status for every
        // request, and 403s are the expected outcome of a bad code.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = ?self, kind = self.kind(), "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.public_message(),
        });
        (status, axum::Json(body)).into_response()
    }
}
