use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};

use crate::core::csrf::SESSION_HEADER;
use crate::core::error::{DeskResult, RequestError};
use crate::server::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CsrfTokenResponse {
    pub token: String,
}

/// Issue a CSRF token for the session named in `x-session-id`
pub async fn issue_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> DeskResult<Json<CsrfTokenResponse>> {
    let session = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| RequestError::MissingHeader {
            header: SESSION_HEADER.to_string(),
        })?;

    let purged = state.csrf.purge_expired().await?;
    if purged > 0 {
        tracing::debug!(purged, "dropped expired CSRF tokens");
    }

    let token = state.csrf.issue(session).await?;
    Ok(Json(CsrfTokenResponse { token }))
}
