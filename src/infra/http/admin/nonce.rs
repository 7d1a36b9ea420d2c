use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::nonce::SETTINGS_NONCE_ACTION;

use super::auth;
use super::response::ajax_success;
use super::state::AjaxState;

#[derive(Debug, Serialize)]
struct NonceData {
    action: &'static str,
    nonce: String,
}

/// Issue a token the panel sends back as `_wpnonce`.
pub(super) async fn issue_nonce(State(state): State<AjaxState>, headers: HeaderMap) -> Response {
    match auth::authenticate(&state, &headers).await {
        Ok(principal) => ajax_success(NonceData {
            action: SETTINGS_NONCE_ACTION,
            nonce: state
                .nonces
                .create(SETTINGS_NONCE_ACTION, principal.user_id),
        }),
        Err(err) => err.into_response(),
    }
}
