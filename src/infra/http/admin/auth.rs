use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use tracing::debug;

use crate::application::input::FormInput;
use crate::application::messages;
use crate::application::nonce::SETTINGS_NONCE_ACTION;
use crate::application::sessions::AdminPrincipal;

use super::response::AjaxError;
use super::state::AjaxState;

const SOURCE: &str = "infra::http::admin::auth";
pub const SESSION_HEADER: &str = "x-erp-session";
const NONCE_FIELDS: &[&str] = &["_wpnonce", "_ajax_nonce"];

fn extract_bearer(header: Option<&HeaderValue>) -> Option<String> {
    let value = header?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .map(|token| token.trim().to_string())
}

fn extract_token(headers: &HeaderMap) -> Option<String> {
    extract_bearer(headers.get(AUTHORIZATION)).or_else(|| {
        headers
            .get(SESSION_HEADER)
            .and_then(|value| value.to_str().ok().map(|s| s.to_string()))
    })
}

pub(super) async fn authenticate(
    state: &AjaxState,
    headers: &HeaderMap,
) -> Result<AdminPrincipal, AjaxError> {
    let token = extract_token(headers).ok_or_else(|| AjaxError::unauthorized(SOURCE))?;

    state.sessions.authenticate(&token).await.map_err(|err| {
        debug!(target = "erp_settings::http::auth", error = %err, "session rejected");
        AjaxError::unauthorized(SOURCE)
    })
}

/// Check the anti-forgery token sent with the form against the caller's session.
pub(super) fn verify_nonce(
    state: &AjaxState,
    principal: &AdminPrincipal,
    input: &FormInput,
) -> Result<(), AjaxError> {
    let token = NONCE_FIELDS
        .iter()
        .find_map(|field| input.raw(field).filter(|value| !value.is_empty()))
        .unwrap_or_default();

    if state
        .nonces
        .verify(token, SETTINGS_NONCE_ACTION, principal.user_id)
    {
        Ok(())
    } else {
        Err(AjaxError::forbidden(SOURCE, messages::NONCE_FAILED))
    }
}
