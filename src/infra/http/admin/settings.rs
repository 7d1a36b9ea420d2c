use axum::response::Response;

use crate::application::input::FormInput;
use crate::application::sessions::AdminPrincipal;

use super::response::{AjaxError, MessageData, ajax_success};
use super::state::AjaxState;

pub(super) async fn save(
    state: &AjaxState,
    principal: &AdminPrincipal,
    input: &FormInput,
) -> Result<Response, AjaxError> {
    let message = state.settings.save(principal, input).await?;
    Ok(ajax_success(MessageData::new(message)))
}

pub(super) async fn get_data(
    state: &AjaxState,
    principal: &AdminPrincipal,
    input: &FormInput,
) -> Result<Response, AjaxError> {
    let record = state.settings.get_data(principal, input).await?;
    Ok(ajax_success(record))
}
