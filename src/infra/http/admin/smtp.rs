use axum::response::Response;

use crate::application::input::FormInput;
use crate::application::sessions::AdminPrincipal;

use super::response::{AjaxError, MessageData, ajax_success};
use super::state::AjaxState;

pub(super) async fn test_connection(
    state: &AjaxState,
    principal: &AdminPrincipal,
    input: &FormInput,
) -> Result<Response, AjaxError> {
    let message = state.smtp.test_connection(principal, input).await?;
    Ok(ajax_success(MessageData::new(message)))
}
