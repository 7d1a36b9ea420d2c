use axum::response::Response;

use crate::application::input::FormInput;
use crate::application::sessions::AdminPrincipal;

use super::response::{AjaxError, ajax_success, ajax_success_empty};
use super::state::AjaxState;

pub(super) async fn list(
    state: &AjaxState,
    principal: &AdminPrincipal,
) -> Result<Response, AjaxError> {
    let listing = state.email_templates.list(principal).await?;
    Ok(ajax_success(listing))
}

pub(super) async fn get(
    state: &AjaxState,
    principal: &AdminPrincipal,
    input: &FormInput,
) -> Result<Response, AjaxError> {
    let record = state.email_templates.get(principal, input).await?;
    Ok(ajax_success(record))
}

pub(super) async fn update_template(
    state: &AjaxState,
    principal: &AdminPrincipal,
    input: &FormInput,
) -> Result<Response, AjaxError> {
    let message = state.email_templates.update_template(principal, input).await?;
    Ok(ajax_success(message))
}

pub(super) async fn update_status(
    state: &AjaxState,
    principal: &AdminPrincipal,
    input: &FormInput,
) -> Result<Response, AjaxError> {
    state.email_templates.update_status(principal, input).await?;
    Ok(ajax_success_empty())
}
