use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use metrics::counter;
use tracing::debug;

use crate::application::input::FormInput;
use crate::application::messages;

use super::response::AjaxError;
use super::state::AjaxState;
use super::{auth, email_templates, settings, smtp};

const SOURCE: &str = "infra::http::admin::dispatch";
pub const METRIC_AJAX_REQUESTS: &str = "erp_settings_ajax_requests_total";

/// Actions accepted on the settings panel endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AjaxAction {
    SaveSettings,
    GetSettingsData,
    ListEmailTemplates,
    GetEmailTemplate,
    UpdateEmailStatus,
    UpdateEmailTemplate,
    TestSmtpConnection,
}

impl AjaxAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SaveSettings => "erp-settings-save",
            Self::GetSettingsData => "erp-settings-get-data",
            Self::ListEmailTemplates => "erp_get_email_templates",
            Self::GetEmailTemplate => "erp_get_single_email_template",
            Self::UpdateEmailStatus => "erp_update_email_status",
            Self::UpdateEmailTemplate => "erp_update_email_template",
            Self::TestSmtpConnection => "erp_smtp_test_connection",
        }
    }

    pub fn all() -> &'static [AjaxAction] {
        &[
            Self::SaveSettings,
            Self::GetSettingsData,
            Self::ListEmailTemplates,
            Self::GetEmailTemplate,
            Self::UpdateEmailStatus,
            Self::UpdateEmailTemplate,
            Self::TestSmtpConnection,
        ]
    }
}

impl Display for AjaxAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAction;

impl FromStr for AjaxAction {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or(UnknownAction)
    }
}

pub(super) async fn admin_ajax(
    State(state): State<AjaxState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response {
    let body = match body {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            debug!(target = "erp_settings::http::dispatch", error = %rejection, "form body ignored");
            HashMap::new()
        }
    };
    let input = FormInput::from_sources(query, body);

    let mut response = match dispatch(&state, &headers, &input).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };
    if let Some(action) = input.raw("action").and_then(|raw| raw.parse::<AjaxAction>().ok()) {
        response.extensions_mut().insert(action);
    }
    response
}

async fn dispatch(
    state: &AjaxState,
    headers: &HeaderMap,
    input: &FormInput,
) -> Result<Response, AjaxError> {
    let action = input
        .raw("action")
        .unwrap_or_default()
        .parse::<AjaxAction>()
        .map_err(|UnknownAction| AjaxError::bad_request(SOURCE, messages::UNKNOWN_ACTION))?;
    counter!(METRIC_AJAX_REQUESTS, "action" => action.as_str()).increment(1);

    let principal = auth::authenticate(state, headers).await?;
    auth::verify_nonce(state, &principal, input)?;

    match action {
        AjaxAction::SaveSettings => settings::save(state, &principal, input).await,
        AjaxAction::GetSettingsData => settings::get_data(state, &principal, input).await,
        AjaxAction::ListEmailTemplates => email_templates::list(state, &principal).await,
        AjaxAction::GetEmailTemplate => email_templates::get(state, &principal, input).await,
        AjaxAction::UpdateEmailStatus => {
            email_templates::update_status(state, &principal, input).await
        }
        AjaxAction::UpdateEmailTemplate => {
            email_templates::update_template(state, &principal, input).await
        }
        AjaxAction::TestSmtpConnection => smtp::test_connection(state, &principal, input).await,
    }
}
