use std::error::Error as StdError;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::application::admin::email_templates::AdminEmailError;
use crate::application::admin::settings::AdminSettingsError;
use crate::application::admin::smtp::SmtpTestError;
use crate::application::error::ErrorReport;
use crate::application::messages;
use crate::application::options::OptionStoreError;
use crate::application::repos::RepoError;

/// Body of every settings panel response.
#[derive(Debug, Serialize)]
pub struct AjaxEnvelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: String,
}

impl MessageData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn ajax_success<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(AjaxEnvelope {
            success: true,
            data: Some(data),
        }),
    )
        .into_response()
}

pub fn ajax_success_empty() -> Response {
    (
        StatusCode::OK,
        Json(AjaxEnvelope::<Value> {
            success: true,
            data: None,
        }),
    )
        .into_response()
}

/// A failed panel request: the message shown to the user plus diagnostics for the logs.
#[derive(Debug)]
pub struct AjaxError {
    status: StatusCode,
    message: String,
    report: ErrorReport,
}

impl AjaxError {
    pub fn new(source: &'static str, status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            status,
            report: ErrorReport::from_message(source, status, message.clone()),
            message,
        }
    }

    /// Show `message` while logging the full cause chain of `cause`.
    pub fn with_cause(
        source: &'static str,
        status: StatusCode,
        message: impl Into<String>,
        cause: &dyn StdError,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            report: ErrorReport::from_error(source, status, cause),
        }
    }

    pub fn bad_request(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(source: &'static str) -> Self {
        Self::new(source, StatusCode::UNAUTHORIZED, messages::SESSION_REQUIRED)
    }

    pub fn forbidden(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(source: &'static str, message: impl Into<String>) -> Self {
        Self::new(source, StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn store(source: &'static str, err: &OptionStoreError) -> Self {
        let status = match err {
            OptionStoreError::Repo(RepoError::Timeout) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::with_cause(source, status, messages::SERVICE_UNAVAILABLE, err)
    }
}

impl IntoResponse for AjaxError {
    fn into_response(self) -> Response {
        let body = AjaxEnvelope {
            success: false,
            data: Some(MessageData::new(self.message)),
        };
        let mut response = (self.status, Json(body)).into_response();
        self.report.attach(&mut response);
        response
    }
}

const SETTINGS_SOURCE: &str = "infra::http::admin::settings";
const EMAIL_SOURCE: &str = "infra::http::admin::email_templates";
const SMTP_SOURCE: &str = "infra::http::admin::smtp";

impl From<AdminSettingsError> for AjaxError {
    fn from(err: AdminSettingsError) -> Self {
        match &err {
            AdminSettingsError::PermissionDenied => {
                Self::forbidden(SETTINGS_SOURCE, err.to_string())
            }
            AdminSettingsError::UnregisteredModule(module) => Self::with_cause(
                SETTINGS_SOURCE,
                StatusCode::NOT_FOUND,
                err.to_string(),
                &UnregisteredModule(module.clone()),
            ),
            AdminSettingsError::Rejected(message) => {
                Self::bad_request(SETTINGS_SOURCE, message.clone())
            }
            AdminSettingsError::Processing => Self::new(
                SETTINGS_SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                err.to_string(),
            ),
            AdminSettingsError::Store(inner) => Self::store(SETTINGS_SOURCE, inner),
        }
    }
}

impl From<AdminEmailError> for AjaxError {
    fn from(err: AdminEmailError) -> Self {
        match &err {
            AdminEmailError::PermissionDenied => Self::forbidden(EMAIL_SOURCE, err.to_string()),
            AdminEmailError::InvalidTemplateId | AdminEmailError::AlwaysEnabled => {
                Self::bad_request(EMAIL_SOURCE, err.to_string())
            }
            AdminEmailError::NotFound => Self::not_found(EMAIL_SOURCE, err.to_string()),
            AdminEmailError::Store(inner) => Self::store(EMAIL_SOURCE, inner),
        }
    }
}

impl From<SmtpTestError> for AjaxError {
    fn from(err: SmtpTestError) -> Self {
        match &err {
            SmtpTestError::PermissionDenied => Self::forbidden(SMTP_SOURCE, err.to_string()),
            SmtpTestError::Invalid(message) => Self::bad_request(SMTP_SOURCE, *message),
            SmtpTestError::Send(inner) => Self::with_cause(
                SMTP_SOURCE,
                StatusCode::BAD_GATEWAY,
                inner.to_string(),
                inner,
            ),
            SmtpTestError::Store(inner) => Self::store(SMTP_SOURCE, inner),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no settings handler registered for module `{0}`")]
struct UnregisteredModule(String);
