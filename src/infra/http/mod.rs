mod admin;
mod middleware;

pub use admin::{
    AjaxAction, AjaxEnvelope, AjaxError, AjaxState, METRIC_AJAX_REQUESTS, MessageData,
    SESSION_HEADER, build_router,
};
pub use middleware::RequestContext;

use std::error::Error as StdError;

use crate::application::error::ErrorReport;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

fn db_health_response<E: StdError>(result: Result<(), E>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            let mut response = StatusCode::SERVICE_UNAVAILABLE.into_response();
            ErrorReport::from_error(
                "infra::http::db_health",
                StatusCode::SERVICE_UNAVAILABLE,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
