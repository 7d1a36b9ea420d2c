use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::super::db_health_response;
use super::AjaxState;

pub(super) async fn liveness() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

pub(super) async fn db_health(State(state): State<AjaxState>) -> Response {
    db_health_response(state.options.health_check().await)
}
