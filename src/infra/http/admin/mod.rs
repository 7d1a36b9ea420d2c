mod auth;
mod dispatch;
mod email_templates;
mod health;
mod nonce;
mod response;
mod settings;
mod smtp;
mod state;

pub use auth::SESSION_HEADER;
pub use dispatch::{AjaxAction, METRIC_AJAX_REQUESTS};
pub use response::{AjaxEnvelope, AjaxError, MessageData};
pub use state::AjaxState;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use super::middleware::{log_responses, set_request_context};

pub fn build_router(state: AjaxState) -> Router {
    Router::new()
        .route("/admin-ajax", post(dispatch::admin_ajax))
        .route("/admin-ajax/nonce", get(nonce::issue_nonce))
        .route("/health", get(health::liveness))
        .route("/health/db", get(health::db_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}
