use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;
use super::http::METRIC_AJAX_REQUESTS;
use crate::application::admin::smtp::{METRIC_SMTP_TEST_MS, METRIC_SMTP_TESTS};

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            METRIC_AJAX_REQUESTS,
            Unit::Count,
            "Settings panel requests received, labelled by action."
        );
        describe_counter!(
            METRIC_SMTP_TESTS,
            Unit::Count,
            "SMTP test mails attempted, labelled by outcome."
        );
        describe_histogram!(
            METRIC_SMTP_TEST_MS,
            Unit::Milliseconds,
            "Time spent delivering an SMTP test mail in milliseconds."
        );
    });
}
