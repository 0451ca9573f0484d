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
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
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
            "blogstats_article_list_hit_total",
            Unit::Count,
            "Recent-article lists served from the cache."
        );
        describe_counter!(
            "blogstats_article_list_miss_total",
            Unit::Count,
            "Recent-article lists loaded from the backing store."
        );
        describe_counter!(
            "blogstats_recompute_total",
            Unit::Count,
            "Article counts recomputed and written."
        );
        describe_counter!(
            "blogstats_recompute_skipped_total",
            Unit::Count,
            "Save events or categories skipped during recomputation, by reason."
        );
        describe_histogram!(
            "blogstats_backing_query_ms",
            Unit::Milliseconds,
            "Backing-store call latency in milliseconds, by operation."
        );
    });
}
