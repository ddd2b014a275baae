//! Logging integration for recordkit.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-record spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// Log records go to stderr, leaving stdout to whatever the program prints.
/// A subscriber that is already installed is left in place.
pub fn setup_logging(settings: &Settings) {
    tracing::subscriber::set_global_default(build_subscriber(settings, std::io::stderr)).ok();
}

/// Builds the subscriber [`setup_logging`] installs, writing to `make_writer`.
///
/// The filter is read from `settings.log_level`. In debug mode a pretty,
/// human-readable format is used; otherwise a structured JSON format is used.
pub fn build_subscriber<W>(
    settings: &Settings,
    make_writer: W,
) -> Box<dyn tracing::Subscriber + Send + Sync>
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(make_writer)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true)
                .pretty()
                .finish(),
        )
    } else {
        Box::new(
            fmt::Subscriber::builder()
                .with_env_filter(filter)
                .with_writer(make_writer)
                .with_target(true)
                .json()
                .finish(),
        )
    }
}

/// Creates a tracing span for work done on behalf of one record type.
///
/// # Examples
///
/// ```
/// use recordkit_core::logging::model_span;
///
/// let span = model_span("user");
/// let _guard = span.enter();
/// tracing::info!("building record");
/// ```
pub fn model_span(model: &str) -> tracing::Span {
    tracing::info_span!("record", model = model)
}
