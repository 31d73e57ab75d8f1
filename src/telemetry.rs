use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Install a stderr subscriber filtered by RUST_LOG.
///
/// Logs go to stderr so the JSON report on stdout stays machine-readable.
pub fn init_tracing_subscriber() {
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    tracing_subscriber::registry().with(console_layer).init();
}
