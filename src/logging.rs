use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs a stderr `fmt` subscriber. The filter comes from `RUST_LOG` and
/// defaults to `info`.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
