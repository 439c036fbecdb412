pub mod advice;
pub mod api;
pub mod app;
pub mod assessment;
pub mod config;
pub mod model_store;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise each `-v` raises the default level.
/// Calling this twice is harmless.
pub fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => config::default_log_filter().to_string(),
        1 => "diabestie=debug,diabestie_lib=debug,tower_http=info".to_string(),
        _ => "trace".to_string(),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
