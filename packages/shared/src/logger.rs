//! Logger setup shared by the binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose debug output drowns out ours.
const QUIET_TARGETS: &[&str] = &["tungstenite", "tokio_tungstenite", "hyper", "hyper_util"];

/// Build the default filter directive used when `RUST_LOG` is not set.
pub fn default_directive(default_level: &str) -> String {
    let mut directive = default_level.to_string();
    for target in QUIET_TARGETS {
        directive.push_str(&format!(",{target}=info"));
    }
    directive
}

/// Initialize the global tracing subscriber.
///
/// Logs go to stderr so that the chat client can keep stdout for messages.
/// `RUST_LOG` takes precedence over `default_level`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(default_level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .try_init();

    match result {
        Ok(()) => tracing::debug!("Logger initialized for {}", bin_name),
        Err(e) => eprintln!("{bin_name}: logger already initialized: {e}"),
    }
}
