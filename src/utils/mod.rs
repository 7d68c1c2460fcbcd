use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "booking_core=warn";

/// Initializes the global tracing subscriber with sensible defaults.
///
/// Logs go to stderr so they never interleave with rendered tables.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
