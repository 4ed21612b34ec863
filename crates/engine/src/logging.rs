//! Tracing initialization for embedding applications and tests.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with an env-filter, defaulting to debug for this
/// crate. Call once from the embedding application's entry point.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paperstage_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Test-friendly variant: ignores double initialization and writes through
/// the test capture writer.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paperstage_engine=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
