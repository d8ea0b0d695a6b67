//! Tracing initialization.
//!
//! The embedding application calls [`init`] once at startup; tests and
//! library consumers may install their own subscriber instead.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the global tracing subscriber.
///
/// Filter defaults to `racha=debug` and can be overridden through the
/// standard `RUST_LOG` environment variable.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "racha=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
