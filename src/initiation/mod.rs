//! 🜂 Initiation
//!
//! Configuration loading and startup of the logging stack.

pub mod config;

use tracing_chrome::{ChromeLayerBuilder, FlushGuard};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. With `chrome_trace` a
/// `trace-<timestamp>.json` is written until the guard drops.
pub fn init_tracing(verbose: bool, chrome_trace: bool) -> Option<FlushGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if chrome_trace {
        let (chrome_layer, guard) = ChromeLayerBuilder::new().build();
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .with(chrome_layer)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::registry().with(filter).with(fmt_layer).init();
        None
    }
}
