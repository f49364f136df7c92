//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wayfarer_core::env::{get_var, vars};

/// Filter used when neither `WAYFARER_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "wayfarer=info,tower_http=info";

/// Pick the filter directives. `-v` raises the default to debug.
pub fn filter_directives(verbose: u8) -> String {
    if let Some(filter) = get_var(vars::WAYFARER_LOG).or_else(|| get_var("RUST_LOG")) {
        return filter;
    }

    match verbose {
        0 => DEFAULT_FILTER.to_string(),
        1 => "wayfarer=debug,tower_http=debug".to_string(),
        _ => "debug".to_string(),
    }
}

/// Install the global subscriber.
pub fn init(verbose: u8, json: bool) {
    let filter = EnvFilter::try_new(filter_directives(verbose))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
