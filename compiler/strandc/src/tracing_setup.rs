//! Tracing subscriber installation.

use std::sync::Once;

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;
use tracing_tree::HierarchicalLayer;

/// Filter directives are read from this variable first, then `RUST_LOG`.
pub const LOG_VAR: &str = "STRAND_LOG";

static TRACING_INIT: Once = Once::new();

/// Install a hierarchical stderr subscriber.
///
/// Nothing is installed unless `STRAND_LOG` or `RUST_LOG` is set, or
/// `verbose` asks for resolver debug output. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let Some(filter) = filter_from_env(verbose) else {
            return;
        };
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                HierarchicalLayer::new(2)
                    .with_targets(true)
                    .with_bracketed_fields(true),
            )
            .try_init();
    });
}

fn filter_from_env(verbose: bool) -> Option<EnvFilter> {
    if let Ok(directives) = std::env::var(LOG_VAR) {
        return Some(EnvFilter::new(directives));
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Some(filter);
    }
    verbose.then(|| EnvFilter::new("strand_resolve=debug"))
}
