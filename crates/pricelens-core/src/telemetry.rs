//! Centralised tracing initialisation for pricelens binaries.
//!
//! Call [`init_tracing`] once at program start to configure the global
//! subscriber. Without `RUST_LOG`, only pricelens crates log at the requested
//! level; HTTP client internals (`reqwest`, `hyper`) stay at `warn`.
//! Later calls are ignored.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const PRICELENS_TARGETS: [&str; 2] = ["pricelens_core", "pricelens"];

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_filter(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(PRICELENS_TARGETS.iter().map(|t| format!("{t}={level}")));
    directives.join(",")
}

/// Initialise the global tracing subscriber.
///
/// * `json`: emit newline-delimited JSON log lines.
/// * `level`: pricelens verbosity when `RUST_LOG` is not set.
///
/// Logs go to stderr so search output on stdout stays machine-readable.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(env_filter);
    let _ = if json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer).try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_scopes_level_to_pricelens_crates() {
        assert_eq!(
            default_filter(Level::DEBUG),
            "warn,pricelens_core=debug,pricelens=debug"
        );
        assert!(default_filter(Level::INFO).parse::<EnvFilter>().is_ok());
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(false, Level::WARN);
        init_tracing(true, Level::DEBUG);
    }
}
