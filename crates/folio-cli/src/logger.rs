//! Logging setup for the Folio CLI.
//!
//! The filter is chosen in this order:
//! 1. `--verbose`: debug for the folio crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. `[settings]` in the config (`trace = true`, then `log_level`)
//! 5. info for the folio crates
//!
//! ```rust,no_run
//! use folio_cli::logger::init_logger;
//! use folio_config::GlobalSettings;
//!
//! init_logger(false, false, false, &GlobalSettings::default());
//! tracing::info!("planning pages");
//! ```

use folio_config::GlobalSettings;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const FOLIO_CRATES: [&str; 4] = ["folio_cli", "folio_config", "folio_graph", "folio_planner"];

/// Initialize the tracing subscriber. Later calls are no-ops.
///
/// Logs go to stderr; stdout is reserved for `plan --json`.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool, settings: &GlobalSettings) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .without_time()
        .compact();

    let _ = tracing_subscriber::registry()
        .with(select_filter(verbose, quiet, settings))
        .with(fmt_layer)
        .try_init();
}

fn select_filter(verbose: bool, quiet: bool, settings: &GlobalSettings) -> EnvFilter {
    if verbose {
        return EnvFilter::new(directives("debug"));
    }
    if quiet {
        return EnvFilter::new("error");
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let level = if settings.trace {
        "trace"
    } else {
        settings.log_level.as_deref().unwrap_or("info")
    };
    EnvFilter::try_new(directives(level)).unwrap_or_else(|_| EnvFilter::new(directives("info")))
}

/// `folio_cli=<level>,folio_config=<level>,...`
fn directives(level: &str) -> String {
    FOLIO_CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
