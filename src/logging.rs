//! Tracing subscriber setup for the `u-domset` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the application. Output goes to stderr so it never interleaves with
//! the interactive menu on stdout.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: overrides the level filter (e.g. `u_domset=debug`)
//! - `U_DOMSET_LOG_JSON`: `1` or `true` selects JSON output

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    util::TryInitError,
    EnvFilter,
};

/// Environment variable that switches on JSON output.
pub const LOG_JSON_ENV: &str = "U_DOMSET_LOG_JSON";

/// Installs the global subscriber.
///
/// * `json` - machine-readable JSON lines instead of the pretty format.
/// * `default_level` - filter used when `RUST_LOG` is unset.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn setup_logging(json: bool, default_level: &str) -> Result<(), TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
    }
}

/// Whether [`LOG_JSON_ENV`] requests JSON output.
pub fn should_use_json() -> bool {
    json_flag(std::env::var(LOG_JSON_ENV).ok().as_deref())
}

fn json_flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}
