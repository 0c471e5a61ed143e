//! Tracing configuration for debugging lowering decisions.
//!
//! Controlled by `TSDL_LOG`, with `RUST_LOG` honored as a fallback.
//! Values use the usual filter syntax (`debug`,
//! `tsdl_emitter=trace,tsdl_parser=debug`). `TSDL_LOG_FORMAT=json`
//! switches to newline-delimited JSON events; anything else is the
//! flat text subscriber.
//!
//! ```bash
//! TSDL_LOG=debug tsdl file.ts
//! TSDL_LOG=tsdl_emitter=trace TSDL_LOG_FORMAT=json tsdl file.ts
//! ```
//!
//! The subscriber is only initialised when one of the variables is
//! set, so there is zero overhead in normal runs.

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `TSDL_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSDL_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `TSDL_LOG` nor `RUST_LOG` is set. All
/// output goes to stderr so it never mixes with emitted JavaScript or
/// `--json` diagnostics on stdout.
pub fn init_tracing() {
    let has_tsdl_log = std::env::var("TSDL_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tsdl_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    let json = std::env::var("TSDL_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
