//! Log subscriber setup for the harness binary.
//!
//! Logs go to stderr, leaving stdout to the report. A failing cell shows only
//! `X` in the report; its full error detail is in this log stream.

use tracing::Level;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer, Registry};

type FilteredRegistry = Layered<EnvFilter, Registry>;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `level` when set. With `json`, lines are
/// newline-delimited JSON. Only the first call in a process has any effect.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let output = fmt::layer().with_writer(std::io::stderr);
    let output: Box<dyn Layer<FilteredRegistry> + Send + Sync> = if json {
        output.json().boxed()
    } else {
        output.boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(output)
        .try_init()
        .ok();
}
