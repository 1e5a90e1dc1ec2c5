//! Tracing initialisation
//!
//! Call [`init_tracing`] once at startup. Logs go to stderr so stdout stays
//! clean for `--json` output.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `level` applies. With `json` every
/// event is a JSON line. Later calls are ignored.
pub fn init_tracing(json: bool, level: Level) {
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

  if json {
    tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt::layer().with_target(false).with_writer(std::io::stderr).json())
      .try_init()
      .ok();
  } else {
    tracing_subscriber::registry()
      .with(env_filter)
      .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
      .try_init()
      .ok();
  }
}

/// Default level for the `--verbose` flag
pub fn level_for(verbose: bool) -> Level {
  if verbose { Level::DEBUG } else { Level::WARN }
}
