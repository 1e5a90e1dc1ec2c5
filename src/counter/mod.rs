//! Time-gated build counter
//!
//! `VERSION_BUILD` moves only on qualifying builds (assemble tasks for a
//! tracked flavor/build type), and only when more than the configured gap has
//! passed since `BUILD_TIME`. Rapid rebuilds refresh the timestamp without
//! bumping the number.
//!
//! The store is read once, the decision is made against that snapshot, and
//! both keys are written back in one save. The number is only reported as
//! incremented after the save succeeds.

pub mod summary;

use crate::core::config::{CounterConfig, TrackedVariant};
use crate::core::error::{ConfigError, KeeperResult};
use crate::core::project::{self, BUILD_TIME, VERSION_BUILD};
use crate::core::properties::PropertiesStore;
use serde::Serialize;

pub use summary::VersionSummary;

/// Persisted counter state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildState {
  pub build_number: u64,
  pub last_build_time_millis: Option<i64>,
}

impl BuildState {
  /// Build number after an increment
  pub fn next_build_number(&self) -> KeeperResult<u64> {
    self.build_number.checked_add(1).ok_or_else(|| {
      ConfigError::InvalidInteger {
        key: VERSION_BUILD.to_string(),
        value: self.build_number.to_string(),
      }
      .into()
    })
  }
}

/// Result of a qualifying build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterOutcome {
  pub state: BuildState,
  pub incremented: bool,
}

/// Gate settings for the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterPolicy {
  pub min_gap_millis: i64,
  pub increment_on_first_build: bool,
}

impl CounterPolicy {
  pub fn new(min_gap_millis: i64) -> Self {
    Self {
      min_gap_millis,
      increment_on_first_build: false,
    }
  }

  pub fn from_config(config: &CounterConfig) -> Self {
    Self {
      increment_on_first_build: config.increment_on_first_build,
      ..Self::new(config.min_gap_millis())
    }
  }

  /// Whether a qualifying build at `now` bumps the number
  pub(crate) fn gap_elapsed(&self, last: Option<i64>, now: i64) -> bool {
    match last {
      Some(last) => now.saturating_sub(last) > self.min_gap_millis,
      None => self.increment_on_first_build,
    }
  }
}

pub struct BuildCounter;

impl BuildCounter {
  /// Read the current state without touching the file
  pub fn current_info(store: &PropertiesStore) -> KeeperResult<BuildState> {
    let build_number = match store.get(VERSION_BUILD) {
      Some(raw) => project::parse_integer(VERSION_BUILD, raw)?,
      None => {
        return Err(
          ConfigError::MissingKey {
            key: VERSION_BUILD.to_string(),
            path: store.path().to_path_buf(),
          }
          .into(),
        );
      }
    };

    let last_build_time_millis = match store.get(BUILD_TIME) {
      Some(raw) if !raw.trim().is_empty() => Some(project::parse_integer(BUILD_TIME, raw)?),
      _ => None,
    };

    Ok(BuildState {
      build_number,
      last_build_time_millis,
    })
  }

  /// Record a qualifying build at `now` (millis since epoch)
  ///
  /// Always refreshes `BUILD_TIME`; bumps `VERSION_BUILD` by one when the gap
  /// has elapsed. On a failed save `store` is left as it was.
  pub fn on_qualifying_build(store: &mut PropertiesStore, policy: CounterPolicy, now: i64) -> KeeperResult<CounterOutcome> {
    let before = Self::current_info(store)?;
    let incremented = policy.gap_elapsed(before.last_build_time_millis, now);

    let state = BuildState {
      build_number: if incremented {
        before.next_build_number()?
      } else {
        before.build_number
      },
      last_build_time_millis: Some(now),
    };

    let mut next = store.clone();
    next.set(VERSION_BUILD, state.build_number.to_string());
    next.set(BUILD_TIME, now.to_string());
    next.save()?;
    *store = next;

    tracing::info!(
      build_number = state.build_number,
      incremented,
      last_build_time = ?before.last_build_time_millis,
      now,
      "recorded qualifying build"
    );

    Ok(CounterOutcome { state, incremented })
  }
}

/// Which tracked variant, if any, the requested tasks assemble
///
/// Accepts `assembleAppRelease`, `app:assembleAppRelease`, and
/// `:app:assembleAppRelease`, mirroring how the orchestrator reports task
/// paths for `project`.
pub fn qualifying_variant<'a>(
  tasks: &[String],
  project: &str,
  tracked: &'a [TrackedVariant],
) -> Option<&'a TrackedVariant> {
  tracked.iter().find(|variant| {
    let task_name = assemble_task_name(&variant.flavor, &variant.build_type);
    tasks.iter().any(|task| {
      let task = task.trim();
      let unqualified = task
        .strip_prefix(':')
        .unwrap_or(task)
        .strip_prefix(project)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(task);
      unqualified == task_name
    })
  })
}

/// `assemble` + capitalized flavor + capitalized build type
pub fn assemble_task_name(flavor: &str, build_type: &str) -> String {
  format!("assemble{}{}", capitalize(flavor), capitalize(build_type))
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().chain(chars).collect(),
    None => String::new(),
  }
}
