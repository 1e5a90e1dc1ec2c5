//! Toolchain / orchestrator compatibility table
//!
//! Each row says "toolchain N is supported from orchestrator version V on".
//! Looking up an orchestrator version is a greatest-lower-bound search over the
//! rows, so adding a row never needs a logic change.

use crate::version::compare::DottedVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the compatibility table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityEntry {
  /// Toolchain (JVM) major version
  pub version: u32,
  /// Minimum orchestrator (Gradle) version that supports it
  pub orchestrator: String,
}

impl CompatibilityEntry {
  pub fn new(version: u32, orchestrator: impl Into<String>) -> Self {
    Self {
      version,
      orchestrator: orchestrator.into(),
    }
  }
}

/// Gradle compatibility matrix for running Gradle on a given JVM.
/// https://docs.gradle.org/current/userguide/compatibility.html
pub fn default_entries() -> Vec<CompatibilityEntry> {
  vec![
    CompatibilityEntry::new(17, "7.3"),
    CompatibilityEntry::new(18, "7.5"),
    CompatibilityEntry::new(19, "7.6"),
    CompatibilityEntry::new(20, "8.3"),
    CompatibilityEntry::new(21, "8.5"),
    CompatibilityEntry::new(22, "8.8"),
    CompatibilityEntry::new(23, "8.10"),
    // Unofficial as of Mar 19, 2025
    CompatibilityEntry::new(24, "8.11"),
  ]
}

#[derive(Debug, Clone, Default)]
pub struct CompatibilityTable {
  by_orchestrator: BTreeMap<DottedVersion, u32>,
}

impl CompatibilityTable {
  pub fn new(entries: &[CompatibilityEntry]) -> Self {
    let mut by_orchestrator = BTreeMap::new();
    for entry in entries {
      // Two rows naming the same orchestrator version keep the higher toolchain
      by_orchestrator
        .entry(DottedVersion::parse(&entry.orchestrator))
        .and_modify(|v: &mut u32| *v = (*v).max(entry.version))
        .or_insert(entry.version);
    }
    Self { by_orchestrator }
  }

  /// Highest toolchain version supported by `orchestrator`
  ///
  /// When the orchestrator predates every row, the lowest listed toolchain is
  /// returned. `None` only for an empty table.
  pub fn ceiling_for(&self, orchestrator: &DottedVersion) -> Option<u32> {
    let supported = self
      .by_orchestrator
      .range(..=orchestrator.clone())
      .map(|(_, version)| *version)
      .max();

    supported.or_else(|| self.lowest())
  }

  fn lowest(&self) -> Option<u32> {
    self.by_orchestrator.values().copied().min()
  }
}
