//! Effective toolchain version negotiation
//!
//! Starts from the desired version and lowers it in three ordered passes:
//!
//! 1. **fallback**: down to the nearest target the local toolchain recognizes,
//!    never below the supported floor
//! 2. **coerced**: down to what the orchestrator version supports
//! 3. **consistent**: down to the host's installed version
//!
//! Pure and deterministic: the same inputs always produce the same result.

use crate::core::error::{ConfigError, KeeperResult};
use crate::version::compare::DottedVersion;
use crate::version::compat::CompatibilityTable;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Inputs to one negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionSpec {
  pub desired: u32,
  pub min_supported: u32,
  pub min_suggested: u32,
  pub min_radical: u32,
  pub host_ceiling: u32,
}

/// Why the effective version differs from the desired one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionFlag {
  Fallback,
  Coerced,
  Consistent,
}

impl VersionFlag {
  pub fn as_str(self) -> &'static str {
    match self {
      VersionFlag::Fallback => "fallback",
      VersionFlag::Coerced => "coerced",
      VersionFlag::Consistent => "consistent",
    }
  }
}

impl fmt::Display for VersionFlag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]", self.as_str())
  }
}

/// Negotiation result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NegotiatedVersion {
  pub effective: u32,
  /// Applied flags, in pass order
  pub flags: Vec<VersionFlag>,
}

impl NegotiatedVersion {
  /// Bracketed flag suffixes, e.g. ` [fallback] [coerced]`; empty without flags
  pub fn suffix(&self) -> String {
    self.flags.iter().map(|flag| format!(" {}", flag)).collect()
  }
}

impl fmt::Display for NegotiatedVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.effective, self.suffix())
  }
}

/// Toolchain targets the local compiler can emit
pub trait TargetCatalog {
  fn recognizes(&self, version: u32) -> bool;
}

/// Catalog backed by an explicit set of versions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownTargets {
  versions: BTreeSet<u32>,
}

impl KnownTargets {
  pub fn new(versions: impl IntoIterator<Item = u32>) -> Self {
    Self {
      versions: versions.into_iter().collect(),
    }
  }
}

impl TargetCatalog for KnownTargets {
  fn recognizes(&self, version: u32) -> bool {
    self.versions.contains(&version)
  }
}

/// JVM bytecode targets the Kotlin compiler exposes (`JVM_1_8`, `JVM_9` .. `JVM_24`)
pub fn default_targets() -> Vec<u32> {
  std::iter::once(8).chain(9..=24).collect()
}

pub struct Negotiator<C: TargetCatalog> {
  catalog: C,
  table: CompatibilityTable,
}

impl<C: TargetCatalog> Negotiator<C> {
  pub fn new(catalog: C, table: CompatibilityTable) -> Self {
    Self { catalog, table }
  }

  /// Compute the effective toolchain version
  ///
  /// Without an orchestrator version the coercion pass is skipped.
  pub fn negotiate(&self, spec: &VersionSpec, orchestrator: Option<&DottedVersion>) -> KeeperResult<NegotiatedVersion> {
    if !(1..=spec.min_supported).any(|v| self.catalog.recognizes(v)) {
      return Err(
        ConfigError::NoViableToolchain {
          min_supported: spec.min_supported,
        }
        .into(),
      );
    }

    let mut candidate = spec.desired;
    let mut flags = Vec::new();

    let mut fell_back = false;
    while candidate > spec.min_supported && !self.catalog.recognizes(candidate) {
      candidate -= 1;
      fell_back = true;
    }
    if fell_back {
      flags.push(VersionFlag::Fallback);
    }

    if let Some(orchestrator) = orchestrator
      && let Some(ceiling) = self.table.ceiling_for(orchestrator)
      && ceiling < candidate
    {
      tracing::debug!(%orchestrator, ceiling, candidate, "coercing toolchain to orchestrator ceiling");
      candidate = ceiling;
      flags.push(VersionFlag::Coerced);
    }

    if candidate > spec.host_ceiling {
      tracing::debug!(host = spec.host_ceiling, candidate, "clamping toolchain to host version");
      candidate = spec.host_ceiling;
      flags.push(VersionFlag::Consistent);
    }

    Ok(NegotiatedVersion {
      effective: candidate,
      flags,
    })
  }
}
