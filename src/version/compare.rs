//! Dotted version comparison
//!
//! Orchestrator versions such as `8.10`, `7.6.1`, or `8.11-rc-2` are parsed
//! into integer components split on `.` and `-`. Non-numeric components count
//! as 0 and missing trailing components compare as 0, so `8.0 == 8` and
//! `8.10 > 8.9`.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct DottedVersion {
  raw: String,
  parts: Vec<u64>,
}

impl DottedVersion {
  pub fn parse(raw: &str) -> Self {
    let raw = raw.trim();
    let parts = raw
      .split(['.', '-'])
      .map(|part| part.trim().parse::<u64>().unwrap_or(0))
      .collect();

    Self {
      raw: raw.to_string(),
      parts,
    }
  }

  /// Integer components as parsed
  pub fn parts(&self) -> &[u64] {
    &self.parts
  }

  fn component(&self, idx: usize) -> u64 {
    self.parts.get(idx).copied().unwrap_or(0)
  }
}

impl FromStr for DottedVersion {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(Self::parse(s))
  }
}

impl Ord for DottedVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    let len = self.parts.len().max(other.parts.len());
    (0..len)
      .map(|i| self.component(i).cmp(&other.component(i)))
      .find(|ord| *ord != Ordering::Equal)
      .unwrap_or(Ordering::Equal)
  }
}

impl PartialOrd for DottedVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

// Equality follows the zero-padded ordering, not the raw text
impl PartialEq for DottedVersion {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for DottedVersion {}

impl fmt::Display for DottedVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.raw)
  }
}

impl Serialize for DottedVersion {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.raw)
  }
}
