//! Host toolchain detection and advisories
//!
//! The host ceiling is the major version of the JDK running the build. It is
//! resolved from an explicit override first, then `$JAVA_HOME/release`, then
//! `java -version`.

use crate::core::error::{ConfigError, KeeperResult};
use crate::core::project::JavaRequirements;
use crate::version::compare::DottedVersion;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Where the host version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSource {
  Override,
  JavaHome,
  JavaCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HostToolchain {
  pub major: u32,
  pub source: HostSource,
}

impl HostToolchain {
  /// Resolve the host toolchain, preferring `override_major`
  pub fn detect(override_major: Option<u32>) -> KeeperResult<Self> {
    if let Some(major) = override_major {
      return Ok(Self {
        major,
        source: HostSource::Override,
      });
    }

    if let Some(java_home) = std::env::var_os("JAVA_HOME")
      && let Some(major) = read_release_file(Path::new(&java_home).join("release").as_path())
    {
      tracing::debug!(major, "host toolchain from JAVA_HOME");
      return Ok(Self {
        major,
        source: HostSource::JavaHome,
      });
    }

    let output = Command::new("java")
      .arg("-version")
      .output()
      .map_err(|e| ConfigError::HostUndetected {
        reason: format!("failed to run `java -version`: {}", e),
      })?;

    // `java -version` prints to stderr
    let text = format!(
      "{}{}",
      String::from_utf8_lossy(&output.stderr),
      String::from_utf8_lossy(&output.stdout)
    );
    let major = parse_java_version_output(&text).ok_or_else(|| ConfigError::HostUndetected {
      reason: format!("unrecognized `java -version` output: {}", text.lines().next().unwrap_or("")),
    })?;

    tracing::debug!(major, "host toolchain from java -version");
    Ok(Self {
      major,
      source: HostSource::JavaCommand,
    })
  }
}

fn read_release_file(path: &Path) -> Option<u32> {
  let content = fs::read_to_string(path).ok()?;
  content.lines().find_map(|line| {
    let value = line.strip_prefix("JAVA_VERSION=")?;
    java_major(value.trim().trim_matches('"'))
  })
}

/// Extract the major version from `java -version` output
///
/// Handles `openjdk version "21.0.2" 2024-01-16` as well as legacy
/// `java version "1.8.0_392"`.
pub fn parse_java_version_output(text: &str) -> Option<u32> {
  text.lines().find_map(|line| {
    if !line.contains("version") {
      return None;
    }
    let start = line.find('"')? + 1;
    let end = start + line[start..].find('"')?;
    java_major(&line[start..end])
  })
}

/// Major version of a JDK version string; `1.x` maps to `x`
pub fn java_major(raw: &str) -> Option<u32> {
  let version = DottedVersion::parse(&raw.replace('_', "."));
  let major = match version.parts() {
    [1, minor, ..] => *minor,
    [major, ..] => *major,
    [] => return None,
  };
  u32::try_from(major).ok().filter(|m| *m > 0)
}

/// Non-fatal recommendation about the host JDK
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
  /// Host is older than the suggested minimum
  Upgrade { host: u32, suggested: u32, radical: u32 },
  /// Host is at or above the version the orchestrator may not handle
  Downgrade { host: u32, suggested: u32, radical: u32 },
}

impl std::fmt::Display for Advisory {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match *self {
      Advisory::Upgrade {
        host,
        suggested,
        radical,
      } => {
        write!(
          f,
          "It is recommended to upgrade current JDK version {} to {} or higher",
          host, suggested
        )?;
        if radical > 0 {
          write!(f, " (but lower than {})", radical)?;
        }
        write!(f, ".")
      }
      Advisory::Downgrade {
        host,
        suggested,
        radical,
      } => {
        let target = radical - 1;
        write!(f, "It is recommended to downgrade current JDK version {} to {}", host, target)?;
        if target > suggested {
          write!(f, " or lower (but not lower than {})", suggested)?;
        }
        write!(f, ", as the build may be not compatible with JDK {}", radical)?;
        if host > radical {
          write!(f, " (and above)")?;
        }
        write!(f, " for now.")
      }
    }
  }
}

/// Check the host against the requirements
///
/// A host below the supported minimum is fatal; the rest are advisories.
pub fn assess(host: u32, java: &JavaRequirements) -> KeeperResult<Vec<Advisory>> {
  if host < java.min_supported {
    return Err(
      ConfigError::HostBelowMinimum {
        host,
        min_supported: java.min_supported,
      }
      .into(),
    );
  }

  let mut advisories = Vec::new();
  if host < java.min_suggested {
    advisories.push(Advisory::Upgrade {
      host,
      suggested: java.min_suggested,
      radical: java.min_radical,
    });
  }
  if java.min_radical > 0 && java.min_radical <= host {
    advisories.push(Advisory::Downgrade {
      host,
      suggested: java.min_suggested,
      radical: java.min_radical,
    });
  }
  Ok(advisories)
}
