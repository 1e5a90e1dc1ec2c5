//! Typed view over the project's version properties

use crate::core::error::{ConfigError, KeeperResult};
use crate::core::properties::PropertiesStore;
use serde::Serialize;

pub const MIN_SDK_VERSION: &str = "MIN_SDK_VERSION";
pub const TARGET_SDK_VERSION: &str = "TARGET_SDK_VERSION";
pub const TARGET_SDK_VERSION_INRT: &str = "TARGET_SDK_VERSION_INRT";
pub const COMPILE_SDK_VERSION: &str = "COMPILE_SDK_VERSION";
pub const VERSION_NAME: &str = "VERSION_NAME";
pub const VERSION_BUILD: &str = "VERSION_BUILD";
pub const VSCODE_EXT_REQUIRED_VERSION: &str = "VSCODE_EXT_REQUIRED_VERSION";
pub const JAVA_VERSION: &str = "JAVA_VERSION";
pub const JAVA_VERSION_MIN_SUPPORTED: &str = "JAVA_VERSION_MIN_SUPPORTED";
pub const JAVA_VERSION_MIN_SUGGESTED: &str = "JAVA_VERSION_MIN_SUGGESTED";
pub const JAVA_VERSION_MIN_RADICAL: &str = "JAVA_VERSION_MIN_RADICAL";
pub const BUILD_TIME: &str = "BUILD_TIME";

/// SDK levels declared for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SdkVersions {
  pub min: u32,
  pub target: u32,
  pub target_inrt: u32,
  pub compile: u32,
}

/// Toolchain (JVM) version requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JavaRequirements {
  pub desired: u32,
  pub min_supported: u32,
  pub min_suggested: u32,
  /// First version the orchestrator may choke on; 0 disables the check
  pub min_radical: u32,
}

/// Every versioning key the pipeline reads from the properties file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectVersions {
  pub version_name: String,
  pub version_build: u64,
  pub vscode_ext_required_version: String,
  pub sdk: SdkVersions,
  pub java: JavaRequirements,
  /// Millis since epoch of the last qualifying build, absent before the first one
  pub build_time: Option<i64>,
}

impl ProjectVersions {
  /// Read and validate all keys; any missing or malformed key is fatal
  pub fn from_store(store: &PropertiesStore) -> KeeperResult<Self> {
    let reader = KeyReader { store };

    Ok(Self {
      version_name: reader.string(VERSION_NAME)?,
      version_build: reader.integer(VERSION_BUILD)?,
      vscode_ext_required_version: reader.string(VSCODE_EXT_REQUIRED_VERSION)?,
      sdk: SdkVersions {
        min: reader.integer(MIN_SDK_VERSION)?,
        target: reader.integer(TARGET_SDK_VERSION)?,
        target_inrt: reader.integer(TARGET_SDK_VERSION_INRT)?,
        compile: reader.integer(COMPILE_SDK_VERSION)?,
      },
      java: JavaRequirements {
        desired: reader.integer(JAVA_VERSION)?,
        min_supported: reader.integer(JAVA_VERSION_MIN_SUPPORTED)?,
        min_suggested: reader.integer(JAVA_VERSION_MIN_SUGGESTED)?,
        min_radical: reader.integer(JAVA_VERSION_MIN_RADICAL)?,
      },
      build_time: reader.optional_integer(BUILD_TIME)?,
    })
  }
}

struct KeyReader<'a> {
  store: &'a PropertiesStore,
}

impl KeyReader<'_> {
  fn string(&self, key: &str) -> KeeperResult<String> {
    self.store.get(key).map(str::to_string).ok_or_else(|| {
      ConfigError::MissingKey {
        key: key.to_string(),
        path: self.store.path().to_path_buf(),
      }
      .into()
    })
  }

  fn integer<T: std::str::FromStr>(&self, key: &str) -> KeeperResult<T> {
    let raw = self.string(key)?;
    parse_integer(key, &raw)
  }

  fn optional_integer<T: std::str::FromStr>(&self, key: &str) -> KeeperResult<Option<T>> {
    match self.store.get(key) {
      None => Ok(None),
      Some(raw) if raw.trim().is_empty() => Ok(None),
      Some(raw) => parse_integer(key, raw).map(Some),
    }
  }
}

/// Parse a base-10 integer property, naming the key on failure
pub fn parse_integer<T: std::str::FromStr>(key: &str, raw: &str) -> KeeperResult<T> {
  raw.trim().parse::<T>().map_err(|_| {
    ConfigError::InvalidInteger {
      key: key.to_string(),
      value: raw.to_string(),
    }
    .into()
  })
}
