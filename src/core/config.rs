use crate::core::error::{ConfigError, KeeperError, KeeperResult, ResultExt};
use crate::version::compare::DottedVersion;
use crate::version::compat::{self, CompatibilityEntry};
use crate::version::negotiate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for buildkeeper
/// Searched in order: buildkeeper.toml, .buildkeeper.toml, .config/buildkeeper.toml
///
/// Every section is optional; a project without a config file runs on defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeeperConfig {
  #[serde(default)]
  pub project: ProjectConfig,
  #[serde(default)]
  pub toolchain: ToolchainConfig,
  #[serde(default)]
  pub counter: CounterConfig,
  #[serde(default)]
  pub artifacts: ArtifactsConfig,
  #[serde(default)]
  pub staging: StagingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
  /// Display name used in the version summary title
  #[serde(default = "default_project_name")]
  pub name: String,

  /// Properties file holding the version keys (relative to the root)
  #[serde(default = "default_properties_path")]
  pub properties: PathBuf,
}

fn default_project_name() -> String {
  "app".to_string()
}

fn default_properties_path() -> PathBuf {
  PathBuf::from("version.properties")
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      name: default_project_name(),
      properties: default_properties_path(),
    }
  }
}

/// Toolchain negotiation inputs that live outside the properties file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
  /// Orchestrator (Gradle) version used for coercion; CLI and env take precedence
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub orchestrator_version: Option<String>,

  /// Toolchain targets the compiler recognizes
  #[serde(default = "negotiate::default_targets")]
  pub targets: Vec<u32>,

  /// Compatibility rows, ascending by toolchain version
  #[serde(default = "compat::default_entries")]
  pub compatibility: Vec<CompatibilityEntry>,
}

impl Default for ToolchainConfig {
  fn default() -> Self {
    Self {
      orchestrator_version: None,
      targets: negotiate::default_targets(),
      compatibility: compat::default_entries(),
    }
  }
}

/// A (flavor, build type) pair whose assemble task bumps the build counter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedVariant {
  pub flavor: String,
  pub build_type: String,
}

impl TrackedVariant {
  pub fn new(flavor: impl Into<String>, build_type: impl Into<String>) -> Self {
    Self {
      flavor: flavor.into(),
      build_type: build_type.into(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
  /// Project path segment in fully-qualified task names (`:app:assembleAppRelease`)
  #[serde(default = "default_project_name")]
  pub project: String,

  /// Minimum minutes between qualifying builds for the counter to move
  #[serde(default = "default_min_gap_minutes")]
  pub min_gap_minutes: u64,

  /// Whether the first build (no BUILD_TIME yet) increments the counter
  #[serde(default)]
  pub increment_on_first_build: bool,

  #[serde(default = "default_tracked")]
  pub tracked: Vec<TrackedVariant>,
}

fn default_min_gap_minutes() -> u64 {
  45
}

fn default_tracked() -> Vec<TrackedVariant> {
  vec![TrackedVariant::new("app", "debug"), TrackedVariant::new("app", "release")]
}

impl Default for CounterConfig {
  fn default() -> Self {
    Self {
      project: default_project_name(),
      min_gap_minutes: default_min_gap_minutes(),
      increment_on_first_build: false,
      tracked: default_tracked(),
    }
  }
}

impl CounterConfig {
  pub fn min_gap_millis(&self) -> i64 {
    i64::try_from(self.min_gap_minutes.saturating_mul(60_000)).unwrap_or(i64::MAX)
  }
}

/// A product flavor and the file name prefix its artifacts carry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorConfig {
  pub name: String,
  /// Artifact prefix (application id suffix); defaults to the flavor name
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prefix: Option<String>,
}

impl FlavorConfig {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      prefix: None,
    }
  }

  pub fn prefix(&self) -> &str {
    self.prefix.as_deref().unwrap_or(&self.name)
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
  /// Artifact file extension, without the dot
  #[serde(default = "default_extension")]
  pub extension: String,

  /// Output directory per variant; `{flavor}` and `{build_type}` are substituted
  #[serde(default = "default_layout")]
  pub layout: String,

  /// When set, finalized artifacts are copied here instead of renamed in place
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub finalized_layout: Option<String>,

  /// Build type finalized by default
  #[serde(default = "default_release_build_type")]
  pub release_build_type: String,

  #[serde(default = "default_flavors")]
  pub flavors: Vec<FlavorConfig>,
}

fn default_extension() -> String {
  "apk".to_string()
}

fn default_layout() -> String {
  "{flavor}/{build_type}".to_string()
}

fn default_release_build_type() -> String {
  "release".to_string()
}

fn default_flavors() -> Vec<FlavorConfig> {
  vec![FlavorConfig::new("app"), FlavorConfig::new("inrt")]
}

impl Default for ArtifactsConfig {
  fn default() -> Self {
    Self {
      extension: default_extension(),
      layout: default_layout(),
      finalized_layout: None,
      release_build_type: default_release_build_type(),
      flavors: default_flavors(),
    }
  }
}

impl ArtifactsConfig {
  /// Find a flavor by name; unknown flavors get a default entry
  pub fn flavor(&self, name: &str) -> FlavorConfig {
    self
      .flavors
      .iter()
      .find(|f| f.name == name)
      .cloned()
      .unwrap_or_else(|| FlavorConfig::new(name))
  }

  /// Variant output directory relative to the root
  pub fn output_dir(&self, flavor: &str, build_type: &str) -> PathBuf {
    expand_layout(&self.layout, flavor, build_type)
  }

  /// Copy destination for finalized artifacts, if configured
  pub fn finalized_dir(&self, flavor: &str, build_type: &str) -> Option<PathBuf> {
    self
      .finalized_layout
      .as_deref()
      .map(|layout| expand_layout(layout, flavor, build_type))
  }
}

fn expand_layout(layout: &str, flavor: &str, build_type: &str) -> PathBuf {
  PathBuf::from(layout.replace("{flavor}", flavor).replace("{build_type}", build_type))
}

/// Where the universal artifact is staged as a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
  #[serde(default = "default_staging_flavor")]
  pub flavor: String,

  #[serde(default = "default_release_build_type")]
  pub build_type: String,

  /// Staging directory relative to the root
  #[serde(default = "default_staging_destination")]
  pub destination: PathBuf,

  /// Template file stem; the artifact extension is appended
  #[serde(default = "default_template_name")]
  pub template_name: String,
}

fn default_staging_flavor() -> String {
  "inrt".to_string()
}

fn default_staging_destination() -> PathBuf {
  PathBuf::from("src/main/assets-app")
}

fn default_template_name() -> String {
  "template".to_string()
}

impl Default for StagingConfig {
  fn default() -> Self {
    Self {
      flavor: default_staging_flavor(),
      build_type: default_release_build_type(),
      destination: default_staging_destination(),
      template_name: default_template_name(),
    }
  }
}

impl KeeperConfig {
  /// Find config file in search order: buildkeeper.toml, .buildkeeper.toml, .config/buildkeeper.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = [
      path.join("buildkeeper.toml"),
      path.join(".buildkeeper.toml"),
      path.join(".config").join("buildkeeper.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from an explicit file, or search `root`; defaults when none exists
  pub fn load(root: &Path, explicit: Option<&Path>) -> KeeperResult<(Self, Option<PathBuf>)> {
    let config_path = match explicit {
      Some(path) if !path.exists() => {
        return Err(KeeperError::with_help(
          format!("Config file not found: {}", path.display()),
          "Run `buildkeeper init` to create one, or drop --config to use defaults.",
        ));
      }
      Some(path) => Some(path.to_path_buf()),
      None => Self::find_config_path(root),
    };

    let Some(config_path) = config_path else {
      tracing::debug!(root = %root.display(), "no buildkeeper.toml found, using defaults");
      return Ok((Self::default(), None));
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: KeeperConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config.validate(&config_path)?;
    tracing::debug!(path = %config_path.display(), "loaded config");

    Ok((config, Some(config_path)))
  }

  /// Save config to buildkeeper.toml under `root`
  pub fn save(&self, root: &Path) -> KeeperResult<PathBuf> {
    let config_path = root.join("buildkeeper.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(config_path)
  }

  /// Validate cross-field constraints
  pub fn validate(&self, path: &Path) -> KeeperResult<()> {
    let invalid = |reason: String| -> KeeperError {
      ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
      }
      .into()
    };

    let ext = &self.artifacts.extension;
    if ext.is_empty() || ext.contains('.') || ext.contains('/') {
      return Err(invalid(format!(
        "artifacts.extension must be a bare extension like \"apk\" (got \"{}\")",
        ext
      )));
    }

    if self.staging.template_name.trim().is_empty() {
      return Err(invalid("staging.template_name must not be empty".to_string()));
    }

    if let Some(version) = &self.toolchain.orchestrator_version
      && version.trim().is_empty()
    {
      return Err(invalid("toolchain.orchestrator_version must not be empty".to_string()));
    }

    for pair in self.toolchain.compatibility.windows(2) {
      let (prev, next) = (&pair[0], &pair[1]);
      if next.version <= prev.version
        || DottedVersion::parse(&next.orchestrator) < DottedVersion::parse(&prev.orchestrator)
      {
        return Err(invalid(format!(
          "toolchain.compatibility must be ascending: ({}, \"{}\") follows ({}, \"{}\")",
          next.version, next.orchestrator, prev.version, prev.orchestrator
        )));
      }
    }

    if self.toolchain.targets.contains(&0) {
      return Err(invalid("toolchain.targets must not contain 0".to_string()));
    }

    Ok(())
  }
}
