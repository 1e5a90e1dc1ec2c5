//! Build context - resolve once, pass everywhere
//!
//! `BuildContext` is built in main.rs from the global flags and handed by
//! reference to every command. It owns the configuration and knows how to
//! turn its relative paths into absolute ones under the project root.

use crate::core::config::KeeperConfig;
use crate::core::error::KeeperResult;
use crate::core::project::ProjectVersions;
use crate::core::properties::PropertiesStore;
use crate::utils;
use crate::version::{CompatibilityTable, DottedVersion, KnownTargets, Negotiator};
use std::path::{Path, PathBuf};

pub struct BuildContext {
  /// Project root (absolute)
  pub root: PathBuf,

  pub config: KeeperConfig,

  /// Where the config came from; `None` when running on defaults
  pub config_path: Option<PathBuf>,
}

impl BuildContext {
  /// Load configuration for `root`, optionally from an explicit file
  pub fn build(root: &Path, explicit_config: Option<&Path>) -> KeeperResult<Self> {
    let root = utils::absolute(root)?;
    let (config, config_path) = KeeperConfig::load(&root, explicit_config)?;

    Ok(Self {
      root,
      config,
      config_path,
    })
  }

  /// Resolve a config-relative path against the root
  pub fn resolve(&self, path: &Path) -> PathBuf {
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.root.join(path)
    }
  }

  pub fn properties_path(&self) -> PathBuf {
    self.resolve(&self.config.project.properties)
  }

  /// Load the properties store and its typed view in one go
  pub fn load_versions(&self) -> KeeperResult<(PropertiesStore, ProjectVersions)> {
    let store = PropertiesStore::load(&self.properties_path())?;
    let versions = ProjectVersions::from_store(&store)?;
    Ok((store, versions))
  }

  /// Negotiator over the configured catalog and compatibility table
  pub fn negotiator(&self) -> Negotiator<KnownTargets> {
    let toolchain = &self.config.toolchain;
    Negotiator::new(
      KnownTargets::new(toolchain.targets.iter().copied()),
      CompatibilityTable::new(&toolchain.compatibility),
    )
  }

  /// Orchestrator version: explicit value (flag or env) first, then config
  pub fn orchestrator_version(&self, explicit: Option<&str>) -> Option<DottedVersion> {
    explicit
      .or(self.config.toolchain.orchestrator_version.as_deref())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .map(DottedVersion::parse)
  }

  /// Absolute output directory of a variant
  pub fn artifact_dir(&self, flavor: &str, build_type: &str) -> PathBuf {
    self.resolve(&self.config.artifacts.output_dir(flavor, build_type))
  }
}
