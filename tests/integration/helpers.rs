//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Epoch millis used as `BUILD_TIME` in the fixture
pub const BUILD_TIME: i64 = 1_700_000_000_000;

/// Default 45 minute gap
pub const GAP_MILLIS: i64 = 45 * 60 * 1000;

/// A throwaway project root with a version.properties file
pub struct TestProject {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestProject {
  /// Project with the standard properties fixture and no config file
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(path.join("version.properties"), properties(2097, Some(BUILD_TIME)))?;

    Ok(Self { _root: root, path })
  }

  /// Replace version.properties
  pub fn write_properties(&self, content: &str) -> Result<()> {
    self.write_file("version.properties", content)
  }

  /// Write buildkeeper.toml
  pub fn write_config(&self, content: &str) -> Result<()> {
    self.write_file("buildkeeper.toml", content)
  }

  /// Create a file (and its parent directories) under the project
  pub fn write_file(&self, rel: &str, content: impl AsRef<[u8]>) -> Result<()> {
    let file = self.path.join(rel);
    if let Some(parent) = file.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&file, content).with_context(|| format!("Failed to write {}", file.display()))?;
    Ok(())
  }

  /// Check if a file exists
  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  /// Read a file
  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Sorted file names in a project directory
  pub fn list_dir(&self, rel: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(self.path.join(rel))? {
      names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
  }

  /// Value of a key in version.properties
  pub fn property(&self, key: &str) -> Result<Option<String>> {
    let content = self.read_file("version.properties")?;
    Ok(content.lines().find_map(|line| {
      let (k, v) = line.split_once('=')?;
      (k.trim() == key).then(|| v.trim().to_string())
    }))
  }
}

/// Properties fixture with the given counter values
pub fn properties(version_build: u64, build_time: Option<i64>) -> String {
  let mut content = format!(
    "# Versions for the whole project\n\
MIN_SDK_VERSION=24\n\
TARGET_SDK_VERSION=35\n\
TARGET_SDK_VERSION_INRT=28\n\
COMPILE_SDK_VERSION=35\n\
VERSION_NAME=6.4.0 Beta\n\
VERSION_BUILD={}\n\
VSCODE_EXT_REQUIRED_VERSION=1.0.8\n\
JAVA_VERSION=24\n\
JAVA_VERSION_MIN_SUPPORTED=17\n\
JAVA_VERSION_MIN_SUGGESTED=21\n\
JAVA_VERSION_MIN_RADICAL=0\n",
    version_build
  );
  if let Some(time) = build_time {
    content.push_str(&format!("BUILD_TIME={}\n", time));
  }
  content
}

fn command(cwd: &Path, args: &[&str]) -> Command {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_buildkeeper"));
  cmd
    .current_dir(cwd)
    .args(args)
    .env_remove("BUILDKEEPER_ORCHESTRATOR_VERSION")
    .env_remove("BUILDKEEPER_HOST_JAVA")
    .env_remove("RUST_LOG");
  cmd
}

/// Run buildkeeper and require success
pub fn run_buildkeeper(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = command(cwd, args).output().context("Failed to run buildkeeper")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "buildkeeper command failed: buildkeeper {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run buildkeeper and return the output whatever the exit status
pub fn run_buildkeeper_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  command(cwd, args).output().context("Failed to run buildkeeper")
}

/// Run with `--json` appended and parse stdout
pub fn run_json(cwd: &Path, args: &[&str]) -> Result<serde_json::Value> {
  let mut args = args.to_vec();
  args.push("--json");
  let output = run_buildkeeper(cwd, &args)?;
  serde_json::from_slice(&output.stdout).context("stdout is not valid JSON")
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).into_owned()
}
