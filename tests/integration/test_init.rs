//! Tests for the `init` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_init_creates_config() -> Result<()> {
  let project = TestProject::new()?;

  run_buildkeeper(&project.path, &["init"])?;

  assert!(project.file_exists("buildkeeper.toml"));
  let config = project.read_file("buildkeeper.toml")?;
  assert!(config.contains("[counter]"));
  assert!(config.contains("min_gap_minutes = 45"));
  assert!(config.contains("[staging]"));

  // The written defaults load back and drive a normal run
  run_buildkeeper(&project.path, &["status", "--host-java", "21"])?;

  Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config("[project]\nname = \"custom\"\n")?;

  let output = run_buildkeeper_raw(&project.path, &["init"])?;
  assert!(!output.status.success());
  assert!(stderr(&output).contains("--force"));
  assert!(project.read_file("buildkeeper.toml")?.contains("custom"));

  run_buildkeeper(&project.path, &["init", "--force"])?;
  assert!(!project.read_file("buildkeeper.toml")?.contains("custom"));

  Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config("[artifacts]\nextension = \".apk\"\n")?;

  let output = run_buildkeeper_raw(&project.path, &["status", "--host-java", "21"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("artifacts.extension"));

  Ok(())
}
