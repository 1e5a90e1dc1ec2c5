//! Tests for the `stage` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_stage_then_overwrite() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("app/release/app-v6.4.0-beta-universal.apk", b"first")?;

  let report = run_json(&project.path, &["stage", "--flavor", "app"])?;
  assert_eq!(report["copied"], true);
  assert_eq!(report["overwritten"], false);
  assert_eq!(project.read_file("src/main/assets-app/template.apk")?, "first");

  project.write_file("app/release/app-v6.4.0-beta-universal.apk", b"second")?;
  let output = run_buildkeeper(&project.path, &["stage", "--flavor", "app"])?;
  assert!(stdout(&output).contains("[overridden]"));
  assert_eq!(project.read_file("src/main/assets-app/template.apk")?, "second");

  Ok(())
}

#[test]
fn test_default_flavor_is_inrt() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file("inrt/release/inrt-v6.4.0-beta-universal.apk", b"inrt")?;

  let report = run_json(&project.path, &["stage"])?;
  assert_eq!(report["overwritten"], false);
  assert!(project.file_exists("src/main/assets-app/template.apk"));

  Ok(())
}

#[test]
fn test_missing_source_names_expected_path() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_buildkeeper_raw(&project.path, &["stage", "--flavor", "app"])?;
  assert_eq!(output.status.code(), Some(3));
  let err = stderr(&output);
  assert!(err.contains("app-v6.4.0-beta-universal.apk"));
  assert!(err.contains("doesn't exist"));
  assert!(!project.file_exists("src/main/assets-app"));

  Ok(())
}

#[test]
fn test_custom_prefix_and_destination() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(
    r#"[[artifacts.flavors]]
name = "inrt"
prefix = "runtime"

[staging]
destination = "assets/templates"
template_name = "base"
"#,
  )?;
  project.write_file("inrt/release/runtime-v6.4.0-beta-universal.apk", b"rt")?;

  run_buildkeeper(&project.path, &["stage"])?;
  assert_eq!(project.read_file("assets/templates/base.apk")?, "rt");

  Ok(())
}

#[test]
fn test_version_whitespace_maps_to_one_dash_per_character() -> Result<()> {
  let project = TestProject::new()?;
  let content = properties(2097, Some(BUILD_TIME)).replace("VERSION_NAME=6.4.0 Beta\n", "VERSION_NAME=6.4.0  Beta \n");
  project.write_properties(&content)?;
  project.write_file("inrt/release/inrt-v6.4.0--beta--universal.apk", b"spaced")?;

  run_buildkeeper(&project.path, &["stage"])?;
  assert_eq!(project.read_file("src/main/assets-app/template.apk")?, "spaced");

  let report = run_json(&project.path, &["finalize", "--flavor", "inrt"])?;
  let artifacts = report["artifacts"].as_array().cloned().unwrap_or_default();
  assert_eq!(artifacts.len(), 1);

  Ok(())
}
