//! Tests for `negotiate` and `status`

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_host_ceiling_clamps_desired() -> Result<()> {
  let project = TestProject::new()?;

  let report = run_json(&project.path, &["negotiate", "--host-java", "21"])?;
  assert_eq!(report["desired"], 24);
  assert_eq!(report["negotiated"]["effective"], 21);
  assert_eq!(report["negotiated"]["flags"], serde_json::json!(["consistent"]));
  assert_eq!(report["host"]["source"], "override");

  Ok(())
}

#[test]
fn test_orchestrator_coercion_from_flag_and_env() -> Result<()> {
  let project = TestProject::new()?;

  let report = run_json(
    &project.path,
    &["negotiate", "--host-java", "24", "--orchestrator-version", "8.5"],
  )?;
  assert_eq!(report["negotiated"]["effective"], 21);
  assert_eq!(report["negotiated"]["flags"], serde_json::json!(["coerced"]));
  assert_eq!(report["orchestrator"], "8.5");

  let output = run_buildkeeper_raw_with_env(&project, "BUILDKEEPER_ORCHESTRATOR_VERSION", "7.6")?;
  let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
  assert_eq!(report["negotiated"]["effective"], 19);

  Ok(())
}

fn run_buildkeeper_raw_with_env(project: &TestProject, key: &str, value: &str) -> Result<std::process::Output> {
  let output = std::process::Command::new(env!("CARGO_BIN_EXE_buildkeeper"))
    .current_dir(&project.path)
    .args(["negotiate", "--host-java", "24", "--json"])
    .env(key, value)
    .output()?;
  assert!(output.status.success(), "stderr: {}", stderr(&output));
  Ok(output)
}

#[test]
fn test_config_table_override() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(
    r#"[toolchain]
orchestrator_version = "8.0"
compatibility = [
  { version = 17, orchestrator = "7.3" },
  { version = 18, orchestrator = "7.5" },
  { version = 21, orchestrator = "8.5" },
]
"#,
  )?;

  let report = run_json(&project.path, &["negotiate", "--host-java", "24"])?;
  assert_eq!(report["negotiated"]["effective"], 18);

  Ok(())
}

#[test]
fn test_host_below_minimum_is_config_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_buildkeeper_raw(&project.path, &["negotiate", "--host-java", "11"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("does not meet the minimum requirement"));

  Ok(())
}

#[test]
fn test_upgrade_advisory_is_not_fatal() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_buildkeeper(&project.path, &["negotiate", "--host-java", "17"])?;
  assert!(stdout(&output).contains("Effective:    17 [consistent]"));
  assert!(stderr(&output).contains("upgrade current JDK version 17 to 21"));

  Ok(())
}

#[test]
fn test_missing_key_names_key() -> Result<()> {
  let project = TestProject::new()?;
  project.write_properties(&properties(1, None).replace("MIN_SDK_VERSION=24\n", ""))?;

  let output = run_buildkeeper_raw(&project.path, &["negotiate", "--host-java", "21"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("MIN_SDK_VERSION"));

  Ok(())
}

#[test]
fn test_status_is_read_only() -> Result<()> {
  let project = TestProject::new()?;
  let before = project.read_file("version.properties")?;

  let output = run_buildkeeper(&project.path, &["status", "--host-java", "21"])?;
  let text = stdout(&output);
  assert!(text.contains("Version information for app"));
  assert!(text.contains("Version code: 2097\n"));
  assert!(text.contains("Java version: 21 [consistent]"));

  let report = run_json(&project.path, &["status", "--host-java", "21"])?;
  assert_eq!(report["counter"]["build_number"], 2097);
  assert_eq!(report["last_build_time"], "2023-11-14T22:13:20+00:00");

  assert_eq!(project.read_file("version.properties")?, before);

  Ok(())
}
