//! Tests for the `record` command

use crate::helpers::*;
use anyhow::Result;

fn record(project: &TestProject, task: &str, now: i64) -> Result<serde_json::Value> {
  let now = now.to_string();
  run_json(
    &project.path,
    &["record", "--task", task, "--now", &now, "--host-java", "21"],
  )
}

#[test]
fn test_increment_after_gap() -> Result<()> {
  let project = TestProject::new()?;
  let now = BUILD_TIME + GAP_MILLIS + 1;

  let report = record(&project, "assembleAppRelease", now)?;
  assert_eq!(report["counter"]["incremented"], true);
  assert_eq!(report["summary"]["version_code"], 2098);
  assert_eq!(report["variant"]["build_type"], "release");

  assert_eq!(project.property("VERSION_BUILD")?.as_deref(), Some("2098"));
  assert_eq!(project.property("BUILD_TIME")?, Some(now.to_string()));
  // Comments survive the rewrite
  assert!(project.read_file("version.properties")?.starts_with("# Versions for the whole project\n"));

  Ok(())
}

#[test]
fn test_rapid_rebuild_refreshes_time_only() -> Result<()> {
  let project = TestProject::new()?;
  let now = BUILD_TIME + GAP_MILLIS - 1;

  let report = record(&project, ":app:assembleAppDebug", now)?;
  assert_eq!(report["counter"]["incremented"], false);

  assert_eq!(project.property("VERSION_BUILD")?.as_deref(), Some("2097"));
  assert_eq!(project.property("BUILD_TIME")?, Some(now.to_string()));

  Ok(())
}

#[test]
fn test_non_qualifying_task_leaves_file_alone() -> Result<()> {
  let project = TestProject::new()?;
  let before = project.read_file("version.properties")?;

  let report = record(&project, "assembleInrtRelease", BUILD_TIME + GAP_MILLIS * 10)?;
  assert!(report.get("counter").is_none());
  assert_eq!(report["summary"]["version_code"], 2097);

  assert_eq!(project.read_file("version.properties")?, before);

  Ok(())
}

#[test]
fn test_first_build_records_time_without_increment() -> Result<()> {
  let project = TestProject::new()?;
  project.write_properties(&properties(5, None))?;

  let report = record(&project, "assembleAppRelease", BUILD_TIME)?;
  assert_eq!(report["counter"]["incremented"], false);
  assert_eq!(project.property("VERSION_BUILD")?.as_deref(), Some("5"));
  assert_eq!(project.property("BUILD_TIME")?, Some(BUILD_TIME.to_string()));

  Ok(())
}

#[test]
fn test_summary_marks_auto_increment() -> Result<()> {
  let project = TestProject::new()?;
  let now = (BUILD_TIME + GAP_MILLIS * 2).to_string();

  let output = run_buildkeeper(
    &project.path,
    &["record", "--task", "assembleAppRelease", "--now", &now, "--host-java", "21"],
  )?;
  let text = stdout(&output);
  assert!(text.contains("Version code: 2098 [auto-incremented]"));
  assert!(text.contains("SDK versions: min [24] / target [35] / compile [35]"));

  Ok(())
}

#[test]
fn test_tracked_variants_from_config() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(
    r#"[counter]
min_gap_minutes = 0
tracked = [{ flavor = "inrt", build_type = "release" }]
"#,
  )?;

  let report = record(&project, "assembleInrtRelease", BUILD_TIME + 1)?;
  assert_eq!(report["counter"]["incremented"], true);
  assert_eq!(project.property("VERSION_BUILD")?.as_deref(), Some("2098"));

  let report = record(&project, "assembleAppRelease", BUILD_TIME + 2)?;
  assert!(report.get("counter").is_none());

  Ok(())
}

#[test]
fn test_malformed_build_number_fails() -> Result<()> {
  let project = TestProject::new()?;
  let content = properties(1, Some(BUILD_TIME)).replace("VERSION_BUILD=1", "VERSION_BUILD=12a");
  project.write_properties(&content)?;

  let output = run_buildkeeper_raw(
    &project.path,
    &["record", "--task", "assembleAppRelease", "--host-java", "21"],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("12a"));

  Ok(())
}

#[test]
fn test_exhausted_build_number_fails_without_panicking() -> Result<()> {
  let project = TestProject::new()?;
  project.write_properties(&properties(u64::MAX, Some(BUILD_TIME)))?;
  let later = (BUILD_TIME + GAP_MILLIS + 1).to_string();

  let output = run_buildkeeper_raw(
    &project.path,
    &["record", "--task", "assembleAppRelease", "--now", &later, "--host-java", "21"],
  )?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("VERSION_BUILD"));
  assert_eq!(project.property("VERSION_BUILD")?, Some(u64::MAX.to_string()));
  assert_eq!(project.property("BUILD_TIME")?, Some(BUILD_TIME.to_string()));

  Ok(())
}
