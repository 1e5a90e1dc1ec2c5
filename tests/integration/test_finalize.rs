//! Tests for the `finalize` command

use crate::helpers::*;
use anyhow::Result;

const UNIVERSAL: &str = "app/release/app-v6.4.0-beta-universal.apk";

#[test]
fn test_appends_crc_and_skips_foreign_files() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(UNIVERSAL, b"123456789")?;
  project.write_file("app/release/output-metadata.json", b"{}")?;

  run_buildkeeper(&project.path, &["finalize", "--flavor", "app"])?;

  assert_eq!(
    project.list_dir("app/release")?,
    vec!["app-v6.4.0-beta-universal-cbf43926.apk", "output-metadata.json"]
  );

  Ok(())
}

#[test]
fn test_rerun_is_idempotent() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(UNIVERSAL, b"123456789")?;

  run_buildkeeper(&project.path, &["finalize", "--flavor", "app"])?;
  let report = run_json(&project.path, &["finalize", "--flavor", "app"])?;

  assert_eq!(report["artifacts"], serde_json::json!([]));
  assert_eq!(project.list_dir("app/release")?, vec!["app-v6.4.0-beta-universal-cbf43926.apk"]);

  Ok(())
}

#[test]
fn test_dry_run_reports_without_renaming() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(UNIVERSAL, b"123456789")?;
  project.write_file("app/release/app-v6.4.0-beta-arm64-v8a.apk", b"arm64")?;

  let report = run_json(&project.path, &["finalize", "--flavor", "app", "--dry-run"])?;
  assert_eq!(report["dry_run"], true);

  let artifacts = report["artifacts"].as_array().expect("artifacts array");
  assert_eq!(artifacts.len(), 2);
  assert_eq!(artifacts[0]["architecture"], "arm64-v8a");
  assert_eq!(artifacts[1]["architecture"], "universal");
  assert_eq!(artifacts[1]["checksum"], "cbf43926");
  assert_eq!(
    artifacts[1]["sha256"],
    "15e2b0d3c33891ebb0f1ef609ec419420c20e320ce94c65fbc8c3312448eb225"
  );

  assert!(project.file_exists(UNIVERSAL));

  Ok(())
}

#[test]
fn test_default_flavors_skip_unbuilt_variants() -> Result<()> {
  let project = TestProject::new()?;
  project.write_file(UNIVERSAL, b"123456789")?;

  let report = run_json(&project.path, &["finalize"])?;
  assert_eq!(report["artifacts"].as_array().map(Vec::len), Some(1));
  assert_eq!(report["skipped"], serde_json::json!(["inrt/release"]));

  Ok(())
}

#[test]
fn test_missing_directory_is_artifact_error() -> Result<()> {
  let project = TestProject::new()?;

  let output = run_buildkeeper_raw(&project.path, &["finalize", "--flavor", "app"])?;
  assert_eq!(output.status.code(), Some(3));

  let output = run_buildkeeper_raw(&project.path, &["finalize"])?;
  assert_eq!(output.status.code(), Some(3));

  Ok(())
}

#[test]
fn test_finalized_layout_copies() -> Result<()> {
  let project = TestProject::new()?;
  project.write_config(
    r#"[artifacts]
finalized_layout = "dist/{flavor}/{build_type}s"
"#,
  )?;
  project.write_file(UNIVERSAL, b"123456789")?;

  run_buildkeeper(&project.path, &["finalize", "--flavor", "app"])?;

  assert!(project.file_exists(UNIVERSAL));
  assert_eq!(
    project.list_dir("dist/app/releases")?,
    vec!["app-v6.4.0-beta-universal-cbf43926.apk"]
  );

  Ok(())
}
