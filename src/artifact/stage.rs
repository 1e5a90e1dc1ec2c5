//! Template staging
//!
//! Copies the universal artifact of the staging flavor to a fixed file name
//! inside the host project's assets, overwriting any previous template.

use crate::core::error::{ArtifactError, KeeperResult, ResultExt};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
  pub source: PathBuf,
  pub destination: PathBuf,
  pub copied: bool,
  pub bytes: u64,
  /// A previous template was replaced
  pub overwritten: bool,
}

/// Copy `source_dir/expected_source_name` to `dest_dir/template_file_name`
pub fn stage_template(
  source_dir: &Path,
  dest_dir: &Path,
  expected_source_name: &str,
  template_file_name: &str,
) -> KeeperResult<StageOutcome> {
  let source = source_dir.join(expected_source_name);
  if !source.is_file() {
    return Err(ArtifactError::Missing { expected: source }.into());
  }

  fs::create_dir_all(dest_dir).with_context(|| format!("Failed to create {}", dest_dir.display()))?;

  let destination = dest_dir.join(template_file_name);
  let overwritten = destination.exists();
  let bytes = fs::copy(&source, &destination)
    .with_context(|| format!("Failed to copy {} to {}", source.display(), destination.display()))?;

  tracing::info!(
    source = %source.display(),
    destination = %destination.display(),
    bytes,
    overwritten,
    "staged template"
  );

  Ok(StageOutcome {
    source,
    destination,
    copied: true,
    bytes,
    overwritten,
  })
}
