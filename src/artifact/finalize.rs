//! Checksum-and-rename for produced artifacts
//!
//! Every canonical artifact in a variant's output directory gets its CRC-32
//! inserted before the extension. Files that already carry a checksum are
//! left alone, so re-running after a partial finalize never double-suffixes.

use crate::artifact::checksum::{self, FileDigest};
use crate::artifact::naming::{NamingPolicy, ParsedName};
use crate::core::error::{ArtifactError, KeeperResult, ResultExt};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One artifact after (or, in dry-run, before) finalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactDescriptor {
  pub source_path: PathBuf,
  pub destination_path: PathBuf,
  pub flavor: String,
  pub build_type: String,
  pub architecture: String,
  pub checksum: String,
  pub sha256: String,
  pub size: u64,
}

/// A canonical artifact found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
  pub path: PathBuf,
  pub architecture: String,
}

/// Finalizes one variant's output directory
pub struct ArtifactFinalizer<'a> {
  policy: &'a NamingPolicy,
  flavor: String,
  build_type: String,
  /// Copy finalized files here instead of renaming in place
  destination: Option<PathBuf>,
}

impl<'a> ArtifactFinalizer<'a> {
  pub fn new(policy: &'a NamingPolicy, flavor: &str, build_type: &str) -> Self {
    Self {
      policy,
      flavor: flavor.to_string(),
      build_type: build_type.to_string(),
      destination: None,
    }
  }

  /// Copy into `dir` rather than renaming in place
  pub fn copy_into(mut self, dir: PathBuf) -> Self {
    self.destination = Some(dir);
    self
  }

  /// Canonical, not-yet-checksummed artifacts in `artifact_dir`, sorted by name
  pub fn discover(&self, artifact_dir: &Path) -> KeeperResult<Vec<Candidate>> {
    if !artifact_dir.is_dir() {
      return Err(
        ArtifactError::DirectoryMissing {
          path: artifact_dir.to_path_buf(),
        }
        .into(),
      );
    }

    let entries =
      fs::read_dir(artifact_dir).with_context(|| format!("Failed to list {}", artifact_dir.display()))?;

    let mut candidates = Vec::new();
    for entry in entries {
      let entry = entry?;
      if !entry.file_type()?.is_file() {
        continue;
      }

      let file_name = entry.file_name();
      let Some(name) = file_name.to_str() else {
        continue;
      };

      match self.policy.parse(name) {
        Some(ParsedName::Canonical { arch }) => candidates.push(Candidate {
          path: entry.path(),
          architecture: arch,
        }),
        Some(ParsedName::Checksummed { arch, checksum }) => {
          tracing::debug!(file = name, %arch, %checksum, "already finalized, skipping");
        }
        None => tracing::debug!(file = name, "not a release artifact, skipping"),
      }
    }

    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(candidates)
  }

  /// Checksum and rename every candidate in `artifact_dir`
  ///
  /// With `dry_run` the digests are computed but no file is touched.
  /// `on_each` is called after each artifact, for progress reporting.
  pub fn finalize(
    &self,
    artifact_dir: &Path,
    dry_run: bool,
    mut on_each: impl FnMut(&ArtifactDescriptor),
  ) -> KeeperResult<Vec<ArtifactDescriptor>> {
    let candidates = self.discover(artifact_dir)?;

    if !dry_run && let Some(dest) = &self.destination {
      fs::create_dir_all(dest).with_context(|| format!("Failed to create {}", dest.display()))?;
    }

    let mut finalized = Vec::with_capacity(candidates.len());
    for candidate in candidates {
      let digest = checksum::digest_file(&candidate.path)?;
      let descriptor = self.describe(artifact_dir, &candidate, digest);

      if !dry_run {
        self.apply(&descriptor)?;
      }

      tracing::info!(
        source = %descriptor.source_path.display(),
        destination = %descriptor.destination_path.display(),
        checksum = %descriptor.checksum,
        dry_run,
        "finalized artifact"
      );
      on_each(&descriptor);
      finalized.push(descriptor);
    }

    Ok(finalized)
  }

  fn describe(&self, artifact_dir: &Path, candidate: &Candidate, digest: FileDigest) -> ArtifactDescriptor {
    let file_name = self.policy.checksummed_name(&candidate.architecture, &digest.crc32);
    let dir = self.destination.as_deref().unwrap_or(artifact_dir);

    ArtifactDescriptor {
      source_path: candidate.path.clone(),
      destination_path: dir.join(file_name),
      flavor: self.flavor.clone(),
      build_type: self.build_type.clone(),
      architecture: candidate.architecture.clone(),
      checksum: digest.crc32,
      sha256: digest.sha256,
      size: digest.size,
    }
  }

  fn apply(&self, descriptor: &ArtifactDescriptor) -> KeeperResult<()> {
    let (src, dst) = (&descriptor.source_path, &descriptor.destination_path);
    if self.destination.is_some() {
      fs::copy(src, dst).with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;
    } else {
      fs::rename(src, dst).with_context(|| format!("Failed to rename {} to {}", src.display(), dst.display()))?;
    }
    Ok(())
  }
}
