use serde::Serialize;

use crate::artifact::{ArtifactDescriptor, ArtifactFinalizer, NamingPolicy};
use crate::core::context::BuildContext;
use crate::core::error::{ArtifactError, KeeperResult};
use crate::ui::progress::ArtifactProgress;
use crate::utils;

#[derive(Debug, Clone, Serialize)]
pub struct FinalizeReport {
  pub dry_run: bool,
  pub artifacts: Vec<ArtifactDescriptor>,
  /// Variant directories that did not exist (only when flavors were defaulted)
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub skipped: Vec<String>,
}

/// Run the finalize command
///
/// With no `--flavor`, every configured flavor is tried and missing output
/// directories are skipped; at least one must exist. Explicitly named flavors
/// must all exist.
pub fn run_finalize(
  ctx: &BuildContext,
  flavors: Vec<String>,
  build_type: Option<String>,
  dry_run: bool,
  json: bool,
) -> KeeperResult<()> {
  let (_, versions) = ctx.load_versions()?;
  let artifacts = &ctx.config.artifacts;
  let build_type = build_type.unwrap_or_else(|| artifacts.release_build_type.clone());

  let explicit = !flavors.is_empty();
  let flavors: Vec<String> = if explicit {
    flavors
  } else {
    artifacts.flavors.iter().map(|f| f.name.clone()).collect()
  };

  if dry_run && !json {
    println!("🔍 DRY-RUN MODE - No files will be renamed");
    println!("   Remove --dry-run to actually finalize\n");
  }

  let mut report = FinalizeReport {
    dry_run,
    artifacts: Vec::new(),
    skipped: Vec::new(),
  };
  let mut first_missing = None;

  for flavor_name in &flavors {
    let flavor = artifacts.flavor(flavor_name);
    let dir = ctx.artifact_dir(&flavor.name, &build_type);
    let shown = utils::display_path(&dir, &ctx.root);

    if !explicit && !dir.is_dir() {
      tracing::debug!(dir = %dir.display(), "variant output directory missing, skipping");
      report.skipped.push(shown);
      first_missing.get_or_insert(dir);
      continue;
    }

    let policy = NamingPolicy::new(flavor.prefix(), &versions.version_name, &artifacts.extension);
    let mut finalizer = ArtifactFinalizer::new(&policy, &flavor.name, &build_type);
    if let Some(dest) = artifacts.finalized_dir(&flavor.name, &build_type) {
      finalizer = finalizer.copy_into(ctx.resolve(&dest));
    }

    let pending = finalizer.discover(&dir)?.len();
    if !json {
      println!("📦 Finalizing {} ({} artifacts)", shown, pending);
    }

    let mut progress = ArtifactProgress::for_artifacts(pending, format!("{}/{}", flavor.name, build_type), !json);
    let finalized = finalizer.finalize(&dir, dry_run, |_| {
      if let Some(progress) = progress.as_mut() {
        progress.inc();
      }
    })?;

    if !json {
      for descriptor in &finalized {
        println!(
          "   ✅ {} -> {}",
          utils::display_path(&descriptor.source_path, &ctx.root),
          utils::display_path(&descriptor.destination_path, &ctx.root)
        );
      }
      if finalized.is_empty() {
        println!("   Nothing to finalize");
      }
    }
    report.artifacts.extend(finalized);
  }

  if report.skipped.len() == flavors.len()
    && let Some(path) = first_missing
  {
    return Err(ArtifactError::DirectoryMissing { path }.into());
  }

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else if !report.skipped.is_empty() {
    println!("\n⏭️  Skipped (not built): {}", report.skipped.join(", "));
  }

  Ok(())
}
