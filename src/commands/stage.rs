use crate::artifact::{NamingPolicy, stage_template};
use crate::core::context::BuildContext;
use crate::core::error::KeeperResult;
use crate::utils;

/// Run the stage command
pub fn run_stage(ctx: &BuildContext, flavor: Option<String>, build_type: Option<String>, json: bool) -> KeeperResult<()> {
  let (_, versions) = ctx.load_versions()?;
  let staging = &ctx.config.staging;
  let artifacts = &ctx.config.artifacts;

  let flavor = artifacts.flavor(flavor.as_deref().unwrap_or(&staging.flavor));
  let build_type = build_type.unwrap_or_else(|| staging.build_type.clone());

  let policy = NamingPolicy::new(flavor.prefix(), &versions.version_name, &artifacts.extension);
  let source_dir = ctx.artifact_dir(&flavor.name, &build_type);
  let dest_dir = ctx.resolve(&staging.destination);

  let outcome = stage_template(
    &source_dir,
    &dest_dir,
    &policy.universal_name(),
    &policy.template_name(&staging.template_name),
  )?;

  if json {
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    return Ok(());
  }

  let suffix = if outcome.overwritten { " [overridden]" } else { "" };
  println!(
    "📋 Staged {} -> {}{}",
    utils::display_path(&outcome.source, &ctx.root),
    utils::display_path(&outcome.destination, &ctx.root),
    suffix
  );

  Ok(())
}
