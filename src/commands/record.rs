//! `buildkeeper record` - qualifying-build hook
//!
//! Called by the build pipeline with the requested task names once the task
//! graph is known. Bumps the counter when a tracked assemble task is present
//! and prints the version summary either way.

use serde::Serialize;

use crate::commands::negotiate;
use crate::core::config::TrackedVariant;
use crate::core::context::BuildContext;
use crate::core::error::KeeperResult;
use crate::counter::{self, BuildCounter, CounterOutcome, CounterPolicy, VersionSummary};
use crate::utils;

#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
  /// Tracked variant the tasks assemble, if any
  #[serde(skip_serializing_if = "Option::is_none")]
  pub variant: Option<TrackedVariant>,
  /// Counter result; absent when the build did not qualify
  #[serde(skip_serializing_if = "Option::is_none")]
  pub counter: Option<CounterOutcome>,
  pub summary: VersionSummary,
}

/// Run the record command
pub fn run_record(
  ctx: &BuildContext,
  tasks: Vec<String>,
  now: Option<i64>,
  orchestrator_version: Option<String>,
  host_java: Option<u32>,
  json: bool,
) -> KeeperResult<()> {
  let (mut store, versions) = ctx.load_versions()?;
  let toolchain = negotiate::negotiate_toolchain(ctx, &versions, orchestrator_version.as_deref(), host_java)?;

  let config = &ctx.config.counter;
  let variant = counter::qualifying_variant(&tasks, &config.project, &config.tracked).cloned();

  let Some(variant) = variant else {
    tracing::debug!(?tasks, "no tracked assemble task requested");
    let summary = VersionSummary::new(
      &ctx.config.project.name,
      &versions,
      versions.version_build,
      false,
      toolchain.negotiated,
    );
    let report = RecordReport {
      variant: None,
      counter: None,
      summary,
    };
    if json {
      println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
      println!("ℹ️  No tracked assemble task requested, build counter untouched\n");
      print!("{}", report.summary);
      negotiate::print_advisories(&toolchain.advisories);
    }
    return Ok(());
  };

  let policy = CounterPolicy::from_config(config);
  let now = now.unwrap_or_else(utils::now_millis);

  let outcome = match BuildCounter::on_qualifying_build(&mut store, policy, now) {
    Ok(outcome) => outcome,
    Err(err) => {
      // Still show what the build will use; the number was not bumped
      if !json {
        let summary = VersionSummary::new(
          &ctx.config.project.name,
          &versions,
          versions.version_build,
          false,
          toolchain.negotiated,
        );
        print!("{}", summary);
      }
      return Err(err);
    }
  };

  let summary = VersionSummary::new(
    &ctx.config.project.name,
    &versions,
    outcome.state.build_number,
    outcome.incremented,
    toolchain.negotiated,
  );
  let report = RecordReport {
    variant: Some(variant),
    counter: Some(outcome),
    summary,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  if let Some(variant) = &report.variant {
    let task = counter::assemble_task_name(&variant.flavor, &variant.build_type);
    if outcome.incremented {
      println!("🔢 {} qualifies, build number bumped to {}\n", task, outcome.state.build_number);
    } else {
      println!(
        "🔢 {} qualifies, within the {}m gap so build number stays at {}\n",
        task, config.min_gap_minutes, outcome.state.build_number
      );
    }
  }
  print!("{}", report.summary);
  negotiate::print_advisories(&toolchain.advisories);

  Ok(())
}
