use serde::Serialize;

use crate::commands::negotiate::{self, ToolchainReport};
use crate::core::context::BuildContext;
use crate::core::error::KeeperResult;
use crate::counter::{BuildCounter, BuildState, CounterPolicy, VersionSummary};
use crate::utils;

/// Read-only view of versions and counter state
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
  pub properties: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub config: Option<String>,
  pub counter: BuildState,
  /// `BUILD_TIME` as RFC 3339, when present
  #[serde(skip_serializing_if = "Option::is_none")]
  pub last_build_time: Option<String>,
  /// Whether a qualifying build right now would bump the number
  pub would_increment: bool,
  /// Number the next qualifying build would use
  pub next_build_number: u64,
  pub min_gap_minutes: u64,
  pub toolchain: ToolchainReport,
  pub summary: VersionSummary,
}

/// Run the status command
pub fn run_status(
  ctx: &BuildContext,
  orchestrator_version: Option<String>,
  host_java: Option<u32>,
  json: bool,
) -> KeeperResult<()> {
  let (store, versions) = ctx.load_versions()?;
  let state = BuildCounter::current_info(&store)?;
  let toolchain = negotiate::negotiate_toolchain(ctx, &versions, orchestrator_version.as_deref(), host_java)?;

  let counter = &ctx.config.counter;
  let now = utils::now_millis();
  let would_increment = CounterPolicy::from_config(counter).gap_elapsed(state.last_build_time_millis, now);
  // An exhausted counter fails here rather than at the next record
  let next_build_number = if would_increment {
    state.next_build_number()?
  } else {
    state.build_number
  };

  let summary = VersionSummary::new(
    &ctx.config.project.name,
    &versions,
    state.build_number,
    false,
    toolchain.negotiated.clone(),
  );

  let report = StatusReport {
    properties: utils::display_path(store.path(), &ctx.root),
    config: ctx
      .config_path
      .as_deref()
      .map(|path| utils::display_path(path, &ctx.root)),
    counter: state,
    last_build_time: state.last_build_time_millis.and_then(utils::rfc3339_millis),
    would_increment,
    next_build_number,
    min_gap_minutes: counter.min_gap_minutes,
    toolchain,
    summary,
  };

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
  } else {
    print_status(&report, now);
  }

  Ok(())
}

fn print_status(report: &StatusReport, now: i64) {
  println!("\n📊 Build Status\n");
  println!("   Properties: {}", report.properties);
  match &report.config {
    Some(path) => println!("   Config:     {}", path),
    None => println!("   Config:     defaults (no buildkeeper.toml)"),
  }

  match report.counter.last_build_time_millis {
    Some(last) => println!(
      "   Last build: {} ({} ago)",
      utils::format_millis(last),
      utils::format_gap(now.saturating_sub(last))
    ),
    None => println!("   Last build: never"),
  }

  let next = if report.would_increment {
    format!("{} (gap of {}m elapsed)", report.next_build_number, report.min_gap_minutes)
  } else {
    format!("{} (within {}m gap)", report.next_build_number, report.min_gap_minutes)
  };
  println!("   Next qualifying build: {}\n", next);

  print!("{}", report.summary);
  negotiate::print_advisories(&report.toolchain.advisories);
}
