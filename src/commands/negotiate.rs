//! `buildkeeper negotiate` - configure-phase toolchain selection

use crate::core::context::BuildContext;
use crate::core::error::KeeperResult;
use crate::core::project::ProjectVersions;
use crate::version::host::{self, HostSource};
use crate::version::{Advisory, DottedVersion, HostToolchain, NegotiatedVersion, VersionSpec};
use serde::Serialize;

/// Everything the configure phase learns about the toolchain
#[derive(Debug, Clone, Serialize)]
pub struct ToolchainReport {
  pub desired: u32,
  pub host: HostToolchain,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub orchestrator: Option<DottedVersion>,
  pub negotiated: NegotiatedVersion,
  pub advisories: Vec<Advisory>,
}

/// Detect the host, check it, and negotiate the effective version
///
/// Shared by `negotiate`, `status`, and `record`.
pub fn negotiate_toolchain(
  ctx: &BuildContext,
  versions: &ProjectVersions,
  orchestrator_version: Option<&str>,
  host_java: Option<u32>,
) -> KeeperResult<ToolchainReport> {
  let host = HostToolchain::detect(host_java)?;
  let advisories = host::assess(host.major, &versions.java)?;
  for advisory in &advisories {
    tracing::debug!(%advisory, "host toolchain advisory");
  }

  let orchestrator = ctx.orchestrator_version(orchestrator_version);
  let spec = VersionSpec {
    desired: versions.java.desired,
    min_supported: versions.java.min_supported,
    min_suggested: versions.java.min_suggested,
    min_radical: versions.java.min_radical,
    host_ceiling: host.major,
  };
  let negotiated = ctx.negotiator().negotiate(&spec, orchestrator.as_ref())?;

  let flags = negotiated.suffix();
  tracing::info!(
    desired = spec.desired,
    host = host.major,
    orchestrator = ?orchestrator,
    effective = negotiated.effective,
    flags = flags.trim(),
    "negotiated toolchain"
  );

  Ok(ToolchainReport {
    desired: spec.desired,
    host,
    orchestrator,
    negotiated,
    advisories,
  })
}

/// Print advisories the way the build log shows warnings
pub fn print_advisories(advisories: &[Advisory]) {
  for advisory in advisories {
    eprintln!("⚠️  {}", advisory);
  }
}

/// Run the negotiate command
pub fn run_negotiate(
  ctx: &BuildContext,
  orchestrator_version: Option<String>,
  host_java: Option<u32>,
  json: bool,
) -> KeeperResult<()> {
  let (_, versions) = ctx.load_versions()?;
  let report = negotiate_toolchain(ctx, &versions, orchestrator_version.as_deref(), host_java)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  let source = match report.host.source {
    HostSource::Override => "override",
    HostSource::JavaHome => "JAVA_HOME",
    HostSource::JavaCommand => "java -version",
  };

  println!("🔧 Toolchain negotiation");
  println!("   Desired:      {}", report.desired);
  println!("   Host JDK:     {} ({})", report.host.major, source);
  match &report.orchestrator {
    Some(version) => println!("   Orchestrator: {}", version),
    None => println!("   Orchestrator: not given, coercion skipped"),
  }
  println!("   Effective:    {}", report.negotiated);
  print_advisories(&report.advisories);

  Ok(())
}
