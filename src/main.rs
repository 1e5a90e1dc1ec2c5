mod artifact;
mod commands;
mod core;
mod counter;
mod telemetry;
mod ui;
mod utils;
mod version;

use clap::{Args, Parser, Subcommand};
use core::context::BuildContext;
use core::error::{KeeperError, print_error};
use std::path::PathBuf;

/// Toolchain negotiation, build numbering, and artifact finalization for release builds
#[derive(Parser)]
#[command(name = "buildkeeper")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Project root (where version.properties and buildkeeper.toml live)
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,

  /// Explicit config file instead of searching the root
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Debug-level diagnostics on stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Emit diagnostics as JSON lines
  #[arg(long, global = true)]
  log_json: bool,

  #[command(subcommand)]
  command: Commands,
}

/// Inputs to toolchain negotiation
#[derive(Args)]
struct ToolchainArgs {
  /// Orchestrator (Gradle) version used to coerce the toolchain
  #[arg(long, env = "BUILDKEEPER_ORCHESTRATOR_VERSION")]
  orchestrator_version: Option<String>,

  /// Host JDK major version (skips detection)
  #[arg(long, env = "BUILDKEEPER_HOST_JAVA")]
  host_java: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Setup & Inspection
  // ============================================================================
  /// Write a default buildkeeper.toml
  Init {
    /// Overwrite an existing configuration
    #[arg(long)]
    force: bool,
  },

  /// Show versions, counter state, and the negotiated toolchain
  Status {
    #[command(flatten)]
    toolchain: ToolchainArgs,
    /// Output status in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Configure phase
  // ============================================================================
  /// Negotiate the effective toolchain version
  Negotiate {
    #[command(flatten)]
    toolchain: ToolchainArgs,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Record a build; bumps the build number for tracked assemble tasks
  Record {
    /// Requested task names (e.g. assembleAppRelease, :app:assembleAppDebug)
    #[arg(long = "task", required = true, num_args = 1..)]
    tasks: Vec<String>,
    /// Override the current time (millis since epoch)
    #[arg(long)]
    now: Option<i64>,
    #[command(flatten)]
    toolchain: ToolchainArgs,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  // ============================================================================
  // Post-build
  // ============================================================================
  /// Append CRC-32 checksums to produced artifact names
  Finalize {
    /// Flavor(s) to finalize (default: all configured flavors)
    #[arg(long = "flavor")]
    flavors: Vec<String>,
    /// Build type (default: artifacts.release_build_type)
    #[arg(long)]
    build_type: Option<String>,
    /// Show planned renames without touching files
    #[arg(long)]
    dry_run: bool,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Copy the universal artifact to the template location
  Stage {
    /// Flavor to stage from (default: staging.flavor)
    #[arg(long)]
    flavor: Option<String>,
    /// Build type (default: staging.build_type)
    #[arg(long)]
    build_type: Option<String>,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();
  telemetry::init_tracing(cli.log_json, telemetry::level_for(cli.verbose));

  // init runs before (and regardless of) any existing config
  if let Commands::Init { force } = cli.command {
    let root = match utils::absolute(&cli.root) {
      Ok(root) => root,
      Err(err) => handle_error(err.into()),
    };
    if let Err(err) = commands::run_init(&root, force) {
      handle_error(err);
    }
    return;
  }

  let ctx = match BuildContext::build(&cli.root, cli.config.as_deref()) {
    Ok(ctx) => ctx,
    Err(err) => handle_error(err),
  };

  let result = match cli.command {
    Commands::Init { .. } => Ok(()),
    Commands::Status { toolchain, json } => {
      commands::run_status(&ctx, toolchain.orchestrator_version, toolchain.host_java, json)
    }
    Commands::Negotiate { toolchain, json } => {
      commands::run_negotiate(&ctx, toolchain.orchestrator_version, toolchain.host_java, json)
    }
    Commands::Record {
      tasks,
      now,
      toolchain,
      json,
    } => commands::run_record(
      &ctx,
      tasks,
      now,
      toolchain.orchestrator_version,
      toolchain.host_java,
      json,
    ),
    Commands::Finalize {
      flavors,
      build_type,
      dry_run,
      json,
    } => commands::run_finalize(&ctx, flavors, build_type, dry_run, json),
    Commands::Stage {
      flavor,
      build_type,
      json,
    } => commands::run_stage(&ctx, flavor, build_type, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: KeeperError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
