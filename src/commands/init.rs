use std::path::Path;

use crate::core::config::KeeperConfig;
use crate::core::error::{KeeperError, KeeperResult};

/// Run the init command to write a default buildkeeper.toml
pub fn run_init(root: &Path, force: bool) -> KeeperResult<()> {
  println!("📦 Project root: {}", root.display());

  if let Some(existing) = KeeperConfig::find_config_path(root)
    && !force
  {
    return Err(KeeperError::with_help(
      format!("Configuration already exists: {}", existing.display()),
      "Pass --force to overwrite it with defaults.",
    ));
  }

  println!("\n💾 Saving configuration...");
  let config_path = KeeperConfig::default().save(root)?;

  println!("\n✅ Successfully initialized buildkeeper!");
  println!("   Configuration saved to: {}", config_path.display());
  println!("\n🚀 Next steps:");
  println!("   1. Point [project].properties at your version.properties");
  println!("   2. Set [toolchain].orchestrator_version or pass --orchestrator-version");
  println!("   3. Run: buildkeeper status");

  Ok(())
}
