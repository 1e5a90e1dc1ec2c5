//! Human-readable version summary printed at the end of configure/record

use crate::core::project::ProjectVersions;
use crate::version::negotiate::NegotiatedVersion;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
pub struct VersionSummary {
  pub title: String,
  pub version_name: String,
  pub version_code: u64,
  /// Whether this invocation incremented `version_code`
  pub auto_incremented: bool,
  pub sdk_min: u32,
  pub sdk_target: u32,
  pub sdk_compile: u32,
  pub toolchain: NegotiatedVersion,
}

impl VersionSummary {
  pub fn new(
    project_name: &str,
    versions: &ProjectVersions,
    version_code: u64,
    auto_incremented: bool,
    toolchain: NegotiatedVersion,
  ) -> Self {
    Self {
      title: format!("Version information for {}", project_name),
      version_name: versions.version_name.clone(),
      version_code,
      auto_incremented,
      sdk_min: versions.sdk.min,
      sdk_target: versions.sdk.target,
      sdk_compile: versions.sdk.compile,
      toolchain,
    }
  }

  fn lines(&self) -> [String; 5] {
    let code = if self.auto_incremented {
      format!("{} [auto-incremented]", self.version_code)
    } else {
      self.version_code.to_string()
    };

    [
      self.title.clone(),
      format!("Version name: {}", self.version_name),
      format!("Version code: {}", code),
      format!(
        "SDK versions: min [{}] / target [{}] / compile [{}]",
        self.sdk_min, self.sdk_target, self.sdk_compile
      ),
      format!("Java version: {}", self.toolchain),
    ]
  }
}

impl fmt::Display for VersionSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let [title, name, code, sdk, java] = self.lines();
    let width = [&title, &name, &code, &sdk, &java]
      .iter()
      .map(|line| line.chars().count())
      .max()
      .unwrap_or(0);

    writeln!(f, "{}", "=".repeat(width))?;
    writeln!(f, "{}", title)?;
    writeln!(f, "{}", "-".repeat(width))?;
    for line in [name, code, sdk, java] {
      writeln!(f, "{}", line)?;
    }
    writeln!(f, "{}", "=".repeat(width))
  }
}
