//! Canonical artifact file names
//!
//! One policy drives every name the pipeline produces or looks for, so the
//! checksum rename and the template staging can never disagree:
//!
//! ```text
//! <prefix>-v<version>-<arch>.<ext>             produced by the build
//! <prefix>-v<version>-<arch>-<crc32>.<ext>     after finalize
//! <prefix>-v<version>-universal.<ext>          staging source
//! ```
//!
//! Each whitespace character in the version name becomes a dash and the whole
//! file name is lowercased.

use serde::Serialize;

pub const UNIVERSAL: &str = "universal";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamingPolicy {
  prefix: String,
  version: String,
  extension: String,
}

/// A file name recognized under the policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedName {
  /// Straight from the build, no checksum yet
  Canonical { arch: String },
  /// Already finalized
  Checksummed { arch: String, checksum: String },
}

impl NamingPolicy {
  pub fn new(prefix: &str, version_name: &str, extension: &str) -> Self {
    Self {
      prefix: prefix.to_lowercase(),
      version: normalize_version(version_name),
      extension: extension.trim_start_matches('.').to_lowercase(),
    }
  }

  /// `<prefix>-v<version>-<arch>.<ext>`
  pub fn artifact_name(&self, arch: &str) -> String {
    format!("{}{}.{}", self.head(), arch, self.extension).to_lowercase()
  }

  /// Name of the architecture-independent artifact
  pub fn universal_name(&self) -> String {
    self.artifact_name(UNIVERSAL)
  }

  /// `<prefix>-v<version>-<arch>-<checksum>.<ext>`
  pub fn checksummed_name(&self, arch: &str, checksum: &str) -> String {
    format!("{}{}-{}.{}", self.head(), arch, checksum, self.extension).to_lowercase()
  }

  /// Staged template file name (`template.apk`)
  pub fn template_name(&self, stem: &str) -> String {
    format!("{}.{}", stem, self.extension).to_lowercase()
  }

  /// Recognize a file name produced under this policy
  pub fn parse(&self, file_name: &str) -> Option<ParsedName> {
    let lower = file_name.to_lowercase();
    let middle = lower
      .strip_prefix(&self.head())?
      .strip_suffix(&format!(".{}", self.extension))?;

    if middle.is_empty() || middle.contains('.') {
      return None;
    }

    if let Some((arch, checksum)) = middle.rsplit_once('-')
      && !arch.is_empty()
      && is_checksum(checksum)
    {
      return Some(ParsedName::Checksummed {
        arch: arch.to_string(),
        checksum: checksum.to_string(),
      });
    }

    Some(ParsedName::Canonical {
      arch: middle.to_string(),
    })
  }

  fn head(&self) -> String {
    format!("{}-v{}-", self.prefix, self.version)
  }
}

/// Replace every whitespace character with a dash and lowercase
///
/// Runs are not collapsed and nothing is trimmed, so `6.4.0  Beta ` becomes
/// `6.4.0--beta-`, matching the names the external build writes.
pub fn normalize_version(version_name: &str) -> String {
  version_name
    .chars()
    .map(|c| if c.is_whitespace() { '-' } else { c })
    .collect::<String>()
    .to_lowercase()
}

/// Eight lowercase hex digits
fn is_checksum(s: &str) -> bool {
  s.len() == 8 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
