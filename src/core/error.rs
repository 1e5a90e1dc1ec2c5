//! Error types for buildkeeper with contextual messages and exit codes
//!
//! Every fatal condition names the offending key, path, or value. Errors are
//! grouped by the pipeline stage they abort:
//!
//! - **Config**: malformed properties, bad buildkeeper.toml, no viable toolchain.
//!   Aborts before any artifact work begins.
//! - **Persistence**: the properties file could not be read or written.
//! - **Artifact**: an expected artifact is missing at finalization time.
//!   Earlier compilation output is left untouched.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for buildkeeper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// Configuration error (properties, config file, negotiation)
  Config = 1,
  /// System error (persistence, I/O)
  System = 2,
  /// Artifact finalization failure
  Artifact = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for buildkeeper
#[derive(Debug)]
pub enum KeeperError {
  /// Configuration errors
  Config(ConfigError),

  /// Properties file read/write failures
  Persistence(PersistenceError),

  /// Artifact finalization errors
  Artifact(ArtifactError),

  /// I/O errors
  Io(io::Error),

  /// I/O errors with a note on what was being done
  IoContext { context: String, source: io::Error },

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl KeeperError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    KeeperError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    KeeperError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      KeeperError::Message { message, context, help } => KeeperError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      KeeperError::Io(source) => KeeperError::IoContext { context: ctx_str, source },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      KeeperError::Config(_) => ExitCode::Config,
      KeeperError::Persistence(_) => ExitCode::System,
      KeeperError::Artifact(_) => ExitCode::Artifact,
      KeeperError::Io(_) | KeeperError::IoContext { .. } => ExitCode::System,
      KeeperError::Message { .. } => ExitCode::Config,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      KeeperError::Config(e) => e.help_message(),
      KeeperError::Persistence(e) => e.help_message(),
      KeeperError::Artifact(e) => e.help_message(),
      KeeperError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for KeeperError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      KeeperError::Config(e) => write!(f, "{}", e),
      KeeperError::Persistence(e) => write!(f, "{}", e),
      KeeperError::Artifact(e) => write!(f, "{}", e),
      KeeperError::Io(e) => write!(f, "I/O error: {}", e),
      KeeperError::IoContext { context, source } => write!(f, "{}: {}", context, source),
      KeeperError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for KeeperError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      KeeperError::Io(e) | KeeperError::IoContext { source: e, .. } => Some(e),
      KeeperError::Persistence(e) => Some(e.source_io()),
      _ => None,
    }
  }
}

impl From<io::Error> for KeeperError {
  fn from(err: io::Error) -> Self {
    KeeperError::Io(err)
  }
}

impl From<String> for KeeperError {
  fn from(msg: String) -> Self {
    KeeperError::message(msg)
  }
}

impl From<&str> for KeeperError {
  fn from(msg: &str) -> Self {
    KeeperError::message(msg)
  }
}

impl From<ConfigError> for KeeperError {
  fn from(err: ConfigError) -> Self {
    KeeperError::Config(err)
  }
}

impl From<ArtifactError> for KeeperError {
  fn from(err: ArtifactError) -> Self {
    KeeperError::Artifact(err)
  }
}

impl From<PersistenceError> for KeeperError {
  fn from(err: PersistenceError) -> Self {
    KeeperError::Persistence(err)
  }
}

impl From<toml_edit::de::Error> for KeeperError {
  fn from(err: toml_edit::de::Error) -> Self {
    KeeperError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<toml_edit::ser::Error> for KeeperError {
  fn from(err: toml_edit::ser::Error) -> Self {
    KeeperError::message(format!("TOML serialization error: {}", err))
  }
}

impl From<serde_json::Error> for KeeperError {
  fn from(err: serde_json::Error) -> Self {
    KeeperError::message(format!("JSON error: {}", err))
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// Required properties key is absent
  MissingKey { key: String, path: PathBuf },

  /// Properties value failed to parse as a base-10 integer
  InvalidInteger { key: String, value: String },

  /// buildkeeper.toml failed validation
  InvalidConfig { path: PathBuf, reason: String },

  /// No locally recognized toolchain target at or below the supported floor
  NoViableToolchain { min_supported: u32 },

  /// Host toolchain version could not be determined
  HostUndetected { reason: String },

  /// Host toolchain is older than the minimum supported version
  HostBelowMinimum { host: u32, min_supported: u32 },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::MissingKey { key, path } => Some(format!("Add `{}=<value>` to {}", key, path.display())),
      ConfigError::InvalidInteger { key, .. } => Some(format!("`{}` must be a base-10 integer", key)),
      ConfigError::NoViableToolchain { .. } => {
        Some("Extend `toolchain.targets` in buildkeeper.toml or lower JAVA_VERSION_MIN_SUPPORTED.".to_string())
      }
      ConfigError::HostUndetected { .. } => {
        Some("Pass --host-java <MAJOR> or set BUILDKEEPER_HOST_JAVA to the installed JDK major version.".to_string())
      }
      ConfigError::HostBelowMinimum { min_supported, .. } => {
        Some(format!("Install JDK {} or newer for the build.", min_supported))
      }
      ConfigError::InvalidConfig { .. } => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::MissingKey { key, path } => {
        write!(f, "Missing required key '{}' in {}", key, path.display())
      }
      ConfigError::InvalidInteger { key, value } => {
        write!(f, "Invalid integer for '{}': '{}'", key, value)
      }
      ConfigError::InvalidConfig { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::NoViableToolchain { min_supported } => {
        write!(
          f,
          "No recognized toolchain target found in [1, {}]; cannot choose a toolchain version",
          min_supported
        )
      }
      ConfigError::HostUndetected { reason } => {
        write!(f, "Could not determine the host toolchain version: {}", reason)
      }
      ConfigError::HostBelowMinimum { host, min_supported } => {
        write!(
          f,
          "Current JDK version {} does not meet the minimum requirement which {} is needed",
          host, min_supported
        )
      }
    }
  }
}

/// Properties file persistence errors
#[derive(Debug)]
pub enum PersistenceError {
  /// Properties file could not be read
  Unreadable { path: PathBuf, source: io::Error },

  /// Properties file could not be written
  Unwritable { path: PathBuf, source: io::Error },
}

impl PersistenceError {
  fn help_message(&self) -> Option<String> {
    match self {
      PersistenceError::Unreadable { .. } => {
        Some("Check that the properties path in buildkeeper.toml points at an existing file.".to_string())
      }
      PersistenceError::Unwritable { .. } => {
        Some("The build number was NOT incremented. Check file permissions and disk space.".to_string())
      }
    }
  }

  fn source_io(&self) -> &io::Error {
    match self {
      PersistenceError::Unreadable { source, .. } | PersistenceError::Unwritable { source, .. } => source,
    }
  }
}

impl fmt::Display for PersistenceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      PersistenceError::Unreadable { path, source } => {
        write!(f, "Cannot read properties file '{}': {}", path.display(), source)
      }
      PersistenceError::Unwritable { path, source } => {
        write!(f, "Cannot write properties file '{}': {}", path.display(), source)
      }
    }
  }
}

/// Artifact finalization errors
#[derive(Debug)]
pub enum ArtifactError {
  /// Expected artifact file does not exist
  Missing { expected: PathBuf },

  /// Artifact output directory does not exist
  DirectoryMissing { path: PathBuf },
}

impl ArtifactError {
  fn help_message(&self) -> Option<String> {
    match self {
      ArtifactError::Missing { .. } => {
        Some("Run the release assemble task first; the universal artifact must exist before staging.".to_string())
      }
      ArtifactError::DirectoryMissing { .. } => {
        Some("Check `artifacts.layout` in buildkeeper.toml and that the build produced outputs.".to_string())
      }
    }
  }
}

impl fmt::Display for ArtifactError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ArtifactError::Missing { expected } => {
        write!(f, "Source file \"{}\" doesn't exist", expected.display())
      }
      ArtifactError::DirectoryMissing { path } => {
        write!(f, "Artifact directory \"{}\" doesn't exist", path.display())
      }
    }
  }
}

/// Result type alias for buildkeeper
pub type KeeperResult<T> = Result<T, KeeperError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> KeeperResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> KeeperResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<KeeperError>,
{
  fn context(self, ctx: impl Into<String>) -> KeeperResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> KeeperResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &KeeperError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
