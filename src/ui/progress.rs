//! Progress indicators for artifact processing
//!
//! Uses `linya`; bars draw to stderr and stay out of JSON output.

use linya::{Bar, Progress};

/// Progress bar over a variant's artifacts
pub struct ArtifactProgress {
  progress: Progress,
  bar: Bar,
}

impl ArtifactProgress {
  pub fn new(total: usize, label: impl Into<String>) -> Self {
    let mut progress = Progress::new();
    let bar = progress.bar(total, label.into());
    Self { progress, bar }
  }

  /// Only draw when there is more than one artifact to wait on
  pub fn for_artifacts(total: usize, label: impl Into<String>, enabled: bool) -> Option<Self> {
    (enabled && total > 1).then(|| Self::new(total, label))
  }

  /// Increment progress by 1
  pub fn inc(&mut self) {
    self.progress.inc_and_draw(&self.bar, 1);
  }
}
