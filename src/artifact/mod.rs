//! Release artifact handling: naming, checksums, finalize, template staging

pub mod checksum;
pub mod finalize;
pub mod naming;
pub mod stage;

pub use finalize::{ArtifactDescriptor, ArtifactFinalizer};
pub use naming::NamingPolicy;
pub use stage::stage_template;
