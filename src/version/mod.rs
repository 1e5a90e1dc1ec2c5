//! Toolchain version negotiation
//!
//! - **compare**: dotted version comparator shared by every comparison site
//! - **compat**: toolchain / orchestrator compatibility table
//! - **negotiate**: effective version selection with fallback/coerced/consistent flags
//! - **host**: host JDK detection and upgrade/downgrade advisories

pub mod compare;
pub mod compat;
pub mod host;
pub mod negotiate;

pub use compare::DottedVersion;
pub use compat::CompatibilityTable;
pub use host::{Advisory, HostToolchain};
pub use negotiate::{KnownTargets, NegotiatedVersion, Negotiator, VersionSpec};
