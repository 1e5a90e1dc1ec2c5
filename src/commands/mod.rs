//! CLI commands for buildkeeper
//!
//! - **init**: write a default buildkeeper.toml
//! - **negotiate**: configure-phase toolchain selection
//! - **status**: read-only version and counter summary
//! - **record**: qualifying-build hook that drives the build counter
//! - **finalize**: checksum-rename produced artifacts
//! - **stage**: copy the universal artifact to the template location
//!
//! Everything except `init` takes `&BuildContext`.

pub mod finalize;
pub mod init;
pub mod negotiate;
pub mod record;
pub mod stage;
pub mod status;

pub use finalize::run_finalize;
pub use init::run_init;
pub use negotiate::run_negotiate;
pub use record::run_record;
pub use stage::run_stage;
pub use status::run_status;
