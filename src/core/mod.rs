//! Core engine for buildkeeper
//!
//! - **config**: buildkeeper.toml parsing and validation
//! - **context**: per-invocation context shared by all commands
//! - **error**: error types with contextual help messages
//! - **project**: typed view over the version properties
//! - **properties**: order-preserving properties file store

pub mod config;
pub mod context;
pub mod error;
pub mod project;
pub mod properties;
