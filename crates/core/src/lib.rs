//! Core functionality for the Tessera cryptographic engine.
//!
//! This crate provides the ambient pieces shared by every Tessera crate:
//! configuration, logging bootstrap, the version descriptor, and the core
//! error type. It holds no key material.

pub mod config;
pub mod error;
pub mod logging;
pub mod version;

pub use config::{
    EngineConfig, EngineSection, LoggingConfig, MemoryConfig, RandomConfig, RandomSourceKind,
    DEFAULT_RC4_DROP, MAX_RC4_DROP,
};
pub use error::{CoreError, CoreResult};
pub use version::{version, VersionInfo};
