//! Version descriptor exposed to callers for compatibility checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Library version plus the identifier of the build that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    /// Injected at build time through `TESSERA_BUILD_ID`, `"dev"` otherwise.
    pub build: String,
}

impl VersionInfo {
    /// A caller built against `major.minor` can use this library when the
    /// major versions match and this library is at least as new.
    pub fn is_compatible_with(&self, major: u32, minor: u32) -> bool {
        self.major == major && self.minor >= minor
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}+{}", self.major, self.minor, self.patch, self.build)
    }
}

/// Returns the version of the running library.
pub fn version() -> VersionInfo {
    VersionInfo {
        major: parse_component(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: parse_component(env!("CARGO_PKG_VERSION_MINOR")),
        patch: parse_component(env!("CARGO_PKG_VERSION_PATCH")),
        build: env!("TESSERA_BUILD_ID").to_string(),
    }
}

fn parse_component(raw: &str) -> u32 {
    raw.parse().unwrap_or(0)
}
