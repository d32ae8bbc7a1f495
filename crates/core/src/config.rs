//! Configuration management for Tessera.
//!
//! Configuration is read once at process start and handed to whatever
//! assembles registries, engines and secure buffers. Nothing here is global.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Default number of RC4 keystream bytes discarded after key setup.
pub const DEFAULT_RC4_DROP: usize = 2048;

/// Largest RC4 keystream discard accepted from configuration or parameters.
pub const MAX_RC4_DROP: usize = 1 << 20;

/// Length in bytes of the seed accepted by the seeded random source.
pub const SEED_LEN: usize = 32;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub memory: MemoryConfig,
    pub engine: EngineSection,
    pub random: RandomConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MemoryConfig {
    /// Request that secure buffers be locked out of swap.
    pub lock_pages: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineSection {
    /// Padding default for ECB and CBC engines.
    pub default_padding: bool,
    /// Keystream bytes RC4 discards when no explicit parameter is given.
    pub rc4_drop: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            default_padding: true,
            rc4_drop: DEFAULT_RC4_DROP,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RandomSourceKind {
    /// Operating system entropy.
    #[default]
    System,
    /// Deterministic generator, for reproducible test runs only.
    Seeded,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RandomConfig {
    pub source: RandomSourceKind,
    /// Hex-encoded 32-byte seed, required when `source = "seeded"`.
    pub seed_hex: Option<String>,
}

impl RandomConfig {
    /// Decodes the configured seed, if any.
    pub fn seed_bytes(&self) -> CoreResult<Option<[u8; SEED_LEN]>> {
        let Some(seed_hex) = self.seed_hex.as_deref() else {
            return Ok(None);
        };

        let decoded = hex::decode(seed_hex.trim()).map_err(|e| CoreError::InvalidConfig {
            field: "random.seed_hex".to_string(),
            reason: e.to_string(),
        })?;

        if decoded.len() != SEED_LEN {
            return Err(CoreError::InvalidConfig {
                field: "random.seed_hex".to_string(),
                reason: format!("expected {} bytes, got {}", SEED_LEN, decoded.len()),
            });
        }

        let mut seed = [0u8; SEED_LEN];
        seed.copy_from_slice(&decoded);
        Ok(Some(seed))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit structured JSON instead of human-readable lines.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl EngineConfig {
    #[cfg(feature = "toml-config")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(CoreError::Io)?;
        let config = Self::from_toml_str(&content)?;
        Ok(config)
    }

    #[cfg(feature = "toml-config")]
    pub fn from_toml_str(content: &str) -> CoreResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self::default()
    }

    /// Rejects settings that cannot work together.
    pub fn validate(&self) -> CoreResult<()> {
        let seed = self.random.seed_bytes()?;
        if self.random.source == RandomSourceKind::Seeded && seed.is_none() {
            return Err(CoreError::InvalidConfig {
                field: "random.seed_hex".to_string(),
                reason: "seeded source requires a seed".to_string(),
            });
        }

        if self.engine.rc4_drop > MAX_RC4_DROP {
            return Err(CoreError::InvalidConfig {
                field: "engine.rc4_drop".to_string(),
                reason: format!("must not exceed {}", MAX_RC4_DROP),
            });
        }

        if self.logging.level.trim().is_empty() {
            return Err(CoreError::InvalidConfig {
                field: "logging.level".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
