//! Name-based lookup of primitives and modes.
//!
//! A [`Registry`] is an ordinary value built by the caller, usually once at
//! process start from the engine configuration. Nothing is global: a test
//! can build its own registry holding mock primitives next to the
//! production one.

use std::collections::BTreeMap;

use tessera_core::EngineConfig;

use crate::error::{CryptoError, CryptoResult};
use crate::modes::{Mode, ModeEngine, ModeOptions};
use crate::primitives::{
    self, Params, Primitive, PrimitiveDescriptor, PrimitiveFactory, PrimitiveInstance,
};

#[derive(Debug, Clone)]
pub struct Registry {
    primitives: BTreeMap<String, Primitive>,
    default_padding: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Empty registry with padding on by default.
    pub fn new() -> Self {
        Self {
            primitives: BTreeMap::new(),
            default_padding: true,
        }
    }

    /// Every built-in primitive with default settings.
    pub fn with_defaults() -> Self {
        Self::from_config(&EngineConfig::default())
    }

    /// Every built-in primitive, with RC4 discard and padding defaults taken
    /// from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        let mut registry = Self {
            primitives: BTreeMap::new(),
            default_padding: config.engine.default_padding,
        };

        for primitive in primitives::builtin(config.engine.rc4_drop) {
            registry
                .primitives
                .insert(primitive.name().to_ascii_lowercase(), primitive);
        }

        tracing::debug!(
            count = registry.primitives.len(),
            default_padding = registry.default_padding,
            rc4_drop = config.engine.rc4_drop,
            "Primitive registry populated"
        );

        registry
    }

    /// Adds a primitive. Names are case-insensitive and may be registered
    /// only once.
    pub fn register(
        &mut self,
        descriptor: PrimitiveDescriptor,
        factory: PrimitiveFactory,
    ) -> CryptoResult<()> {
        self.register_primitive(Primitive::new(descriptor, factory))
    }

    pub fn register_primitive(&mut self, primitive: Primitive) -> CryptoResult<()> {
        let key = primitive.name().to_ascii_lowercase();
        if self.primitives.contains_key(&key) {
            return Err(CryptoError::InvalidParameter(format!(
                "primitive {} already registered",
                primitive.name()
            )));
        }

        tracing::debug!(
            primitive = primitive.name(),
            category = %primitive.category(),
            "Primitive registered"
        );
        self.primitives.insert(key, primitive);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&PrimitiveDescriptor> {
        self.get(name).map(Primitive::descriptor)
    }

    pub fn get(&self, name: &str) -> Option<&Primitive> {
        self.primitives.get(&name.trim().to_ascii_lowercase())
    }

    /// Like [`Registry::get`], failing with `UnsupportedPrimitive`.
    pub fn primitive(&self, name: &str) -> CryptoResult<&Primitive> {
        self.get(name)
            .ok_or_else(|| CryptoError::UnsupportedPrimitive(name.to_string()))
    }

    pub fn lookup_mode(&self, name: &str) -> CryptoResult<Mode> {
        Mode::from_name(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.primitives.values().map(Primitive::name)
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn default_options(&self, mode: Mode) -> ModeOptions {
        ModeOptions::for_mode(mode, self.default_padding)
    }

    pub fn instantiate(
        &self,
        name: &str,
        key: &[u8],
        params: &Params,
    ) -> CryptoResult<PrimitiveInstance> {
        self.primitive(name)?.instantiate(key, params)
    }

    /// Builds an engine by name with the registry's padding default.
    pub fn engine(&self, primitive: &str, mode: &str) -> CryptoResult<ModeEngine> {
        let mode = self.lookup_mode(mode)?;
        self.engine_with(primitive, mode, self.default_options(mode))
    }

    pub fn engine_with(
        &self,
        primitive: &str,
        mode: Mode,
        options: ModeOptions,
    ) -> CryptoResult<ModeEngine> {
        let primitive = self.primitive(primitive)?.clone();
        ModeEngine::new(primitive, mode, options)
    }
}
