//! Streaming digests over any hash-category primitive.

use crate::error::{CryptoError, CryptoResult};
use crate::primitives::{Category, HashFunction, Params, Primitive, PrimitiveInstance};
use crate::registry::Registry;

/// Message digest context.
pub struct Digest {
    name: &'static str,
    hash: Box<dyn HashFunction>,
}

impl Digest {
    pub fn new(primitive: &Primitive, params: &Params) -> CryptoResult<Self> {
        Ok(Self {
            name: primitive.name(),
            hash: instantiate_hash(primitive, params)?,
        })
    }

    pub fn from_registry(registry: &Registry, name: &str, params: &Params) -> CryptoResult<Self> {
        Self::new(registry.primitive(name)?, params)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn digest_len(&self) -> usize {
        self.hash.digest_len()
    }

    pub fn block_len(&self) -> usize {
        self.hash.block_len()
    }

    pub fn update(&mut self, data: &[u8]) {
        self.hash.update(data);
    }

    /// Writes the digest into `out` and resets the context.
    pub fn finalize(&mut self, out: &mut [u8]) -> CryptoResult<usize> {
        self.hash.finalize_into(out)
    }

    pub fn finalize_vec(&mut self) -> CryptoResult<Vec<u8>> {
        let mut out = vec![0u8; self.digest_len()];
        self.finalize(&mut out)?;
        Ok(out)
    }

    pub fn reset(&mut self) {
        self.hash.reset();
    }
}

/// One-shot digest of `data`.
pub fn digest(primitive: &Primitive, params: &Params, data: &[u8]) -> CryptoResult<Vec<u8>> {
    let mut ctx = Digest::new(primitive, params)?;
    ctx.update(data);
    ctx.finalize_vec()
}

pub(crate) fn instantiate_hash(
    primitive: &Primitive,
    params: &Params,
) -> CryptoResult<Box<dyn HashFunction>> {
    match primitive.instantiate(&[], params)? {
        PrimitiveInstance::Hash(hash) => Ok(hash),
        other => Err(CryptoError::InvalidParameter(format!(
            "{} is a {} primitive, expected {}",
            primitive.name(),
            other.category(),
            Category::Hash
        ))),
    }
}
