//! MD5 hash primitive backed by the `md-5` crate. Not collision resistant;
//! offered only to read and verify legacy data.

use std::sync::Arc;

use md5::Digest;

use super::{
    check_digest_out, HashFunction, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance,
};
use crate::error::CryptoResult;

pub const NAME: &str = "md5";
pub const DIGEST_SIZE: usize = 16;
pub const BLOCK_SIZE: usize = 64;

#[derive(Clone, Default)]
pub struct Md5 {
    inner: md5::Md5,
}

impl Md5 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashFunction for Md5 {
    fn digest_len(&self) -> usize {
        DIGEST_SIZE
    }

    fn block_len(&self) -> usize {
        BLOCK_SIZE
    }

    fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize_into(&mut self, out: &mut [u8]) -> CryptoResult<usize> {
        check_digest_out(DIGEST_SIZE, out)?;
        let digest = self.inner.finalize_reset();
        out[..DIGEST_SIZE].copy_from_slice(&digest);
        Ok(DIGEST_SIZE)
    }

    fn reset(&mut self) {
        Digest::reset(&mut self.inner);
    }
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::hash(NAME, DIGEST_SIZE, BLOCK_SIZE, std::mem::size_of::<Md5>())
}

pub fn primitive() -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(|_key: &[u8], params: &Params| match params {
            Params::None => Ok(PrimitiveInstance::Hash(Box::new(Md5::new()))),
            other => Err(other.unsupported(NAME)),
        }),
    )
}
