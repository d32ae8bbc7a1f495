//! Identity block cipher, used to exercise mode chaining in isolation.

use std::sync::Arc;

use super::{
    BlockCipher, KeySizes, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance,
};

pub const NAME: &str = "nullcipher";
pub const BLOCK_SIZE: usize = 16;

/// Block cipher whose permutation is the identity. Takes an empty key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCipher;

impl BlockCipher for NullCipher {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn encrypt_in_place(&self, _block: &mut [u8]) {}

    fn decrypt_in_place(&self, _block: &mut [u8]) {}
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::block(NAME, BLOCK_SIZE, KeySizes::Fixed(&[0]), 0)
}

pub fn primitive() -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(|_key: &[u8], params: &Params| match params {
            Params::None => Ok(PrimitiveInstance::Block(Box::new(NullCipher))),
            other => Err(other.unsupported(NAME)),
        }),
    )
}
