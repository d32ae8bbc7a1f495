//! AES block cipher backed by the `aes` crate.
//!
//! One primitive covers all three key lengths; the schedule is chosen from
//! the key length at instantiation. Round keys are zeroized on drop by the
//! backing crate.

use std::sync::Arc;

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use super::{
    BlockCipher, KeySizes, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance,
};
use crate::error::{CryptoError, CryptoResult};

pub const NAME: &str = "aes";
pub const BLOCK_SIZE: usize = 16;
pub const KEY_SIZES: &[usize] = &[16, 24, 32];

enum Schedule {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// AES-128, AES-192 or AES-256, selected by key length.
pub struct Aes {
    schedule: Schedule,
}

impl Aes {
    pub fn new(key: &[u8]) -> CryptoResult<Self> {
        let schedule = match key.len() {
            16 => Schedule::Aes128(Aes128::new(GenericArray::from_slice(key))),
            24 => Schedule::Aes192(Aes192::new(GenericArray::from_slice(key))),
            32 => Schedule::Aes256(Aes256::new(GenericArray::from_slice(key))),
            len => {
                return Err(CryptoError::InvalidKeySize {
                    primitive: NAME.to_string(),
                    len,
                })
            }
        };
        Ok(Self { schedule })
    }

    /// Key length in bytes of the active schedule.
    pub fn key_len(&self) -> usize {
        match self.schedule {
            Schedule::Aes128(_) => 16,
            Schedule::Aes192(_) => 24,
            Schedule::Aes256(_) => 32,
        }
    }
}

impl BlockCipher for Aes {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn encrypt_in_place(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match &self.schedule {
            Schedule::Aes128(c) => c.encrypt_block(block),
            Schedule::Aes192(c) => c.encrypt_block(block),
            Schedule::Aes256(c) => c.encrypt_block(block),
        }
    }

    fn decrypt_in_place(&self, block: &mut [u8]) {
        let block = GenericArray::from_mut_slice(block);
        match &self.schedule {
            Schedule::Aes128(c) => c.decrypt_block(block),
            Schedule::Aes192(c) => c.decrypt_block(block),
            Schedule::Aes256(c) => c.decrypt_block(block),
        }
    }
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::block(
        NAME,
        BLOCK_SIZE,
        KeySizes::Fixed(KEY_SIZES),
        std::mem::size_of::<Aes>(),
    )
}

pub fn primitive() -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(|key: &[u8], params: &Params| match params {
            Params::None => Ok(PrimitiveInstance::Block(Box::new(Aes::new(key)?))),
            other => Err(other.unsupported(NAME)),
        }),
    )
}
