//! RC4 stream cipher with configurable initial keystream discard.
//!
//! Provided for interoperability with legacy data. The first `drop` bytes of
//! keystream are discarded after key setup (RC4-drop[n]).

use std::sync::Arc;

use tessera_core::MAX_RC4_DROP;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{KeySizes, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance, StreamCipher};
use crate::error::CryptoError;

pub const NAME: &str = "rc4";
pub const MIN_KEY: usize = 5;
pub const MAX_KEY: usize = 256;

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Rc4 {
    s: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Key setup followed by discarding `drop` keystream bytes.
    pub fn new(key: &[u8], drop: usize) -> Self {
        let mut s = [0u8; 256];
        for (idx, v) in s.iter_mut().enumerate() {
            *v = idx as u8;
        }

        let mut j = 0u8;
        for idx in 0..256 {
            j = j
                .wrapping_add(s[idx])
                .wrapping_add(key[idx % key.len()]);
            s.swap(idx, j as usize);
        }

        let mut cipher = Self { s, i: 0, j: 0 };
        for _ in 0..drop {
            cipher.next_byte();
        }
        cipher
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.s[self.i as usize]);
        self.s.swap(self.i as usize, self.j as usize);
        let idx = self.s[self.i as usize].wrapping_add(self.s[self.j as usize]);
        self.s[idx as usize]
    }
}

impl StreamCipher for Rc4 {
    fn apply_keystream(&mut self, data: &mut [u8]) {
        for b in data.iter_mut() {
            *b ^= self.next_byte();
        }
    }
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::stream(
        NAME,
        KeySizes::Range {
            min: MIN_KEY,
            max: MAX_KEY,
        },
        std::mem::size_of::<Rc4>(),
    )
}

/// `default_drop` applies when the caller passes `Params::None`. Discards
/// above `MAX_RC4_DROP` are rejected with `InvalidParameter`.
pub fn primitive(default_drop: usize) -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(move |key: &[u8], params: &Params| {
            let drop = match params {
                Params::None => default_drop,
                Params::Rc4 { drop } => *drop,
                other => return Err(other.unsupported(NAME)),
            };
            if drop > MAX_RC4_DROP {
                return Err(CryptoError::InvalidParameter(format!(
                    "rc4 discard of {} bytes exceeds {}",
                    drop, MAX_RC4_DROP
                )));
            }
            Ok(PrimitiveInstance::Stream(Box::new(Rc4::new(key, drop))))
        }),
    )
}
