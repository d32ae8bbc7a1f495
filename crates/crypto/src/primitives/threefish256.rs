//! Threefish-256 tweakable block cipher.
//!
//! 256-bit block and key, 128-bit tweak, 72 rounds. Words are little-endian
//! 64-bit integers. The expanded key schedule is held in the cipher state and
//! zeroized on drop.

use std::sync::Arc;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{
    BlockCipher, KeySizes, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance,
};

pub const NAME: &str = "threefish256";
pub const BLOCK_SIZE: usize = 32;
pub const KEY_SIZE: usize = 32;
pub const TWEAK_SIZE: usize = 16;

const ROUNDS: usize = 72;
const SUBKEYS: usize = ROUNDS / 4 + 1;
const KEY_SCHEDULE_PARITY: u64 = 0x1BD1_1BDA_A9FC_1A22;

const ROTATIONS: [[u32; 2]; 8] = [
    [14, 16],
    [52, 57],
    [23, 40],
    [5, 37],
    [25, 33],
    [46, 12],
    [58, 22],
    [32, 32],
];

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Threefish256 {
    subkeys: [[u64; 4]; SUBKEYS],
}

impl Threefish256 {
    pub fn new(key: &[u8; KEY_SIZE], tweak: &[u8; TWEAK_SIZE]) -> Self {
        let mut k = [0u64; 4];
        let mut t = [0u64; 2];
        load_words(key, &mut k);
        load_words(tweak, &mut t);

        let cipher = Self::from_words(&k, &t);
        k.zeroize();
        cipher
    }

    /// Builds the key schedule from key and tweak words directly.
    pub fn from_words(key: &[u64; 4], tweak: &[u64; 2]) -> Self {
        let mut k = [0u64; 5];
        k[..4].copy_from_slice(key);
        k[4] = KEY_SCHEDULE_PARITY ^ key[0] ^ key[1] ^ key[2] ^ key[3];

        let t = [tweak[0], tweak[1], tweak[0] ^ tweak[1]];

        let mut subkeys = [[0u64; 4]; SUBKEYS];
        for (s, sk) in subkeys.iter_mut().enumerate() {
            sk[0] = k[s % 5];
            sk[1] = k[(s + 1) % 5].wrapping_add(t[s % 3]);
            sk[2] = k[(s + 2) % 5].wrapping_add(t[(s + 1) % 3]);
            sk[3] = k[(s + 3) % 5].wrapping_add(s as u64);
        }

        k.zeroize();
        Self { subkeys }
    }

    pub fn encrypt_words(&self, v: &mut [u64; 4]) {
        for d in 0..ROUNDS {
            if d % 4 == 0 {
                add_subkey(v, &self.subkeys[d / 4]);
            }

            let [r0, r1] = ROTATIONS[d % 8];
            v[0] = v[0].wrapping_add(v[1]);
            v[1] = v[1].rotate_left(r0) ^ v[0];
            v[2] = v[2].wrapping_add(v[3]);
            v[3] = v[3].rotate_left(r1) ^ v[2];

            v.swap(1, 3);
        }
        add_subkey(v, &self.subkeys[SUBKEYS - 1]);
    }

    pub fn decrypt_words(&self, v: &mut [u64; 4]) {
        sub_subkey(v, &self.subkeys[SUBKEYS - 1]);
        for d in (0..ROUNDS).rev() {
            v.swap(1, 3);

            let [r0, r1] = ROTATIONS[d % 8];
            v[3] = (v[3] ^ v[2]).rotate_right(r1);
            v[2] = v[2].wrapping_sub(v[3]);
            v[1] = (v[1] ^ v[0]).rotate_right(r0);
            v[0] = v[0].wrapping_sub(v[1]);

            if d % 4 == 0 {
                sub_subkey(v, &self.subkeys[d / 4]);
            }
        }
    }
}

impl BlockCipher for Threefish256 {
    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn encrypt_in_place(&self, block: &mut [u8]) {
        let mut v = [0u64; 4];
        load_words(block, &mut v);
        self.encrypt_words(&mut v);
        store_words(&v, block);
        v.zeroize();
    }

    fn decrypt_in_place(&self, block: &mut [u8]) {
        let mut v = [0u64; 4];
        load_words(block, &mut v);
        self.decrypt_words(&mut v);
        store_words(&v, block);
        v.zeroize();
    }
}

fn add_subkey(v: &mut [u64; 4], sk: &[u64; 4]) {
    for (w, k) in v.iter_mut().zip(sk) {
        *w = w.wrapping_add(*k);
    }
}

fn sub_subkey(v: &mut [u64; 4], sk: &[u64; 4]) {
    for (w, k) in v.iter_mut().zip(sk) {
        *w = w.wrapping_sub(*k);
    }
}

/// Reads little-endian u64 words. `bytes.len()` must be `8 * words.len()`.
pub(crate) fn load_words(bytes: &[u8], words: &mut [u64]) {
    for (w, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        *w = u64::from_le_bytes(raw);
    }
}

pub(crate) fn store_words(words: &[u64], bytes: &mut [u8]) {
    for (w, chunk) in words.iter().zip(bytes.chunks_exact_mut(8)) {
        chunk.copy_from_slice(&w.to_le_bytes());
    }
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::block(
        NAME,
        BLOCK_SIZE,
        KeySizes::Fixed(&[KEY_SIZE]),
        std::mem::size_of::<Threefish256>(),
    )
}

pub fn primitive() -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(|key: &[u8], params: &Params| {
            let tweak = match params {
                Params::None => [0u8; TWEAK_SIZE],
                Params::Threefish256 { tweak } => *tweak,
                other => return Err(other.unsupported(NAME)),
            };

            let mut k = [0u8; KEY_SIZE];
            k.copy_from_slice(key);
            let cipher = Threefish256::new(&k, &tweak);
            k.zeroize();

            Ok(PrimitiveInstance::Block(Box::new(cipher)))
        }),
    )
}
