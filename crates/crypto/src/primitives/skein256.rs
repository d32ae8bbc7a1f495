//! Skein-256 hash built on the Threefish-256 permutation.
//!
//! Unique Block Iteration (UBI) chains every 32-byte block through
//! Threefish keyed with the running chaining value. The output length is a
//! parameter: any number of bytes can be produced from the final chaining
//! value by the output stage.

use std::sync::Arc;

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::threefish256::{load_words, store_words, Threefish256};
use super::{
    check_digest_out, HashFunction, Params, Primitive, PrimitiveDescriptor, PrimitiveInstance,
};
use crate::error::{CryptoError, CryptoResult};

pub const NAME: &str = "skein256";
pub const STATE_SIZE: usize = 32;
pub const DEFAULT_OUTPUT: usize = 32;

const TYPE_CFG: u64 = 4;
const TYPE_MSG: u64 = 48;
const TYPE_OUT: u64 = 63;

const FLAG_FIRST: u64 = 1 << 62;
const FLAG_FINAL: u64 = 1 << 63;

/// Chaining value after the configuration block for a 256-bit output.
const IV_256: [u64; 4] = [
    0xFC9D_A860_D048_B449,
    0x2FCA_6647_9FA7_D833,
    0xB33B_C389_6656_840F,
    0x6A54_E920_FDE8_DA69,
];

#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Skein256 {
    initial: [u64; 4],
    chain: [u64; 4],
    buf: [u8; STATE_SIZE],
    buf_len: usize,
    position: u64,
    first: bool,
    output_len: usize,
}

impl Skein256 {
    pub fn new(output_len: usize) -> CryptoResult<Self> {
        if output_len == 0 || output_len > (u64::MAX / 8) as usize {
            return Err(CryptoError::InvalidParameter(format!(
                "skein256 output length {} out of range",
                output_len
            )));
        }

        let initial = if output_len == DEFAULT_OUTPUT {
            IV_256
        } else {
            config_chain(output_len)
        };

        Ok(Self {
            initial,
            chain: initial,
            buf: [0u8; STATE_SIZE],
            buf_len: 0,
            position: 0,
            first: true,
            output_len,
        })
    }

    fn compress_buffered(&mut self, last: bool) {
        self.position += self.buf_len as u64;
        let mut flags = TYPE_MSG << 56;
        if self.first {
            flags |= FLAG_FIRST;
        }
        if last {
            flags |= FLAG_FINAL;
        }

        let block = self.buf;
        self.chain = ubi_block(&self.chain, &block, self.position, flags);
        self.first = false;
        self.buf_len = 0;
    }
}

/// One UBI step: `E(chain, tweak, block) ^ block`.
fn ubi_block(chain: &[u64; 4], block: &[u8; STATE_SIZE], position: u64, flags: u64) -> [u64; 4] {
    let mut m = [0u64; 4];
    load_words(block, &mut m);

    let cipher = Threefish256::from_words(chain, &[position, flags]);
    let mut v = m;
    cipher.encrypt_words(&mut v);

    for (out, word) in v.iter_mut().zip(m.iter()) {
        *out ^= word;
    }
    v
}

fn config_chain(output_len: usize) -> [u64; 4] {
    let mut cfg = [0u8; STATE_SIZE];
    cfg[..4].copy_from_slice(b"SHA3");
    cfg[4..6].copy_from_slice(&1u16.to_le_bytes());
    cfg[8..16].copy_from_slice(&((output_len as u64) * 8).to_le_bytes());

    ubi_block(
        &[0u64; 4],
        &cfg,
        STATE_SIZE as u64,
        (TYPE_CFG << 56) | FLAG_FIRST | FLAG_FINAL,
    )
}

impl HashFunction for Skein256 {
    fn digest_len(&self) -> usize {
        self.output_len
    }

    fn block_len(&self) -> usize {
        STATE_SIZE
    }

    fn update(&mut self, mut data: &[u8]) {
        while !data.is_empty() {
            // The last block must be held back until finalization
            if self.buf_len == STATE_SIZE {
                self.compress_buffered(false);
            }
            let take = (STATE_SIZE - self.buf_len).min(data.len());
            self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&data[..take]);
            self.buf_len += take;
            data = &data[take..];
        }
    }

    fn finalize_into(&mut self, out: &mut [u8]) -> CryptoResult<usize> {
        check_digest_out(self.output_len, out)?;

        self.buf[self.buf_len..].fill(0);
        self.compress_buffered(true);

        let mut counter_block = [0u8; STATE_SIZE];
        let mut word_bytes = [0u8; STATE_SIZE];
        for (ctr, chunk) in out[..self.output_len].chunks_mut(STATE_SIZE).enumerate() {
            counter_block[..8].copy_from_slice(&(ctr as u64).to_le_bytes());
            let words = ubi_block(
                &self.chain,
                &counter_block,
                8,
                (TYPE_OUT << 56) | FLAG_FIRST | FLAG_FINAL,
            );
            store_words(&words, &mut word_bytes);
            chunk.copy_from_slice(&word_bytes[..chunk.len()]);
        }
        word_bytes.zeroize();

        let written = self.output_len;
        self.reset();
        Ok(written)
    }

    fn reset(&mut self) {
        self.chain = self.initial;
        self.buf.zeroize();
        self.buf_len = 0;
        self.position = 0;
        self.first = true;
    }
}

pub fn descriptor() -> PrimitiveDescriptor {
    PrimitiveDescriptor::hash(
        NAME,
        DEFAULT_OUTPUT,
        STATE_SIZE,
        std::mem::size_of::<Skein256>(),
    )
}

pub fn primitive() -> Primitive {
    Primitive::new(
        descriptor(),
        Arc::new(|_key: &[u8], params: &Params| {
            let output_len = match params {
                Params::None => DEFAULT_OUTPUT,
                Params::Skein256 { output_len } => *output_len,
                other => return Err(other.unsupported(NAME)),
            };
            Ok(PrimitiveInstance::Hash(Box::new(Skein256::new(output_len)?)))
        }),
    )
}
