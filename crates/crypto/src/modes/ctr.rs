//! Counter mode.
//!
//! The counter starts at the IV and the first keystream block is `E(IV)`.
//! After each block the counter is incremented as a little-endian integer
//! (byte 0 least significant), wrapping to zero past the maximum value.
//! Blocks carry no data dependency, so a message can be split across
//! engines initialised with [`counter_for_block`].

use super::BlockMode;
use crate::error::CryptoResult;
use crate::primitives::BlockCipher;
use crate::secure_mem::SecureBuffer;

/// Adds one to a little-endian counter, wrapping on overflow.
pub fn increment_counter(counter: &mut [u8]) {
    for byte in counter.iter_mut() {
        let (next, carry) = byte.overflowing_add(1);
        *byte = next;
        if !carry {
            break;
        }
    }
}

/// Counter value used for block `index` of a message started at `iv`.
pub fn counter_for_block(iv: &[u8], index: u64) -> Vec<u8> {
    let mut counter = iv.to_vec();
    let mut carry = index;

    for byte in counter.iter_mut() {
        if carry == 0 {
            break;
        }
        let sum = *byte as u64 + (carry & 0xFF);
        *byte = sum as u8;
        carry = (carry >> 8) + (sum >> 8);
    }

    counter
}

pub(crate) struct Ctr {
    counter: SecureBuffer,
    keystream: SecureBuffer,
    pos: usize,
}

impl Ctr {
    pub(crate) fn new(cipher: &dyn BlockCipher, iv: &[u8]) -> Self {
        let counter = SecureBuffer::from_slice(iv);
        let mut keystream = SecureBuffer::from_slice(iv);
        cipher.encrypt_in_place(keystream.expose_mut());
        Self {
            counter,
            keystream,
            pos: 0,
        }
    }
}

impl BlockMode for Ctr {
    fn update_len(&self, input_len: usize) -> usize {
        input_len
    }

    fn update(&mut self, cipher: &dyn BlockCipher, input: &[u8], output: &mut [u8]) -> usize {
        let bs = self.keystream.len();

        for (src, dst) in input.iter().zip(output.iter_mut()) {
            *dst = src ^ self.keystream.expose()[self.pos];

            self.pos += 1;
            if self.pos == bs {
                increment_counter(self.counter.expose_mut());
                let ks = self.keystream.expose_mut();
                ks.copy_from_slice(self.counter.expose());
                cipher.encrypt_in_place(ks);
                self.pos = 0;
            }
        }

        input.len()
    }

    fn finalize(&mut self, _cipher: &dyn BlockCipher, _output: &mut [u8]) -> CryptoResult<usize> {
        Ok(0)
    }
}
