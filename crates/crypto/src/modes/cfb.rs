//! Cipher feedback with a full-block segment.
//!
//! The register holds `E(previous ciphertext block)`, starting from `E(IV)`.
//! Data is consumed byte by byte: each keystream byte is used once and then
//! replaced by the ciphertext byte it produced, so once a block is complete
//! the register contains that ciphertext block, ready to be encrypted again.
//! A trailing partial block needs no padding.

use super::{BlockMode, Direction};
use crate::error::CryptoResult;
use crate::primitives::BlockCipher;
use crate::secure_mem::SecureBuffer;

pub(crate) struct Cfb {
    direction: Direction,
    register: SecureBuffer,
    pos: usize,
}

impl Cfb {
    pub(crate) fn new(cipher: &dyn BlockCipher, iv: &[u8], direction: Direction) -> Self {
        let mut register = SecureBuffer::from_slice(iv);
        cipher.encrypt_in_place(register.expose_mut());
        Self {
            direction,
            register,
            pos: 0,
        }
    }
}

impl BlockMode for Cfb {
    fn update_len(&self, input_len: usize) -> usize {
        input_len
    }

    fn update(&mut self, cipher: &dyn BlockCipher, input: &[u8], output: &mut [u8]) -> usize {
        let bs = self.register.len();

        for (src, dst) in input.iter().zip(output.iter_mut()) {
            let reg = self.register.expose_mut();
            *dst = src ^ reg[self.pos];
            reg[self.pos] = match self.direction {
                Direction::Encrypt => *dst,
                Direction::Decrypt => *src,
            };

            self.pos += 1;
            if self.pos == bs {
                cipher.encrypt_in_place(reg);
                self.pos = 0;
            }
        }

        input.len()
    }

    fn finalize(&mut self, _cipher: &dyn BlockCipher, _output: &mut [u8]) -> CryptoResult<usize> {
        Ok(0)
    }
}
