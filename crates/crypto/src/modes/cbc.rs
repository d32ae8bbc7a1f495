//! Cipher block chaining.
//!
//! Encryption XORs each plaintext block with the previous ciphertext block
//! (the IV for the first) before the primitive runs. Decryption inverts the
//! primitive first, then XORs with the previous ciphertext block, so a
//! corrupted ciphertext block garbles itself and flips the same bits in the
//! following block only.

use super::padding::{finish_decrypt, finish_encrypt, BlockBuffer};
use super::{xor_into, BlockMode, Direction};
use crate::error::CryptoResult;
use crate::primitives::BlockCipher;
use crate::secure_mem::SecureBuffer;

pub(crate) struct Cbc {
    direction: Direction,
    padding: bool,
    iv: SecureBuffer,
    scratch: SecureBuffer,
    buffer: BlockBuffer,
}

impl Cbc {
    pub(crate) fn new(iv: &[u8], direction: Direction, padding: bool) -> Self {
        Self {
            direction,
            padding,
            iv: SecureBuffer::from_slice(iv),
            scratch: SecureBuffer::allocate(iv.len()),
            buffer: BlockBuffer::new(iv.len()),
        }
    }

    fn hold_back(&self) -> bool {
        self.padding && self.direction == Direction::Decrypt
    }
}

fn encrypt_block(cipher: &dyn BlockCipher, iv: &mut SecureBuffer, block: &mut [u8]) {
    xor_into(block, iv.expose());
    cipher.encrypt_in_place(block);
    iv.expose_mut().copy_from_slice(block);
}

fn decrypt_block(
    cipher: &dyn BlockCipher,
    iv: &mut SecureBuffer,
    scratch: &mut SecureBuffer,
    block: &mut [u8],
) {
    scratch.expose_mut().copy_from_slice(block);
    cipher.decrypt_in_place(block);
    xor_into(block, iv.expose());
    iv.expose_mut().copy_from_slice(scratch.expose());
}

impl BlockMode for Cbc {
    fn update_len(&self, input_len: usize) -> usize {
        self.buffer.ready_bytes(input_len, self.hold_back())
    }

    fn update(&mut self, cipher: &dyn BlockCipher, input: &[u8], output: &mut [u8]) -> usize {
        let hold_back = self.hold_back();
        let iv = &mut self.iv;
        let scratch = &mut self.scratch;

        match self.direction {
            Direction::Encrypt => self.buffer.process(input, output, hold_back, |block| {
                encrypt_block(cipher, iv, block)
            }),
            Direction::Decrypt => self.buffer.process(input, output, hold_back, |block| {
                decrypt_block(cipher, iv, scratch, block)
            }),
        }
    }

    fn finalize(&mut self, cipher: &dyn BlockCipher, output: &mut [u8]) -> CryptoResult<usize> {
        let iv = &mut self.iv;

        match self.direction {
            Direction::Encrypt => finish_encrypt(&mut self.buffer, self.padding, output, |block| {
                encrypt_block(cipher, iv, block)
            }),
            // The register is left untouched so a failed finalize can be retried
            Direction::Decrypt => finish_decrypt(&mut self.buffer, self.padding, output, |block| {
                cipher.decrypt_in_place(block);
                xor_into(block, iv.expose());
            }),
        }
    }
}
