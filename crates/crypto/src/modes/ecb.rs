//! Electronic codebook mode: every block is transformed independently.

use super::padding::{finish_decrypt, finish_encrypt, BlockBuffer};
use super::{BlockMode, Direction};
use crate::error::CryptoResult;
use crate::primitives::BlockCipher;

pub(crate) struct Ecb {
    direction: Direction,
    padding: bool,
    buffer: BlockBuffer,
}

impl Ecb {
    pub(crate) fn new(block_size: usize, direction: Direction, padding: bool) -> Self {
        Self {
            direction,
            padding,
            buffer: BlockBuffer::new(block_size),
        }
    }

    fn hold_back(&self) -> bool {
        self.padding && self.direction == Direction::Decrypt
    }
}

impl BlockMode for Ecb {
    fn update_len(&self, input_len: usize) -> usize {
        self.buffer.ready_bytes(input_len, self.hold_back())
    }

    fn update(&mut self, cipher: &dyn BlockCipher, input: &[u8], output: &mut [u8]) -> usize {
        let hold_back = self.hold_back();
        match self.direction {
            Direction::Encrypt => self.buffer.process(input, output, hold_back, |block| {
                cipher.encrypt_in_place(block)
            }),
            Direction::Decrypt => self.buffer.process(input, output, hold_back, |block| {
                cipher.decrypt_in_place(block)
            }),
        }
    }

    fn finalize(&mut self, cipher: &dyn BlockCipher, output: &mut [u8]) -> CryptoResult<usize> {
        match self.direction {
            Direction::Encrypt => finish_encrypt(&mut self.buffer, self.padding, output, |block| {
                cipher.encrypt_in_place(block)
            }),
            Direction::Decrypt => finish_decrypt(&mut self.buffer, self.padding, output, |block| {
                cipher.decrypt_in_place(block)
            }),
        }
    }
}
