//! Output feedback. The register is repeatedly encrypted and its output is
//! the keystream, independent of the data, so encryption and decryption are
//! the same operation.

use super::BlockMode;
use crate::error::CryptoResult;
use crate::primitives::BlockCipher;
use crate::secure_mem::SecureBuffer;

pub(crate) struct Ofb {
    keystream: SecureBuffer,
    pos: usize,
}

impl Ofb {
    pub(crate) fn new(cipher: &dyn BlockCipher, iv: &[u8]) -> Self {
        let mut keystream = SecureBuffer::from_slice(iv);
        cipher.encrypt_in_place(keystream.expose_mut());
        Self { keystream, pos: 0 }
    }
}

impl BlockMode for Ofb {
    fn update_len(&self, input_len: usize) -> usize {
        input_len
    }

    fn update(&mut self, cipher: &dyn BlockCipher, input: &[u8], output: &mut [u8]) -> usize {
        let bs = self.keystream.len();

        for (src, dst) in input.iter().zip(output.iter_mut()) {
            let ks = self.keystream.expose_mut();
            *dst = src ^ ks[self.pos];

            self.pos += 1;
            if self.pos == bs {
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
