//! Partial-block buffering and byte-count padding for ECB and CBC.
//!
//! Padding appends `n` bytes of value `n`, `1 <= n <= block_size`, so a
//! padded message always grows by at least one byte. Validation on decrypt
//! inspects every byte of the final block regardless of where a mismatch
//! occurs.

use crate::error::{CryptoError, CryptoResult};
use crate::secure_mem::SecureBuffer;

/// Largest block size byte-count padding can express.
pub const MAX_PADDED_BLOCK: usize = 255;

/// Bytes carried between `update` calls until a whole block is available.
pub(crate) struct BlockBuffer {
    data: SecureBuffer,
    len: usize,
}

impl BlockBuffer {
    pub(crate) fn new(block_size: usize) -> Self {
        Self {
            data: SecureBuffer::allocate(block_size),
            len: 0,
        }
    }

    fn block_size(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of bytes `process` will emit for `input_len` more bytes.
    /// With `hold_back` the last complete block stays buffered.
    pub(crate) fn ready_bytes(&self, input_len: usize, hold_back: bool) -> usize {
        let bs = self.block_size();
        let total = self.len + input_len;
        let blocks = if hold_back {
            total.saturating_sub(1) / bs
        } else {
            total / bs
        };
        blocks * bs
    }

    /// Moves whole blocks into `output`, running `transform` on each in
    /// place. `output` must hold at least `ready_bytes` bytes.
    pub(crate) fn process(
        &mut self,
        input: &[u8],
        output: &mut [u8],
        hold_back: bool,
        mut transform: impl FnMut(&mut [u8]),
    ) -> usize {
        let bs = self.block_size();
        let emit = self.ready_bytes(input.len(), hold_back);

        let mut consumed = 0;
        let mut written = 0;
        while written < emit {
            let need = bs - self.len;
            let pending = self.data.expose_mut();
            pending[self.len..].copy_from_slice(&input[consumed..consumed + need]);
            consumed += need;
            self.len = 0;

            let block = &mut output[written..written + bs];
            block.copy_from_slice(pending);
            transform(block);
            written += bs;
        }

        let rest = &input[consumed..];
        self.data.expose_mut()[self.len..self.len + rest.len()].copy_from_slice(rest);
        self.len += rest.len();
        written
    }

    pub(crate) fn clear(&mut self) {
        self.data.clear();
        self.len = 0;
    }
}

/// Completes encryption: pads and emits the last block, or fails when
/// padding is off and a partial block remains.
pub(crate) fn finish_encrypt(
    buffer: &mut BlockBuffer,
    padding: bool,
    output: &mut [u8],
    transform: impl FnOnce(&mut [u8]),
) -> CryptoResult<usize> {
    let bs = buffer.block_size();

    if !padding {
        return match buffer.len() {
            0 => Ok(0),
            len => Err(CryptoError::LeftoverInput { len }),
        };
    }

    if output.len() < bs {
        return Err(CryptoError::BufferTooSmall {
            needed: bs,
            available: output.len(),
        });
    }

    let pad = bs - buffer.len();
    let block = &mut output[..bs];
    block[..buffer.len()].copy_from_slice(&buffer.data.expose()[..buffer.len()]);
    block[buffer.len()..].fill(pad as u8);
    transform(block);

    buffer.clear();
    Ok(bs)
}

/// Completes decryption: inverts the held-back block and strips padding.
/// Nothing is written to `output` unless the padding is valid.
pub(crate) fn finish_decrypt(
    buffer: &mut BlockBuffer,
    padding: bool,
    output: &mut [u8],
    transform: impl FnOnce(&mut [u8]),
) -> CryptoResult<usize> {
    let bs = buffer.block_size();

    if !padding {
        return match buffer.len() {
            0 => Ok(0),
            len => Err(CryptoError::LeftoverInput { len }),
        };
    }

    if buffer.len() != bs {
        return Err(CryptoError::InvalidPadding);
    }

    let mut block = SecureBuffer::from_slice(buffer.data.expose());
    transform(block.expose_mut());

    let Some(data_len) = strip_padding(block.expose()) else {
        return Err(CryptoError::InvalidPadding);
    };

    if output.len() < data_len {
        return Err(CryptoError::BufferTooSmall {
            needed: data_len,
            available: output.len(),
        });
    }

    output[..data_len].copy_from_slice(&block.expose()[..data_len]);
    buffer.clear();
    Ok(data_len)
}

/// Returns the unpadded length of `block`, or `None` if the padding is
/// malformed. Every byte is examined whatever the outcome.
pub fn strip_padding(block: &[u8]) -> Option<usize> {
    let bs = block.len();
    if bs == 0 {
        return None;
    }

    let pad = block[bs - 1] as usize;
    let mut bad = u8::from(pad == 0) | u8::from(pad > bs);
    let start = bs.saturating_sub(pad);

    for (i, &b) in block.iter().enumerate() {
        let in_pad = u8::from(i >= start);
        bad |= in_pad & u8::from(b as usize != pad);
    }

    if bad == 0 {
        Some(bs - pad)
    } else {
        None
    }
}
