//! Modes of operation.
//!
//! A [`ModeEngine`] binds one primitive to one [`Mode`] and runs the
//! `init` / `update` / `finalize` state machine. ECB, CBC, CFB, OFB and CTR
//! drive a block-category primitive; STREAM hands data straight to a
//! stream-category primitive. The mode/category pairing is checked when the
//! engine is constructed.
//!
//! # Output sizes
//!
//! | Mode        | `update` writes                         | `finalize` writes          |
//! |-------------|-----------------------------------------|----------------------------|
//! | ECB, CBC    | whole blocks only, partial data buffered | padded block / stripped tail |
//! | CFB, OFB, CTR, STREAM | exactly the input length       | nothing                    |
//!
//! When decrypting with padding, ECB and CBC hold back the last complete
//! block until `finalize`, since it carries the padding.
//!
//! # Ownership
//!
//! An engine owns its keyed primitive instance and chaining registers, all
//! of which are erased when the engine is re-initialised, finalised or
//! dropped. Engines are `Send` but not `Sync`: one logical operation at a
//! time.

use std::fmt;
use std::str::FromStr;

use crate::error::{CryptoError, CryptoResult};
use crate::primitives::{
    BlockCipher, Category, Params, Primitive, PrimitiveInstance, StreamCipher,
};

mod cbc;
mod cfb;
pub mod ctr;
mod ecb;
mod ofb;
pub mod padding;

pub use ctr::{counter_for_block, increment_counter};

/// Mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Ecb,
    Cbc,
    Cfb,
    Ofb,
    Ctr,
    Stream,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Ecb,
        Mode::Cbc,
        Mode::Cfb,
        Mode::Ofb,
        Mode::Ctr,
        Mode::Stream,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Ecb => "ECB",
            Mode::Cbc => "CBC",
            Mode::Cfb => "CFB",
            Mode::Ofb => "OFB",
            Mode::Ctr => "CTR",
            Mode::Stream => "STREAM",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> CryptoResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CryptoError::UnsupportedMode(name.to_string()))
    }

    pub fn required_category(&self) -> Category {
        match self {
            Mode::Stream => Category::Stream,
            _ => Category::Block,
        }
    }

    pub fn supports_padding(&self) -> bool {
        matches!(self, Mode::Ecb | Mode::Cbc)
    }

    /// Whether `init` requires a block-sized IV.
    pub fn requires_iv(&self) -> bool {
        matches!(self, Mode::Cbc | Mode::Cfb | Mode::Ofb | Mode::Ctr)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Per-engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeOptions {
    /// Byte-count padding; only valid for ECB and CBC.
    pub padding: bool,
}

impl ModeOptions {
    /// Padding on for ECB and CBC, off for every other mode.
    pub fn default_for(mode: Mode) -> Self {
        Self::for_mode(mode, true)
    }

    /// Applies a configured padding default where the mode allows it.
    pub fn for_mode(mode: Mode, default_padding: bool) -> Self {
        Self {
            padding: default_padding && mode.supports_padding(),
        }
    }

    pub fn unpadded() -> Self {
        Self { padding: false }
    }
}

/// Chaining state of a block mode. `update` may assume `output` holds at
/// least `update_len(input.len())` bytes.
pub(crate) trait BlockMode: Send {
    fn update_len(&self, input_len: usize) -> usize;

    fn update(&mut self, cipher: &dyn BlockCipher, input: &[u8], output: &mut [u8]) -> usize;

    fn finalize(&mut self, cipher: &dyn BlockCipher, output: &mut [u8]) -> CryptoResult<usize>;
}

pub(crate) fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}

enum EngineState {
    Block {
        direction: Direction,
        cipher: Box<dyn BlockCipher>,
        chain: Box<dyn BlockMode>,
    },
    Stream {
        direction: Direction,
        cipher: Box<dyn StreamCipher>,
    },
}

impl EngineState {
    fn direction(&self) -> Direction {
        match self {
            EngineState::Block { direction, .. } | EngineState::Stream { direction, .. } => {
                *direction
            }
        }
    }
}

/// A primitive bound to a mode of operation.
pub struct ModeEngine {
    primitive: Primitive,
    mode: Mode,
    options: ModeOptions,
    state: Option<EngineState>,
}

impl ModeEngine {
    /// Pairs `primitive` with `mode`. Fails with `ModeCategoryMismatch` when
    /// the mode needs a different category, and with `InvalidParameter` when
    /// padding is requested for a mode that cannot pad.
    pub fn new(primitive: Primitive, mode: Mode, options: ModeOptions) -> CryptoResult<Self> {
        let category = primitive.category();
        if category != mode.required_category() {
            return Err(CryptoError::ModeCategoryMismatch { mode, category });
        }

        if options.padding {
            if !mode.supports_padding() {
                return Err(CryptoError::InvalidParameter(format!(
                    "padding is not available in {} mode",
                    mode
                )));
            }
            if primitive.descriptor().block_size > padding::MAX_PADDED_BLOCK {
                return Err(CryptoError::InvalidParameter(format!(
                    "{} blocks are too large for byte-count padding",
                    primitive.name()
                )));
            }
        }

        Ok(Self {
            primitive,
            mode,
            options,
            state: None,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn options(&self) -> ModeOptions {
        self.options
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn block_size(&self) -> usize {
        self.primitive.descriptor().block_size
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.state.as_ref().map(EngineState::direction)
    }

    /// Keys the engine and resets all chaining state.
    ///
    /// The IV must be exactly one block for CBC, CFB, OFB and CTR. ECB
    /// ignores it. STREAM accepts none, or one of the length the primitive
    /// declares.
    pub fn init(
        &mut self,
        direction: Direction,
        key: &[u8],
        iv: Option<&[u8]>,
        params: &Params,
    ) -> CryptoResult<()> {
        // Any previous state is erased before re-keying
        self.state = None;

        let iv = self.checked_iv(iv)?;
        let instance = self.primitive.instantiate(key, params)?;

        let state = match instance {
            PrimitiveInstance::Block(cipher) => {
                let chain: Box<dyn BlockMode> = match self.mode {
                    Mode::Ecb => Box::new(ecb::Ecb::new(
                        cipher.block_size(),
                        direction,
                        self.options.padding,
                    )),
                    Mode::Cbc => Box::new(cbc::Cbc::new(iv, direction, self.options.padding)),
                    Mode::Cfb => Box::new(cfb::Cfb::new(cipher.as_ref(), iv, direction)),
                    Mode::Ofb => Box::new(ofb::Ofb::new(cipher.as_ref(), iv)),
                    Mode::Ctr => Box::new(ctr::Ctr::new(cipher.as_ref(), iv)),
                    Mode::Stream => {
                        return Err(CryptoError::ModeCategoryMismatch {
                            mode: self.mode,
                            category: Category::Block,
                        })
                    }
                };
                EngineState::Block {
                    direction,
                    cipher,
                    chain,
                }
            }
            PrimitiveInstance::Stream(mut cipher) => {
                cipher.set_iv(iv)?;
                EngineState::Stream { direction, cipher }
            }
            PrimitiveInstance::Hash(_) => {
                return Err(CryptoError::ModeCategoryMismatch {
                    mode: self.mode,
                    category: Category::Hash,
                })
            }
        };

        tracing::debug!(
            primitive = self.primitive.name(),
            mode = %self.mode,
            direction = %direction,
            padding = self.options.padding,
            "Mode engine initialised"
        );

        self.state = Some(state);
        Ok(())
    }

    /// Largest number of bytes `update` can write for `input_len` bytes of
    /// input in the engine's current state.
    pub fn update_len(&self, input_len: usize) -> usize {
        match &self.state {
            Some(EngineState::Block { chain, .. }) => chain.update_len(input_len),
            _ => input_len,
        }
    }

    /// Largest number of bytes `finalize` can write.
    pub fn final_len(&self) -> usize {
        if self.options.padding {
            self.block_size()
        } else {
            0
        }
    }

    /// Processes `input`, writing to the front of `output`. Returns the
    /// number of bytes written, which may be fewer than the input length
    /// for modes that buffer partial blocks.
    ///
    /// # Panics
    ///
    /// If the engine has not been initialised.
    pub fn update(&mut self, input: &[u8], output: &mut [u8]) -> CryptoResult<usize> {
        match self.state_mut("update") {
            EngineState::Block { cipher, chain, .. } => {
                let needed = chain.update_len(input.len());
                if output.len() < needed {
                    return Err(CryptoError::BufferTooSmall {
                        needed,
                        available: output.len(),
                    });
                }
                Ok(chain.update(cipher.as_ref(), input, output))
            }
            EngineState::Stream { cipher, .. } => cipher.update_stream(input, output),
        }
    }

    /// Flushes buffered data, applying or validating padding.
    ///
    /// On success, and on any failure other than `BufferTooSmall`, the
    /// engine's state is erased and it must be initialised again before
    /// further use. On `InvalidPadding` nothing is written to `output`.
    ///
    /// # Panics
    ///
    /// If the engine has not been initialised.
    pub fn finalize(&mut self, output: &mut [u8]) -> CryptoResult<usize> {
        let result = match self.state_mut("finalize") {
            EngineState::Block { cipher, chain, .. } => chain.finalize(cipher.as_ref(), output),
            EngineState::Stream { .. } => Ok(0),
        };

        match &result {
            Err(CryptoError::BufferTooSmall { .. }) => {}
            Err(CryptoError::InvalidPadding) => {
                tracing::error!(
                    primitive = self.primitive.name(),
                    mode = %self.mode,
                    "Ciphertext rejected during finalization"
                );
                self.state = None;
            }
            _ => self.state = None,
        }

        result
    }

    /// Erases all keyed state without finalising.
    pub fn reset(&mut self) {
        self.state = None;
    }

    fn checked_iv<'a>(&self, iv: Option<&'a [u8]>) -> CryptoResult<&'a [u8]> {
        let descriptor = self.primitive.descriptor();
        let iv = iv.unwrap_or(&[]);

        let expected = match self.mode {
            Mode::Ecb => return Ok(&[]),
            Mode::Stream => descriptor.iv_len,
            _ => descriptor.block_size,
        };

        if iv.len() != expected {
            return Err(CryptoError::InvalidIvSize {
                expected,
                actual: iv.len(),
            });
        }
        Ok(iv)
    }

    fn state_mut(&mut self, op: &str) -> &mut EngineState {
        match self.state.as_mut() {
            Some(state) => state,
            None => panic!(
                "ModeEngine::{} called before init ({} / {})",
                op,
                self.primitive.name(),
                self.mode
            ),
        }
    }
}

impl fmt::Debug for ModeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeEngine")
            .field("primitive", &self.primitive.name())
            .field("mode", &self.mode)
            .field("options", &self.options)
            .field("direction", &self.direction())
            .finish()
    }
}
