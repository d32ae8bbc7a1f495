//! Primitive abstraction layer.
//!
//! A primitive is a cipher or hash unit behind one of three capability
//! traits: [`BlockCipher`], [`StreamCipher`] or [`HashFunction`]. Each
//! primitive is described by an immutable [`PrimitiveDescriptor`] and built
//! by a factory from a key and [`Params`]. The mode engine only ever sees the
//! trait objects, so no primitive-specific branching leaks into it.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};

pub mod aes_cipher;
pub mod blake3_hash;
pub mod md5_hash;
pub mod null_cipher;
pub mod rc4;
pub mod sha1_hash;
pub mod sha256;
pub mod skein256;
pub mod threefish256;

/// Capability set of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Block,
    Stream,
    Hash,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Block => "block",
            Category::Stream => "stream",
            Category::Hash => "hash",
        };
        f.write_str(name)
    }
}

/// Key lengths a primitive accepts, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySizes {
    /// An explicit list, sorted ascending.
    Fixed(&'static [usize]),
    /// Every length in `min..=max`.
    Range { min: usize, max: usize },
}

impl KeySizes {
    pub fn contains(&self, len: usize) -> bool {
        match *self {
            KeySizes::Fixed(sizes) => sizes.contains(&len),
            KeySizes::Range { min, max } => (min..=max).contains(&len),
        }
    }

    /// Nearest supported length: the smallest one not below `len`, or the
    /// largest one if `len` exceeds them all.
    pub fn nearest(&self, len: usize) -> usize {
        match *self {
            KeySizes::Fixed(sizes) => sizes
                .iter()
                .copied()
                .find(|&s| s >= len)
                .or_else(|| sizes.last().copied())
                .unwrap_or(0),
            KeySizes::Range { min, max } => len.clamp(min, max),
        }
    }
}

/// What [`PrimitiveDescriptor::query`] should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Cipher block size; 0 for stream and hash primitives.
    BlockSize,
    /// Nearest supported key length to the given one.
    KeyLength(usize),
    /// Default digest length; 0 for ciphers.
    DigestLength,
    /// Input block length of a hash; 0 for ciphers.
    HashBlockSize,
    /// Size of the per-instance state.
    ContextSize,
    /// IV length the primitive itself requires under STREAM mode.
    IvLength,
}

/// Immutable description of a registered primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveDescriptor {
    pub name: &'static str,
    pub category: Category,
    pub block_size: usize,
    pub key_sizes: KeySizes,
    pub digest_size: usize,
    pub hash_block_size: usize,
    pub context_size: usize,
    pub iv_len: usize,
}

impl PrimitiveDescriptor {
    pub fn block(
        name: &'static str,
        block_size: usize,
        key_sizes: KeySizes,
        context_size: usize,
    ) -> Self {
        Self {
            name,
            category: Category::Block,
            block_size,
            key_sizes,
            digest_size: 0,
            hash_block_size: 0,
            context_size,
            iv_len: 0,
        }
    }

    pub fn stream(name: &'static str, key_sizes: KeySizes, context_size: usize) -> Self {
        Self {
            name,
            category: Category::Stream,
            block_size: 0,
            key_sizes,
            digest_size: 0,
            hash_block_size: 0,
            context_size,
            iv_len: 0,
        }
    }

    pub fn hash(
        name: &'static str,
        digest_size: usize,
        hash_block_size: usize,
        context_size: usize,
    ) -> Self {
        Self {
            name,
            category: Category::Hash,
            block_size: 0,
            key_sizes: KeySizes::Fixed(&[0]),
            digest_size,
            hash_block_size,
            context_size,
            iv_len: 0,
        }
    }

    pub fn query(&self, kind: QueryKind) -> usize {
        match kind {
            QueryKind::BlockSize => self.block_size,
            QueryKind::KeyLength(len) => self.key_sizes.nearest(len),
            QueryKind::DigestLength => self.digest_size,
            QueryKind::HashBlockSize => self.hash_block_size,
            QueryKind::ContextSize => self.context_size,
            QueryKind::IvLength => self.iv_len,
        }
    }

    /// Sets the IV length a stream primitive expects under STREAM mode.
    pub fn with_iv_len(mut self, iv_len: usize) -> Self {
        self.iv_len = iv_len;
        self
    }

    /// Fails with `InvalidKeySize` when `len` is not a supported key length.
    pub fn check_key(&self, len: usize) -> CryptoResult<()> {
        if self.key_sizes.contains(len) {
            Ok(())
        } else {
            Err(CryptoError::InvalidKeySize {
                primitive: self.name.to_string(),
                len,
            })
        }
    }
}

/// Primitive-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Params {
    #[default]
    None,
    Threefish256 {
        tweak: [u8; 16],
    },
    Rc4 {
        /// Keystream bytes discarded after key setup.
        drop: usize,
    },
    Skein256 {
        /// Digest length in bytes.
        output_len: usize,
    },
}

impl Params {
    pub(crate) fn unsupported(&self, primitive: &str) -> CryptoError {
        CryptoError::InvalidParameter(format!("{:?} not accepted by {}", self, primitive))
    }
}

/// Block-category primitive: a keyed permutation on fixed-size blocks.
pub trait BlockCipher: Send {
    fn block_size(&self) -> usize;

    /// Encrypts one block in place. `block.len()` must equal `block_size()`.
    fn encrypt_in_place(&self, block: &mut [u8]);

    /// Decrypts one block in place. `block.len()` must equal `block_size()`.
    fn decrypt_in_place(&self, block: &mut [u8]);

    fn encrypt_block(&self, input: &[u8], output: &mut [u8]) -> CryptoResult<()> {
        copy_block(self.block_size(), input, output)?;
        self.encrypt_in_place(output);
        Ok(())
    }

    fn decrypt_block(&self, input: &[u8], output: &mut [u8]) -> CryptoResult<()> {
        copy_block(self.block_size(), input, output)?;
        self.decrypt_in_place(output);
        Ok(())
    }
}

fn copy_block(bs: usize, input: &[u8], output: &mut [u8]) -> CryptoResult<()> {
    if input.len() != bs {
        return Err(CryptoError::InvalidParameter(format!(
            "block input must be {} bytes, got {}",
            bs,
            input.len()
        )));
    }
    if output.len() != bs {
        return Err(CryptoError::BufferTooSmall {
            needed: bs,
            available: output.len(),
        });
    }
    output.copy_from_slice(input);
    Ok(())
}

/// Stream-category primitive: a keystream generator of arbitrary length.
pub trait StreamCipher: Send {
    /// XORs the next `data.len()` keystream bytes into `data`.
    fn apply_keystream(&mut self, data: &mut [u8]);

    /// Positions the keystream for a message IV. The length has already been
    /// checked against the descriptor's `iv_len`; primitives without an IV
    /// accept only an empty one.
    fn set_iv(&mut self, iv: &[u8]) -> CryptoResult<()> {
        if iv.is_empty() {
            Ok(())
        } else {
            Err(CryptoError::InvalidIvSize {
                expected: 0,
                actual: iv.len(),
            })
        }
    }

    /// Writes `input` XOR keystream into the front of `output`.
    fn update_stream(&mut self, input: &[u8], output: &mut [u8]) -> CryptoResult<usize> {
        if output.len() < input.len() {
            return Err(CryptoError::BufferTooSmall {
                needed: input.len(),
                available: output.len(),
            });
        }
        let out = &mut output[..input.len()];
        out.copy_from_slice(input);
        self.apply_keystream(out);
        Ok(input.len())
    }
}

/// Hash-category primitive.
pub trait HashFunction: Send {
    fn digest_len(&self) -> usize;

    fn block_len(&self) -> usize;

    fn update(&mut self, data: &[u8]);

    /// Writes the digest to the front of `out` and resets the state.
    fn finalize_into(&mut self, out: &mut [u8]) -> CryptoResult<usize>;

    /// Returns to the freshly initialised state.
    fn reset(&mut self);
}

/// Checks a digest output region, shared by hash implementations.
pub(crate) fn check_digest_out(needed: usize, out: &[u8]) -> CryptoResult<()> {
    if out.len() < needed {
        return Err(CryptoError::BufferTooSmall {
            needed,
            available: out.len(),
        });
    }
    Ok(())
}

/// A keyed primitive instance, exclusively owned by whoever created it.
pub enum PrimitiveInstance {
    Block(Box<dyn BlockCipher>),
    Stream(Box<dyn StreamCipher>),
    Hash(Box<dyn HashFunction>),
}

impl PrimitiveInstance {
    pub fn category(&self) -> Category {
        match self {
            PrimitiveInstance::Block(_) => Category::Block,
            PrimitiveInstance::Stream(_) => Category::Stream,
            PrimitiveInstance::Hash(_) => Category::Hash,
        }
    }
}

impl fmt::Debug for PrimitiveInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimitiveInstance({})", self.category())
    }
}

/// Builds an instance from a key already checked against the descriptor.
pub type PrimitiveFactory =
    Arc<dyn Fn(&[u8], &Params) -> CryptoResult<PrimitiveInstance> + Send + Sync>;

/// Descriptor plus factory, the unit a registry stores.
#[derive(Clone)]
pub struct Primitive {
    descriptor: PrimitiveDescriptor,
    factory: PrimitiveFactory,
}

impl Primitive {
    pub fn new(descriptor: PrimitiveDescriptor, factory: PrimitiveFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }

    pub fn descriptor(&self) -> &PrimitiveDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn category(&self) -> Category {
        self.descriptor.category
    }

    pub fn query(&self, kind: QueryKind) -> usize {
        self.descriptor.query(kind)
    }

    /// Validates the key length, then runs the factory.
    pub fn instantiate(&self, key: &[u8], params: &Params) -> CryptoResult<PrimitiveInstance> {
        self.descriptor.check_key(key.len())?;
        let instance = (self.factory)(key, params)?;

        if instance.category() != self.descriptor.category {
            return Err(CryptoError::InvalidParameter(format!(
                "factory for {} produced a {} instance",
                self.descriptor.name,
                instance.category()
            )));
        }

        Ok(instance)
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Primitive")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Every primitive shipped with the library. `rc4_drop` is the keystream
/// discard RC4 applies when no explicit parameter is given.
pub fn builtin(rc4_drop: usize) -> Vec<Primitive> {
    vec![
        null_cipher::primitive(),
        aes_cipher::primitive(),
        threefish256::primitive(),
        rc4::primitive(rc4_drop),
        sha256::primitive(),
        sha1_hash::primitive(),
        md5_hash::primitive(),
        blake3_hash::primitive(),
        skein256::primitive(),
    ]
}
