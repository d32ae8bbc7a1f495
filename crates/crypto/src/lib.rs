//! Cryptographic primitives and modes of operation for Tessera.
//!
//! This crate combines interchangeable ciphers and hash functions with
//! generic modes of operation, keeping every secret it touches in memory
//! that is erased deterministically on release.
//!
//! # Core Capabilities
//!
//! - **Secure Memory**: [`SecureBuffer`] zero-overwrites its contents on
//!   release and drop, with optional page locking
//! - **Random Sources**: OS entropy ([`SystemRandom`]) and a deterministic
//!   generator for reproducible tests ([`SeededRandom`])
//! - **Primitives**: block, stream and hash units behind uniform traits
//! - **Modes of Operation**: ECB, CBC, CFB, OFB, CTR and STREAM through
//!   [`ModeEngine`]
//! - **Registry**: explicit name-based lookup; no global state
//! - **Digests, HMAC, PBKDF2, HKDF** over any registered hash
//!
//! # Supported Algorithms
//!
//! - **Block**: AES-128/192/256, Threefish-256, NullCipher (identity, for testing)
//! - **Stream**: RC4 with configurable keystream discard
//! - **Hashing**: SHA-256, BLAKE3, Skein-256 (variable output), plus SHA-1
//!   and MD5 for legacy data
//! - **Key Derivation**: PBKDF2 and HKDF over any registered hash
//!
//! # Example
//!
//! ```
//! use tessera_crypto::{Direction, Params, Registry};
//!
//! let registry = Registry::with_defaults();
//! let mut engine = registry.engine("threefish256", "CBC").unwrap();
//! engine
//!     .init(Direction::Encrypt, &[7u8; 32], Some(&[0u8; 32]), &Params::None)
//!     .unwrap();
//!
//! let mut out = vec![0u8; 64];
//! let n = engine.update(b"attack at dawn", &mut out).unwrap();
//! let n = n + engine.finalize(&mut out[n..]).unwrap();
//! assert_eq!(n, 32);
//! ```
//!
//! # Security Principles
//!
//! - Key material never appears in logs or `Debug` output
//! - Key schedules and chaining registers are zeroized when dropped
//! - Padding is validated with constant effort and never yields partial
//!   plaintext alongside an error

pub mod digest;
pub mod error;
pub mod hkdf;
pub mod hmac;
pub mod modes;
pub mod oneshot;
pub mod pbkdf2;
pub mod primitives;
pub mod random;
pub mod registry;
pub mod secure_mem;

#[cfg(test)]
mod test_vectors;

pub use digest::{digest, Digest};
pub use error::{CryptoError, CryptoResult};
pub use self::hkdf::{hkdf, hkdf_expand, hkdf_extract};
pub use self::hmac::{hmac, Hmac};
pub use modes::{counter_for_block, increment_counter, Direction, Mode, ModeEngine, ModeOptions};
pub use oneshot::{apply_stream, BlockCipherJob};
pub use pbkdf2::pbkdf2;
pub use primitives::{
    BlockCipher, Category, HashFunction, KeySizes, Params, Primitive, PrimitiveDescriptor,
    PrimitiveFactory, PrimitiveInstance, QueryKind, StreamCipher,
};
pub use random::{generate_iv, generate_key, RandomSource, SeededRandom, SystemRandom};
pub use registry::Registry;
pub use secure_mem::{erase, LockStatus, SecureBuffer};

pub use tessera_core::{version, VersionInfo};
