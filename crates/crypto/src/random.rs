//! Cryptographically secure random sources for keys and IVs.
//!
//! [`SystemRandom`] reads operating system entropy and is the only source
//! suitable for production key material. [`SeededRandom`] is a deterministic
//! generator for reproducible test runs. Neither falls back to a weaker
//! source: when the OS cannot deliver, the call fails with
//! [`CryptoError::EntropyUnavailable`].

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tessera_core::{RandomConfig, RandomSourceKind};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};
use crate::secure_mem::SecureBuffer;

const RESEED_CONTEXT: &str = "tessera 2026 random-source reseed";

/// Source of cryptographically secure bytes.
pub trait RandomSource: Send {
    /// Fills `buf` completely or fails.
    fn fill(&mut self, buf: &mut [u8]) -> CryptoResult<()>;

    /// Mixes caller material into the source, or refreshes it from the OS
    /// when `material` is `None`.
    fn reseed(&mut self, material: Option<&[u8]>) -> CryptoResult<()>;

    /// Fills the whole of a secure buffer.
    fn fill_buffer(&mut self, buf: &mut SecureBuffer) -> CryptoResult<()> {
        if buf.is_released() {
            return Err(CryptoError::BufferReleased);
        }
        self.fill(buf.expose_mut())
    }
}

/// Operating system entropy via `getrandom`.
#[derive(Default, Zeroize, ZeroizeOnDrop)]
pub struct SystemRandom {
    mix_key: Option<[u8; 32]>,
    mix_counter: u64,
}

impl SystemRandom {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomSource for SystemRandom {
    fn fill(&mut self, buf: &mut [u8]) -> CryptoResult<()> {
        os_fill(buf)?;

        if let Some(key) = &self.mix_key {
            // XOR a keyed BLAKE3 stream over the OS bytes; the OS output
            // alone already carries full entropy.
            let mut hasher = blake3::Hasher::new_keyed(key);
            hasher.update(&self.mix_counter.to_le_bytes());
            let mut stream = vec![0u8; buf.len()];
            hasher.finalize_xof().fill(&mut stream);

            for (b, s) in buf.iter_mut().zip(stream.iter()) {
                *b ^= s;
            }
            stream.zeroize();
            self.mix_counter = self.mix_counter.wrapping_add(1);
        }

        Ok(())
    }

    fn reseed(&mut self, material: Option<&[u8]>) -> CryptoResult<()> {
        let Some(material) = material else {
            // The OS pool is consulted on every fill; nothing to refresh.
            return Ok(());
        };

        let mut hasher = blake3::Hasher::new_derive_key(RESEED_CONTEXT);
        if let Some(previous) = &self.mix_key {
            hasher.update(previous);
        }
        hasher.update(material);
        self.mix_key = Some(*hasher.finalize().as_bytes());
        self.mix_counter = 0;
        Ok(())
    }
}

/// Deterministic generator for reproducible tests. Never use for real keys.
pub struct SeededRandom {
    rng: StdRng,
    seed: [u8; 32],
}

impl SeededRandom {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: StdRng::from_seed(seed),
            seed,
        }
    }

    fn rekey(&mut self, seed: [u8; 32]) {
        self.seed.zeroize();
        self.seed = seed;
        self.rng = StdRng::from_seed(seed);
    }
}

impl RandomSource for SeededRandom {
    fn fill(&mut self, buf: &mut [u8]) -> CryptoResult<()> {
        self.rng.fill_bytes(buf);
        Ok(())
    }

    fn reseed(&mut self, material: Option<&[u8]>) -> CryptoResult<()> {
        let next = match material {
            Some(material) => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(&self.seed);
                hasher.update(material);
                *hasher.finalize().as_bytes()
            }
            None => {
                let mut fresh = [0u8; 32];
                os_fill(&mut fresh)?;
                fresh
            }
        };
        self.rekey(next);
        Ok(())
    }
}

impl Drop for SeededRandom {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

/// Builds the source selected in configuration.
pub fn from_config(config: &RandomConfig) -> CryptoResult<Box<dyn RandomSource>> {
    match config.source {
        RandomSourceKind::System => Ok(Box::new(SystemRandom::new())),
        RandomSourceKind::Seeded => {
            let seed = config
                .seed_bytes()
                .map_err(|e| CryptoError::InvalidParameter(e.to_string()))?
                .ok_or_else(|| {
                    CryptoError::InvalidParameter("seeded random source without seed".to_string())
                })?;
            tracing::warn!("Using deterministic seeded random source");
            Ok(Box::new(SeededRandom::from_seed(seed)))
        }
    }
}

/// Generates `len` bytes of key material into a secure buffer.
pub fn generate_key(source: &mut dyn RandomSource, len: usize) -> CryptoResult<SecureBuffer> {
    let mut key = SecureBuffer::allocate(len);
    source.fill_buffer(&mut key)?;
    Ok(key)
}

/// Generates an IV of `len` bytes. IVs are not secret but are kept in secure
/// memory alongside the key they accompany.
pub fn generate_iv(source: &mut dyn RandomSource, len: usize) -> CryptoResult<SecureBuffer> {
    generate_key(source, len)
}

fn os_fill(buf: &mut [u8]) -> CryptoResult<()> {
    getrandom::getrandom(buf).map_err(|e| {
        tracing::error!(error = %e, len = buf.len(), "OS entropy source failed");
        CryptoError::EntropyUnavailable(e.to_string())
    })
}
