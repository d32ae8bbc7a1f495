//! Secure memory for key material and other secrets.
//!
//! A [`SecureBuffer`] owns a fixed heap region that is never reallocated, so
//! no stale copy of its contents is left behind by growth. Release overwrites
//! the region with zeros through `zeroize` (volatile writes plus a compiler
//! fence) and happens deterministically: explicitly through
//! [`SecureBuffer::release`], or on drop along every exit path, including
//! early returns with `?` and unwinding.
//!
//! # Memory locking
//!
//! Buffers may request that their pages be excluded from swap. Locking is
//! best-effort: when the platform refuses, the buffer is still usable and
//! the condition is reported as [`LockStatus::Unavailable`] together with a
//! warning-level log event.

use std::fmt;

use tessera_core::MemoryConfig;
use zeroize::Zeroize;

use crate::error::{CryptoError, CryptoResult};

/// Outcome of the page-locking request made at allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// Locking was not requested.
    NotRequested,
    /// The region is locked in physical memory.
    Locked,
    /// Locking was requested but the platform refused it.
    Unavailable,
}

/// Byte region that is zero-overwritten on release.
///
/// The type is deliberately not `Clone`: duplicating a secret must be an
/// explicit `from_slice` call.
pub struct SecureBuffer {
    data: Box<[u8]>,
    zeroed: bool,
    lock: LockStatus,
}

impl SecureBuffer {
    /// Allocates a zero-filled buffer of `len` bytes.
    pub fn allocate(len: usize) -> Self {
        Self {
            data: vec![0u8; len].into_boxed_slice(),
            zeroed: false,
            lock: LockStatus::NotRequested,
        }
    }

    /// Allocates a buffer and asks the platform to keep it out of swap.
    pub fn allocate_locked(len: usize) -> Self {
        let mut buffer = Self::allocate(len);
        buffer.lock = lock_region(&buffer.data);

        if buffer.lock == LockStatus::Unavailable {
            tracing::warn!(len, "Memory locking unavailable, secure buffer may be paged out");
        }

        buffer
    }

    /// Allocates according to the memory section of the engine configuration.
    pub fn allocate_with(len: usize, config: &MemoryConfig) -> Self {
        if config.lock_pages {
            Self::allocate_locked(len)
        } else {
            Self::allocate(len)
        }
    }

    /// Copies `bytes` into a new buffer. The caller remains responsible for
    /// erasing its own copy.
    pub fn from_slice(bytes: &[u8]) -> Self {
        let mut buffer = Self::allocate(bytes.len());
        buffer.data.copy_from_slice(bytes);
        buffer
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True once the buffer has been released and overwritten.
    pub fn is_released(&self) -> bool {
        self.zeroed
    }

    pub fn lock_status(&self) -> LockStatus {
        self.lock
    }

    /// Copies `bytes` into the buffer starting at `offset`.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) -> CryptoResult<()> {
        self.ensure_live()?;
        let end = self.checked_end(offset, bytes.len())?;
        self.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Borrows `len` bytes starting at `offset` without copying them.
    pub fn read(&self, offset: usize, len: usize) -> CryptoResult<&[u8]> {
        self.ensure_live()?;
        let end = self.checked_end(offset, len)?;
        Ok(&self.data[offset..end])
    }

    /// Copies bytes starting at `offset` into caller-owned scratch space.
    pub fn read_into(&self, offset: usize, dst: &mut [u8]) -> CryptoResult<()> {
        let src = self.read(offset, dst.len())?;
        dst.copy_from_slice(src);
        Ok(())
    }

    /// Whole contents. After release this is the zeroed region.
    pub fn expose(&self) -> &[u8] {
        &self.data
    }

    /// Mutable view of the whole contents.
    pub fn expose_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrites the contents with zeros and unlocks the pages.
    ///
    /// The allocation itself stays owned until drop, so the erased region can
    /// still be inspected. Every call overwrites the region again, so bytes
    /// written through `expose_mut` after a release are erased by the next
    /// release or by drop. The pages are unlocked only once.
    pub fn release(&mut self) {
        self.data[..].zeroize();

        if self.lock == LockStatus::Locked {
            unlock_region(&self.data);
            self.lock = LockStatus::NotRequested;
        }

        self.zeroed = true;
    }

    /// Zeros the contents without releasing the buffer.
    pub fn clear(&mut self) {
        self.data[..].zeroize();
    }

    fn ensure_live(&self) -> CryptoResult<()> {
        if self.zeroed {
            return Err(CryptoError::BufferReleased);
        }
        Ok(())
    }

    fn checked_end(&self, offset: usize, len: usize) -> CryptoResult<usize> {
        match offset.checked_add(len) {
            Some(end) if end <= self.data.len() => Ok(end),
            _ => Err(CryptoError::BufferTooSmall {
                needed: offset.saturating_add(len),
                available: self.data.len(),
            }),
        }
    }
}

impl Drop for SecureBuffer {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SecureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBuffer")
            .field("len", &self.data.len())
            .field("zeroed", &self.zeroed)
            .field("lock", &self.lock)
            .finish_non_exhaustive()
    }
}

/// Erases caller-owned scratch memory (stack arrays, temporary vectors).
pub fn erase(bytes: &mut [u8]) {
    bytes.zeroize();
}

#[cfg(unix)]
fn lock_region(region: &[u8]) -> LockStatus {
    if region.is_empty() {
        return LockStatus::Locked;
    }

    // SAFETY: the pointer and length describe a live heap allocation owned by
    // the buffer; mlock does not read or write through the pointer.
    let rc = unsafe { libc::mlock(region.as_ptr().cast::<libc::c_void>(), region.len()) };
    if rc == 0 {
        LockStatus::Locked
    } else {
        LockStatus::Unavailable
    }
}

#[cfg(unix)]
fn unlock_region(region: &[u8]) {
    if region.is_empty() {
        return;
    }

    // SAFETY: same region that was passed to mlock in lock_region.
    let rc = unsafe { libc::munlock(region.as_ptr().cast::<libc::c_void>(), region.len()) };
    if rc != 0 {
        tracing::debug!(len = region.len(), "munlock failed on release");
    }
}

#[cfg(not(unix))]
fn lock_region(_region: &[u8]) -> LockStatus {
    LockStatus::Unavailable
}

#[cfg(not(unix))]
fn unlock_region(_region: &[u8]) {}
