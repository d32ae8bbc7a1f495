//! PBKDF2 (RFC 8018) key derivation over the generic HMAC.

use crate::error::{CryptoError, CryptoResult};
use crate::hmac::Hmac;
use crate::primitives::{Params, Primitive};
use crate::secure_mem::{erase, SecureBuffer};

/// Derives `out.len()` bytes from `password` and `salt`.
///
/// Fails with `InvalidParameter` for zero iterations, an empty output, or an
/// output longer than `(2^32 - 1)` hash blocks. `out` holds no derived bytes
/// when an error is returned.
pub fn pbkdf2(
    primitive: &Primitive,
    params: &Params,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    out: &mut [u8],
) -> CryptoResult<()> {
    if iterations == 0 {
        return Err(CryptoError::InvalidParameter(
            "pbkdf2 needs at least one iteration".to_string(),
        ));
    }
    if out.is_empty() {
        return Err(CryptoError::InvalidParameter(
            "pbkdf2 output length must be non-zero".to_string(),
        ));
    }

    let result = derive(primitive, params, password, salt, iterations, out);
    if result.is_err() {
        erase(out);
    }
    result
}

fn derive(
    primitive: &Primitive,
    params: &Params,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    out: &mut [u8],
) -> CryptoResult<()> {
    let mut mac = Hmac::new(primitive, params, password)?;
    let h_len = mac.mac_len();

    let blocks = out.len().div_ceil(h_len);
    if blocks as u64 > u32::MAX as u64 {
        return Err(CryptoError::InvalidParameter(format!(
            "pbkdf2 output of {} bytes is too long",
            out.len()
        )));
    }

    let mut u = SecureBuffer::allocate(h_len);
    let mut t = SecureBuffer::allocate(h_len);

    for (index, chunk) in out.chunks_mut(h_len).enumerate() {
        let block_number = (index as u32) + 1;

        mac.update(salt);
        mac.update(&block_number.to_be_bytes());
        mac.finalize(u.expose_mut())?;
        t.expose_mut().copy_from_slice(u.expose());

        for _ in 1..iterations {
            mac.update(u.expose());
            mac.finalize(u.expose_mut())?;
            for (acc, b) in t.expose_mut().iter_mut().zip(u.expose()) {
                *acc ^= b;
            }
        }

        chunk.copy_from_slice(&t.expose()[..chunk.len()]);
    }

    Ok(())
}
