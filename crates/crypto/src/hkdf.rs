//! HKDF (RFC 5869) extract-and-expand over the generic HMAC.

use crate::error::{CryptoError, CryptoResult};
use crate::hmac::Hmac;
use crate::primitives::{Params, Primitive};
use crate::secure_mem::{erase, SecureBuffer};

const MAX_BLOCKS: usize = 255;

/// Derives `out.len()` bytes from `ikm`. An empty `salt` stands for a
/// hash-length string of zeros.
///
/// `out` holds no derived bytes when an error is returned.
pub fn hkdf(
    primitive: &Primitive,
    params: &Params,
    ikm: &[u8],
    salt: &[u8],
    info: &[u8],
    out: &mut [u8],
) -> CryptoResult<()> {
    let result = hkdf_extract(primitive, params, salt, ikm)
        .and_then(|prk| hkdf_expand(primitive, params, prk.expose(), info, out));
    if result.is_err() {
        erase(out);
    }
    result
}

/// Computes the pseudorandom key `HMAC(salt, ikm)`.
pub fn hkdf_extract(
    primitive: &Primitive,
    params: &Params,
    salt: &[u8],
    ikm: &[u8],
) -> CryptoResult<SecureBuffer> {
    // HMAC zero-pads short keys, so an empty salt already acts as HashLen zeros.
    let mut mac = Hmac::new(primitive, params, salt)?;
    mac.update(ikm);
    let mut prk = SecureBuffer::allocate(mac.mac_len());
    mac.finalize(prk.expose_mut())?;
    Ok(prk)
}

/// Expands `prk` into `out.len()` bytes bound to `info`.
///
/// Fails with `InvalidParameter` for an empty output, an output longer than
/// 255 hash blocks, or a `prk` shorter than the hash output.
pub fn hkdf_expand(
    primitive: &Primitive,
    params: &Params,
    prk: &[u8],
    info: &[u8],
    out: &mut [u8],
) -> CryptoResult<()> {
    if out.is_empty() {
        return Err(CryptoError::InvalidParameter(
            "hkdf output length must be non-zero".to_string(),
        ));
    }

    let mut mac = Hmac::new(primitive, params, prk)?;
    let h_len = mac.mac_len();
    if prk.len() < h_len {
        return Err(CryptoError::InvalidParameter(format!(
            "hkdf pseudorandom key of {} bytes is shorter than the {}-byte hash",
            prk.len(),
            h_len
        )));
    }
    if out.len() > MAX_BLOCKS * h_len {
        return Err(CryptoError::InvalidParameter(format!(
            "hkdf output of {} bytes exceeds {} bytes",
            out.len(),
            MAX_BLOCKS * h_len
        )));
    }

    let mut t = SecureBuffer::allocate(h_len);
    for (index, chunk) in out.chunks_mut(h_len).enumerate() {
        if index > 0 {
            mac.update(t.expose());
        }
        mac.update(info);
        mac.update(&[(index + 1) as u8]);
        mac.finalize(t.expose_mut())?;
        chunk.copy_from_slice(&t.expose()[..chunk.len()]);
    }

    Ok(())
}
