//! Single-call encryption helpers.
//!
//! Each call builds a [`ModeEngine`] from a [`Registry`], runs
//! init / update / finalize over the whole input and returns the result.
//! If any step fails, whatever output had been produced is erased before
//! the error is returned.

use zeroize::{Zeroize, Zeroizing};

use crate::error::CryptoResult;
use crate::modes::{Direction, Mode, ModeOptions};
use crate::primitives::Params;
use crate::registry::Registry;

/// Description of a block-mode encryption or decryption. Not `Debug`, since
/// it borrows the key.
#[derive(Clone)]
pub struct BlockCipherJob<'a> {
    pub primitive: &'a str,
    pub mode: Mode,
    pub key: &'a [u8],
    pub iv: Option<&'a [u8]>,
    pub params: Params,
    /// `None` uses the registry's default for the mode.
    pub padding: Option<bool>,
}

impl<'a> BlockCipherJob<'a> {
    pub fn new(primitive: &'a str, mode: Mode, key: &'a [u8], iv: Option<&'a [u8]>) -> Self {
        Self {
            primitive,
            mode,
            key,
            iv,
            params: Params::None,
            padding: None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn with_padding(mut self, padding: bool) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn encrypt(&self, registry: &Registry, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        self.run(registry, Direction::Encrypt, plaintext)
    }

    pub fn decrypt(
        &self,
        registry: &Registry,
        ciphertext: &[u8],
    ) -> CryptoResult<Zeroizing<Vec<u8>>> {
        self.run(registry, Direction::Decrypt, ciphertext)
            .map(Zeroizing::new)
    }

    fn run(&self, registry: &Registry, direction: Direction, input: &[u8]) -> CryptoResult<Vec<u8>> {
        let options = match self.padding {
            Some(padding) => ModeOptions { padding },
            None => registry.default_options(self.mode),
        };
        let mut engine = registry.engine_with(self.primitive, self.mode, options)?;
        engine.init(direction, self.key, self.iv, &self.params)?;

        let mut out = vec![0u8; engine.update_len(input.len()) + engine.final_len()];
        let result = engine.update(input, &mut out).and_then(|written| {
            let tail = engine.finalize(&mut out[written..])?;
            Ok(written + tail)
        });

        match result {
            Ok(len) => {
                out[len..].zeroize();
                out.truncate(len);
                Ok(out)
            }
            Err(e) => {
                out.zeroize();
                Err(e)
            }
        }
    }
}

/// Encrypts or decrypts `data` in place with a stream primitive.
pub fn apply_stream(
    registry: &Registry,
    primitive: &str,
    key: &[u8],
    params: &Params,
    data: &mut [u8],
) -> CryptoResult<()> {
    let mut engine = registry.engine_with(primitive, Mode::Stream, ModeOptions::unpadded())?;
    engine.init(Direction::Encrypt, key, None, params)?;

    let input = Zeroizing::new(data.to_vec());
    if let Err(e) = engine.update(&input, data) {
        data.zeroize();
        return Err(e);
    }
    Ok(())
}
