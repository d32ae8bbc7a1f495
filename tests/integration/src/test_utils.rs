//! Test utilities for the integration suites

use serde::Deserialize;
use std::sync::Once;
use tessera_crypto::{CryptoResult, Direction, ModeEngine, Params};

static TRACING: Once = Once::new();

/// Route engine logs to the test harness's captured output.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Optional primitive parameters as they appear in vector files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VectorParams {
    pub tweak_hex: Option<String>,
    pub rc4_drop: Option<usize>,
    pub output_len: Option<usize>,
}

impl VectorParams {
    pub fn to_params(&self, primitive: &str) -> Params {
        match primitive {
            "threefish256" => match &self.tweak_hex {
                Some(tweak) => {
                    let mut bytes = [0u8; 16];
                    bytes.copy_from_slice(&decode(tweak));
                    Params::Threefish256 { tweak: bytes }
                }
                None => Params::None,
            },
            "rc4" => self
                .rc4_drop
                .map_or(Params::None, |drop| Params::Rc4 { drop }),
            "skein256" => self
                .output_len
                .map_or(Params::None, |output_len| Params::Skein256 { output_len }),
            _ => Params::None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CipherVector {
    pub name: String,
    pub primitive: String,
    pub mode: String,
    pub key: String,
    #[serde(default)]
    pub iv: Option<String>,
    #[serde(default)]
    pub padding: Option<bool>,
    #[serde(default)]
    pub params: VectorParams,
    pub plaintext: String,
    pub ciphertext: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DigestVector {
    pub name: String,
    pub primitive: String,
    #[serde(default)]
    pub params: VectorParams,
    pub message: String,
    pub digest: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MacVector {
    pub name: String,
    pub primitive: String,
    pub key: String,
    pub message: String,
    pub tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KdfVector {
    pub name: String,
    pub primitive: String,
    pub password: String,
    pub salt: String,
    pub iterations: u32,
    pub output: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HkdfVector {
    pub name: String,
    pub primitive: String,
    pub ikm: String,
    pub salt: String,
    pub info: String,
    pub output: String,
}

/// Every known-answer vector shipped with the suite.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorFile {
    pub cipher: Vec<CipherVector>,
    pub digest: Vec<DigestVector>,
    pub hmac: Vec<MacVector>,
    pub pbkdf2: Vec<KdfVector>,
    pub hkdf: Vec<HkdfVector>,
}

pub fn load_vectors() -> VectorFile {
    serde_json::from_str(include_str!("../vectors/known_answers.json"))
        .expect("known_answers.json is well formed")
}

pub fn decode(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).expect("vector hex is valid")
}

/// Runs `input` through an initialised engine in chunks of `chunk` bytes.
pub fn drive(engine: &mut ModeEngine, input: &[u8], chunk: usize) -> CryptoResult<Vec<u8>> {
    let mut out = vec![0u8; engine.update_len(input.len()) + engine.final_len()];
    let mut written = 0;
    for piece in input.chunks(chunk.max(1)) {
        written += engine.update(piece, &mut out[written..])?;
    }
    written += engine.finalize(&mut out[written..])?;
    out.truncate(written);
    Ok(out)
}

/// Initialises `engine` and runs `input` through it in one call.
pub fn run_once(
    engine: &mut ModeEngine,
    direction: Direction,
    key: &[u8],
    iv: Option<&[u8]>,
    params: &Params,
    input: &[u8],
) -> CryptoResult<Vec<u8>> {
    engine.init(direction, key, iv, params)?;
    drive(engine, input, input.len())
}
