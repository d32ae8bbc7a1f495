//! Known-answer vectors from `vectors/known_answers.json`, run through the
//! public registry, engine, digest, HMAC, PBKDF2 and HKDF entry points.

use crate::test_utils::{decode, drive, init_tracing, load_vectors, run_once, CipherVector};
use tessera_crypto::{
    digest, hkdf, hkdf_expand, hkdf_extract, hmac, pbkdf2, BlockCipherJob, Direction, ModeOptions,
    Registry,
};

fn engine_for(registry: &Registry, v: &CipherVector) -> tessera_crypto::ModeEngine {
    let mode = registry.lookup_mode(&v.mode).unwrap();
    let options = match v.padding {
        Some(padding) => ModeOptions { padding },
        None => registry.default_options(mode),
    };
    registry.engine_with(&v.primitive, mode, options).unwrap()
}

#[test]
fn test_cipher_vectors_encrypt() {
    init_tracing();
    let registry = Registry::with_defaults();

    for v in load_vectors().cipher {
        let mut engine = engine_for(&registry, &v);
        let iv = v.iv.as_deref().map(decode);
        let ct = run_once(
            &mut engine,
            Direction::Encrypt,
            &decode(&v.key),
            iv.as_deref(),
            &v.params.to_params(&v.primitive),
            &decode(&v.plaintext),
        )
        .unwrap();
        assert_eq!(hex::encode(ct), v.ciphertext, "{}", v.name);
    }
}

#[test]
fn test_cipher_vectors_decrypt() {
    init_tracing();
    let registry = Registry::with_defaults();

    for v in load_vectors().cipher {
        let mut engine = engine_for(&registry, &v);
        let iv = v.iv.as_deref().map(decode);
        let pt = run_once(
            &mut engine,
            Direction::Decrypt,
            &decode(&v.key),
            iv.as_deref(),
            &v.params.to_params(&v.primitive),
            &decode(&v.ciphertext),
        )
        .unwrap();
        assert_eq!(hex::encode(pt), v.plaintext, "{}", v.name);
    }
}

#[test]
fn test_cipher_vectors_byte_at_a_time() {
    let registry = Registry::with_defaults();

    for v in load_vectors().cipher {
        let mut engine = engine_for(&registry, &v);
        let iv = v.iv.as_deref().map(decode);
        engine
            .init(
                Direction::Encrypt,
                &decode(&v.key),
                iv.as_deref(),
                &v.params.to_params(&v.primitive),
            )
            .unwrap();
        let ct = drive(&mut engine, &decode(&v.plaintext), 1).unwrap();
        assert_eq!(hex::encode(ct), v.ciphertext, "{}", v.name);
    }
}

#[test]
fn test_cipher_vectors_one_shot() {
    let registry = Registry::with_defaults();

    for v in load_vectors().cipher.iter().filter(|v| v.mode != "STREAM") {
        let mode = registry.lookup_mode(&v.mode).unwrap();
        let key = decode(&v.key);
        let iv = v.iv.as_deref().map(decode);

        let mut job = BlockCipherJob::new(&v.primitive, mode, &key, iv.as_deref())
            .with_params(v.params.to_params(&v.primitive));
        if let Some(padding) = v.padding {
            job = job.with_padding(padding);
        }

        let ct = job.encrypt(&registry, &decode(&v.plaintext)).unwrap();
        assert_eq!(hex::encode(&ct), v.ciphertext, "{}", v.name);
        let pt = job.decrypt(&registry, &ct).unwrap();
        assert_eq!(hex::encode(&pt[..]), v.plaintext, "{}", v.name);
    }
}

#[test]
fn test_stream_vectors_in_place() {
    let registry = Registry::with_defaults();

    for v in load_vectors().cipher.iter().filter(|v| v.mode == "STREAM") {
        let mut data = decode(&v.plaintext);
        tessera_crypto::apply_stream(
            &registry,
            &v.primitive,
            &decode(&v.key),
            &v.params.to_params(&v.primitive),
            &mut data,
        )
        .unwrap();
        assert_eq!(hex::encode(data), v.ciphertext, "{}", v.name);
    }
}

#[test]
fn test_digest_vectors() {
    let registry = Registry::with_defaults();

    for v in load_vectors().digest {
        let primitive = registry.primitive(&v.primitive).unwrap();
        let out = digest(
            primitive,
            &v.params.to_params(&v.primitive),
            &decode(&v.message),
        )
        .unwrap();
        assert_eq!(hex::encode(out), v.digest, "{}", v.name);
    }
}

#[test]
fn test_hmac_vectors() {
    let registry = Registry::with_defaults();

    for v in load_vectors().hmac {
        let primitive = registry.primitive(&v.primitive).unwrap();
        let tag = hmac(
            primitive,
            &tessera_crypto::Params::None,
            &decode(&v.key),
            &decode(&v.message),
        )
        .unwrap();
        assert_eq!(hex::encode(tag), v.tag, "{}", v.name);
    }
}

#[test]
fn test_pbkdf2_vectors() {
    let registry = Registry::with_defaults();

    for v in load_vectors().pbkdf2 {
        let primitive = registry.primitive(&v.primitive).unwrap();
        let mut out = vec![0u8; v.output.len() / 2];
        pbkdf2(
            primitive,
            &tessera_crypto::Params::None,
            &decode(&v.password),
            &decode(&v.salt),
            v.iterations,
            &mut out,
        )
        .unwrap();
        assert_eq!(hex::encode(out), v.output, "{}", v.name);
    }
}

#[test]
fn test_hkdf_vectors() {
    let registry = Registry::with_defaults();
    let params = tessera_crypto::Params::None;

    for v in load_vectors().hkdf {
        let primitive = registry.primitive(&v.primitive).unwrap();
        let (ikm, salt, info) = (decode(&v.ikm), decode(&v.salt), decode(&v.info));

        let mut out = vec![0u8; v.output.len() / 2];
        hkdf(primitive, &params, &ikm, &salt, &info, &mut out).unwrap();
        assert_eq!(hex::encode(&out), v.output, "{}", v.name);

        let prk = hkdf_extract(primitive, &params, &salt, &ikm).unwrap();
        let mut split = vec![0u8; out.len()];
        hkdf_expand(primitive, &params, prk.expose(), &info, &mut split).unwrap();
        assert_eq!(split, out, "{}", v.name);
    }
}
