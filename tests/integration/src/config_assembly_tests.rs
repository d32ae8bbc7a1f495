//! Engines, random sources and buffers assembled from a TOML configuration.

use crate::test_utils::{init_tracing, run_once};
use tessera_core::{EngineConfig, RandomSourceKind};
use tessera_crypto::{
    generate_iv, generate_key, random, CryptoError, Direction, Mode, Params, Registry,
    SecureBuffer,
};

const SEEDED: &str = r#"
    [memory]
    lock_pages = false

    [engine]
    default_padding = false
    rc4_drop = 768

    [random]
    source = "seeded"
    seed_hex = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"

    [logging]
    level = "debug"
"#;

#[test]
fn test_registry_follows_engine_section() {
    init_tracing();
    let config = EngineConfig::from_toml_str(SEEDED).unwrap();
    let registry = Registry::from_config(&config);

    assert!(!registry.default_options(Mode::Cbc).padding);
    assert!(!registry.default_options(Mode::Ecb).padding);

    // Unpadded defaults reject a trailing partial block
    let mut engine = registry.engine("threefish256", "cbc").unwrap();
    let err = run_once(
        &mut engine,
        Direction::Encrypt,
        &[1u8; 32],
        Some(&[2u8; 32]),
        &Params::None,
        &[0u8; 33],
    )
    .unwrap_err();
    assert_eq!(err, CryptoError::LeftoverInput { len: 1 });
}

#[test]
fn test_configured_rc4_drop_is_default() {
    let config = EngineConfig::from_toml_str(SEEDED).unwrap();
    let registry = Registry::from_config(&config);
    let key = [0x42u8; 16];
    let data = [0u8; 24];

    let mut engine = registry.engine("rc4", "stream").unwrap();
    let implicit = run_once(&mut engine, Direction::Encrypt, &key, None, &Params::None, &data)
        .unwrap();
    let explicit = run_once(
        &mut engine,
        Direction::Encrypt,
        &key,
        None,
        &Params::Rc4 { drop: 768 },
        &data,
    )
    .unwrap();
    let undropped = run_once(
        &mut engine,
        Direction::Encrypt,
        &key,
        None,
        &Params::Rc4 { drop: 0 },
        &data,
    )
    .unwrap();

    assert_eq!(implicit, explicit);
    assert_ne!(implicit, undropped);
}

#[test]
fn test_seeded_source_is_reproducible() {
    let config = EngineConfig::from_toml_str(SEEDED).unwrap();
    assert_eq!(config.random.source, RandomSourceKind::Seeded);

    let mut a = random::from_config(&config.random).unwrap();
    let mut b = random::from_config(&config.random).unwrap();

    let key_a = generate_key(a.as_mut(), 32).unwrap();
    let key_b = generate_key(b.as_mut(), 32).unwrap();
    assert_eq!(key_a.expose(), key_b.expose());

    let iv_a = generate_iv(a.as_mut(), 32).unwrap();
    assert_ne!(iv_a.expose(), key_a.expose());
}

#[test]
fn test_generated_material_drives_engine() {
    let config = EngineConfig::from_toml_str(SEEDED).unwrap();
    let registry = Registry::from_config(&config);
    let mut source = random::from_config(&config.random).unwrap();

    let key = generate_key(source.as_mut(), 32).unwrap();
    let iv = generate_iv(source.as_mut(), 32).unwrap();
    let message = b"configured end to end, 37 bytes long";

    let mut engine = registry.engine("threefish256", "ctr").unwrap();
    let ct = run_once(
        &mut engine,
        Direction::Encrypt,
        key.expose(),
        Some(iv.expose()),
        &Params::None,
        message,
    )
    .unwrap();
    let pt = run_once(
        &mut engine,
        Direction::Decrypt,
        key.expose(),
        Some(iv.expose()),
        &Params::None,
        &ct,
    )
    .unwrap();
    assert_eq!(pt, message);
}

#[test]
fn test_default_config_uses_system_entropy() {
    let config = EngineConfig::default_config();
    let mut source = random::from_config(&config.random).unwrap();

    let a = generate_key(source.as_mut(), 32).unwrap();
    let b = generate_key(source.as_mut(), 32).unwrap();
    assert_ne!(a.expose(), b.expose());
}

#[test]
fn test_memory_section_controls_locking() {
    let mut config = EngineConfig::default_config();
    let plain = SecureBuffer::allocate_with(64, &config.memory);
    assert_eq!(plain.lock_status(), tessera_crypto::LockStatus::NotRequested);

    // Locking may be refused by the host; either outcome is a usable buffer
    config.memory.lock_pages = true;
    let mut locked = SecureBuffer::allocate_with(64, &config.memory);
    assert_ne!(locked.lock_status(), tessera_crypto::LockStatus::NotRequested);
    locked.write(0, b"still writable").unwrap();
    assert_eq!(locked.read(0, 14).unwrap(), b"still writable");
}

#[test]
fn test_seeded_source_without_seed_is_rejected() {
    assert!(EngineConfig::from_toml_str("[random]\nsource = \"seeded\"\n").is_err());
}
