//! Integration tests for the public Tessera API
//!
//! This test suite validates:
//! - Known-answer vectors loaded from JSON, run through registry and engines
//! - Engine assembly from a TOML configuration
//! - Secret lifetime across buffers, engines and one-shot helpers

pub mod test_utils;

#[cfg(test)]
mod known_answer_tests;

#[cfg(test)]
mod config_assembly_tests;

#[cfg(test)]
mod secret_lifetime_tests;
