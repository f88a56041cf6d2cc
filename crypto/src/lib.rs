//! Cryptographic primitives for the Aequitas registry.
//!
//! - **Blake2b** for hashing (claim commitments)
//! - Nonce generation for the commit-reveal protocol

pub mod commitment;
pub mod hash;

pub use commitment::{commitment_hash, generate_nonce};
pub use hash::{blake2b_256, blake2b_256_multi};
