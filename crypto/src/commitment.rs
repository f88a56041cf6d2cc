//! Commit-reveal primitives for the claim-recovery protocol.
//!
//! A claimant who has lost access to an address first registers
//! `commitment_hash(nonce, claimant, lost_holder)` without disclosing the
//! target, then reveals the nonce after the preclaim delay. The hash is
//! binding (a registered commitment matches exactly one triple) and hiding
//! (the target cannot be read out of it), so observers cannot front-run the
//! claim with a later commitment.

use crate::hash::blake2b_256_multi;
use aequitas_types::{CommitmentHash, HolderAddress, Nonce};
use rand::RngCore;

/// Compute the commitment binding a nonce, the claimant, and the lost holder.
///
/// Address parts are length-framed so that distinct `(claimant, lost_holder)`
/// pairs can never produce the same byte stream.
pub fn commitment_hash(
    nonce: &Nonce,
    claimant: &HolderAddress,
    lost_holder: &HolderAddress,
) -> CommitmentHash {
    let claimant_bytes = claimant.as_str().as_bytes();
    let lost_bytes = lost_holder.as_str().as_bytes();
    let claimant_len = (claimant_bytes.len() as u64).to_le_bytes();
    let lost_len = (lost_bytes.len() as u64).to_le_bytes();

    let digest = blake2b_256_multi(&[
        nonce.as_bytes(),
        &claimant_len,
        claimant_bytes,
        &lost_len,
        lost_bytes,
    ]);
    CommitmentHash::new(digest)
}

/// Generate a fresh random nonce for a new commitment.
pub fn generate_nonce() -> Nonce {
    let mut rng = rand::thread_rng();
    let mut bytes = [0u8; 32];
    rng.fill_bytes(&mut bytes);
    Nonce::new(bytes)
}
