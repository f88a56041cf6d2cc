//! Fundamental types for the Aequitas equity registry.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! holder addresses, commitment hashes, timestamps, protocol parameters, and the
//! state enums of the claim-recovery and acquisition protocols.

pub mod address;
pub mod commitment;
pub mod params;
pub mod state;
pub mod time;

pub use address::HolderAddress;
pub use commitment::{CommitmentHash, Nonce};
pub use params::{ProtocolParams, CURRENCY_UNIT};
pub use state::{ClaimState, OfferState, VoteChoice};
pub use time::Timestamp;
