//! Claim recovery: reclaiming shares from a lost holder address.
//!
//! A claimant who can no longer sign for one of their addresses runs a
//! three-phase protocol against the ledger holding the shares:
//!
//! 1. **Prepare**: register a hash commitment that hides the target.
//! 2. **Declare**: after the preclaim delay, reveal the nonce, post
//!    collateral proportional to the lost balance, and open the claim.
//! 3. **Resolve**: after the claim period, receive the lost address's
//!    entire balance and the collateral back.
//!
//! The claim period is the dispute window: whoever actually controls the
//! "lost" address defeats the claim by simply moving the balance away
//! before resolution.

pub mod claim;
pub mod engine;
pub mod error;
pub mod events;

pub use claim::{ClaimBook, ClaimRecord, PreparedClaim};
pub use engine::RecoveryEngine;
pub use error::ClaimError;
pub use events::ClaimEvent;
