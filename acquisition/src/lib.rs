//! Drag-along acquisition: a majority buyer forces a full buyout.
//!
//! An acquirer who wants the whole registry opens a funded offer at a fixed
//! price per share. Holders vote with their balances; votes follow shares
//! when they move. The offer completes on either track:
//!
//! - **absolute quorum**: yes votes reach the configured fraction of all
//!   shares outstanding when the offer opened, at any time;
//! - **relative quorum**: after the minimum duration, yes votes reach the
//!   configured fraction of votes actually cast.
//!
//! Completion sweeps every other holder's shares to the acquirer and pays
//! each of them `price_per_share` per share out of the acquirer's
//! pre-approved funds, all or nothing.

pub mod engine;
pub mod error;
pub mod events;
pub mod offer;

pub use engine::AcquisitionEngine;
pub use error::OfferError;
pub use events::AcquisitionEvent;
pub use offer::{AcquisitionOffer, CastVote, OfferBook, OfferId};
