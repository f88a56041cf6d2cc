//! Protocol parameters: the tunable constants of the claim-recovery and
//! acquisition protocols.
//!
//! Every field is fixed per ledger instance at construction. Changing a
//! parameter for a live registry means deploying a new instance; claims and
//! offers in flight always settle under the parameters they started with.

use serde::{Deserialize, Serialize};

/// One whole unit of the collateral currency in raw units (18 decimals).
pub const CURRENCY_UNIT: u128 = 1_000_000_000_000_000_000;

/// All parameters stored by every ledger instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    // ── Claim recovery ───────────────────────────────────────────────────
    /// Collateral charged per share unit held by the lost address, in raw
    /// collateral-currency units. Default: 1 whole unit per share.
    pub collateral_rate: u128,

    /// Seconds between registering a commitment and being allowed to reveal
    /// it. Defeats same-block commit-and-reveal. Default: 1 day.
    pub pre_claim_period_secs: u64,

    /// Seconds between a declared claim and its resolution, the dispute
    /// window during which the true owner can move their balance away.
    /// Default: 180 days.
    pub claim_period_secs: u64,

    // ── Acquisition ──────────────────────────────────────────────────────
    /// Minimum seconds an offer must stay open before the relative quorum
    /// track becomes available. The absolute quorum track has no wait.
    /// Default: 60 days.
    pub acquisition_min_duration_secs: u64,

    /// Yes votes needed as a fraction of all shares outstanding at offer
    /// creation (basis points). Satisfiable at any time.
    pub absolute_quorum_bps: u32,

    /// Yes votes needed as a fraction of votes actually cast (basis points).
    /// Only consulted after the minimum duration. Strictly the lower bar.
    pub relative_quorum_bps: u32,
}

impl ProtocolParams {
    /// Registry defaults, the intended configuration for a live equity ledger.
    pub fn registry_defaults() -> Self {
        Self {
            collateral_rate: CURRENCY_UNIT,
            pre_claim_period_secs: 24 * 3600,      // 1 day
            claim_period_secs: 180 * 24 * 3600,    // 180 days
            acquisition_min_duration_secs: 60 * 24 * 3600, // 60 days
            absolute_quorum_bps: 7500,             // 75%
            relative_quorum_bps: 5000,             // 50%
        }
    }
}

/// Default is the registry configuration.
impl Default for ProtocolParams {
    fn default() -> Self {
        Self::registry_defaults()
    }
}
