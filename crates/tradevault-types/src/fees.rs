//! Basis-point fee arithmetic.
//!
//! All fee math is integer multiplication with truncating division:
//! `fee = amount * fee_bps / 10_000`. Truncation (never rounding) keeps
//! totals reproducible and auditable across re-computation.

use serde::{Deserialize, Serialize};

use crate::constants::{
    BPS_SCALE, DEFAULT_OPERATOR_SHARE_BPS, DEFAULT_PLATFORM_FEE_BPS, DEFAULT_TOTAL_FEE_BPS,
};
use crate::Amount;

/// The fee parameters for an engine instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee charged on each side of a trade, in bps of the principal.
    pub platform_fee_bps: u64,
    /// Operator's cut of the combined fee pool, in bps of `total_fee_bps`.
    pub operator_share_bps: u64,
    /// The combined fee pool in bps (buyer side + seller side).
    pub total_fee_bps: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            platform_fee_bps: DEFAULT_PLATFORM_FEE_BPS,
            operator_share_bps: DEFAULT_OPERATOR_SHARE_BPS,
            total_fee_bps: DEFAULT_TOTAL_FEE_BPS,
        }
    }
}

/// An accrued fee divided between the operator and the platform receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub operator: Amount,
    pub platform: Amount,
}

impl FeeSplit {
    #[must_use]
    pub fn total(&self) -> Amount {
        self.operator + self.platform
    }
}

impl FeeSchedule {
    /// The one-side fee on a principal: `amount * platform_fee_bps / 10_000`,
    /// truncated.
    #[must_use]
    pub fn side_fee(&self, amount: Amount) -> Amount {
        amount * Amount::from(self.platform_fee_bps) / BPS_SCALE
    }

    /// The exact value a buyer must attach to fund a trade.
    #[must_use]
    pub fn funding_required(&self, amount: Amount) -> Amount {
        amount + self.side_fee(amount)
    }

    /// Divide a collected fee between operator and platform.
    ///
    /// The operator receives `fee * operator_share_bps / total_fee_bps`
    /// (truncated); the remainder goes to the platform receiver, so the
    /// split always sums back to `fee` exactly.
    #[must_use]
    pub fn split(&self, fee: Amount) -> FeeSplit {
        let operator = fee * Amount::from(self.operator_share_bps) / Amount::from(self.total_fee_bps);
        FeeSplit {
            operator,
            platform: fee - operator,
        }
    }

    /// Apply a bps share to a value, truncated. Used for dispute splits.
    #[must_use]
    pub fn apply_bps(value: Amount, bps: u64) -> Amount {
        value * Amount::from(bps) / BPS_SCALE
    }
}
