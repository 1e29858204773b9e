//! Payout planning: turning a trade into its settlement legs.
//!
//! Both planners follow the same discipline in one place, never spread
//! across call sites: accrue the settlement-side fee onto the trade's
//! pending balances, then snapshot-and-zero those balances, then emit the
//! legs. The pending balances already hold the buyer-side fee collected at
//! funding, so the fee legs always carry the full pool for the trade.
//!
//! Callers snapshot the trade beforehand; if the transfer batch fails they
//! restore the snapshot, which also restores the pending balances these
//! planners consumed.

use tradevault_types::{AccountId, Amount, FeeSchedule, FeeSplit, Trade};

use crate::transfer::{LegKind, PayoutLeg};

/// The legs of one settlement, plus the fee split accrued while planning
/// (surfaced so the engine can emit a fee event).
#[derive(Debug, Clone)]
pub struct PayoutPlan {
    pub legs: Vec<PayoutLeg>,
    pub accrued: FeeSplit,
}

impl PayoutPlan {
    fn new(accrued: FeeSplit) -> Self {
        Self {
            legs: Vec::with_capacity(4),
            accrued,
        }
    }

    /// Add a leg unless it is worth nothing. Zero-value transfers are
    /// skipped rather than attempted.
    fn push_nonzero(&mut self, to: AccountId, amount: Amount, kind: LegKind) {
        if amount > 0 {
            self.legs.push(PayoutLeg { to, amount, kind });
        }
    }

    /// Total value leaving custody under this plan.
    #[must_use]
    pub fn total(&self) -> Amount {
        self.legs.iter().map(|leg| leg.amount).sum()
    }
}

/// Plan a normal release: seller gets the principal minus the seller-side
/// fee; the fee pool (both sides) goes to the operator and the platform.
pub fn release_plan(
    trade: &mut Trade,
    fees: &FeeSchedule,
    operator: AccountId,
    platform_receiver: AccountId,
) -> PayoutPlan {
    let seller_fee = fees.side_fee(trade.amount);
    let seller_payout = trade.amount - seller_fee;

    let split = fees.split(seller_fee);
    trade.accrue_fees(split.operator, split.platform);
    let (operator_fee, platform_fee) = trade.take_pending_fees();

    let mut plan = PayoutPlan::new(split);
    plan.push_nonzero(trade.seller, seller_payout, LegKind::SellerPayout);
    plan.push_nonzero(operator, operator_fee, LegKind::OperatorFee);
    plan.push_nonzero(platform_receiver, platform_fee, LegKind::PlatformFee);
    plan
}

/// Plan an arbitrated release: one combined fee comes off the top, and the
/// remainder is divided between buyer and seller by the given bps shares.
///
/// Floor division can strand up to one unit of the distributable; it is
/// folded into the platform fee so the trade's value is conserved exactly.
pub fn dispute_plan(
    trade: &mut Trade,
    fees: &FeeSchedule,
    buyer_share_bps: u64,
    seller_share_bps: u64,
    operator: AccountId,
    platform_receiver: AccountId,
) -> PayoutPlan {
    let total_fee = fees.side_fee(trade.amount);
    let distributable = trade.amount - total_fee;
    let buyer_payout = FeeSchedule::apply_bps(distributable, buyer_share_bps);
    let seller_payout = FeeSchedule::apply_bps(distributable, seller_share_bps);
    let dust = distributable - buyer_payout - seller_payout;

    let split = fees.split(total_fee);
    let accrued = FeeSplit {
        operator: split.operator,
        platform: split.platform + dust,
    };
    trade.accrue_fees(accrued.operator, accrued.platform);
    let (operator_fee, platform_fee) = trade.take_pending_fees();

    let mut plan = PayoutPlan::new(accrued);
    plan.push_nonzero(trade.buyer, buyer_payout, LegKind::BuyerPayout);
    plan.push_nonzero(trade.seller, seller_payout, LegKind::SellerPayout);
    plan.push_nonzero(operator, operator_fee, LegKind::OperatorFee);
    plan.push_nonzero(platform_receiver, platform_fee, LegKind::PlatformFee);
    plan
}
