//! The `Trade` record and its status machine.
//!
//! A trade is created already funded and only ever moves forward:
//!
//! ```text
//! Funded --mark_delivered--> Delivered --approve/timeout--> Completed
//!                            Delivered --open_dispute--> Disputed --resolve--> Completed
//! ```
//!
//! `Created` exists as a vestigial pre-funding marker (funding and creation
//! are one atomic step, so it is never observable through the ledger).
//! `Completed` is terminal; no field changes after it is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, TradeId};

/// Integer base units (e.g. cents, wei). All fee arithmetic is defined on
/// integers with truncating division, so amounts never carry fractions.
pub type Amount = u128;

/// Lifecycle status of a trade. Transitions are forward-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// Pre-funding marker. Vestigial: every trade enters at `Funded`.
    Created,
    /// Funds are in custody; awaiting delivery confirmation.
    Funded,
    /// Operator confirmed delivery; awaiting approval, timeout, or dispute.
    Delivered,
    /// One party raised a dispute; awaiting arbitrated resolution.
    Disputed,
    /// Settled and paid out. Terminal.
    Completed,
}

impl TradeStatus {
    /// Whether this status permits any further transition.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }
}

impl std::fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "CREATED"),
            Self::Funded => write!(f, "FUNDED"),
            Self::Delivered => write!(f, "DELIVERED"),
            Self::Disputed => write!(f, "DISPUTED"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

/// One escrowed exchange between a buyer and a seller.
///
/// The ledger holds `value_received` for the trade until settlement:
/// the principal plus the buyer-side fee collected up front. The two
/// pending fee balances accrue splits that are paid out (and zeroed)
/// together, atomically, at settlement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    /// Ledger-assigned id, monotonic from 1.
    pub id: TradeId,
    /// The funding party.
    pub buyer: AccountId,
    /// The delivering party. Distinct from `buyer`, never nil.
    pub seller: AccountId,
    /// Principal value, excluding fees. Immutable after creation.
    pub amount: Amount,
    /// Current lifecycle status.
    pub status: TradeStatus,
    /// Set once, when the status transitions to `Delivered`.
    pub delivered_at: Option<DateTime<Utc>>,
    /// When the trade was funded (created).
    pub funded_at: DateTime<Utc>,
    /// Exact value attached at funding: `amount + buyer_fee(amount)`.
    /// Retained for conservation audits.
    pub value_received: Amount,
    /// Platform's share of fees accrued but not yet paid.
    pub pending_platform_fee: Amount,
    /// Operator's share of fees accrued but not yet paid.
    pub pending_operator_fee: Amount,
}

impl Trade {
    /// Total fees accrued-but-unpaid for this trade.
    #[must_use]
    pub fn pending_total(&self) -> Amount {
        self.pending_platform_fee + self.pending_operator_fee
    }

    /// Value the ledger currently retains for this trade: zero once
    /// completed, otherwise the principal plus pending fees.
    #[must_use]
    pub fn retained_value(&self) -> Amount {
        if self.status.is_terminal() {
            0
        } else {
            self.amount + self.pending_total()
        }
    }

    /// Snapshot both pending fee balances and zero them, as one step.
    ///
    /// Settlement calls this exactly once, before any transfer: a retried
    /// settlement (after a rolled-back failure) re-reads the restored
    /// balances, and a replayed settlement finds them already zero.
    /// Returns `(operator_fee, platform_fee)`.
    pub fn take_pending_fees(&mut self) -> (Amount, Amount) {
        let operator = std::mem::take(&mut self.pending_operator_fee);
        let platform = std::mem::take(&mut self.pending_platform_fee);
        (operator, platform)
    }

    /// Accrue a fee split onto the pending balances.
    pub fn accrue_fees(&mut self, operator: Amount, platform: Amount) {
        self.pending_operator_fee += operator;
        self.pending_platform_fee += platform;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade {
            id: TradeId(1),
            buyer: AccountId::new(),
            seller: AccountId::new(),
            amount: 1000,
            status: TradeStatus::Funded,
            delivered_at: None,
            funded_at: Utc::now(),
            value_received: 1025,
            pending_platform_fee: 20,
            pending_operator_fee: 5,
        }
    }

    #[test]
    fn status_display() {
        assert_eq!(format!("{}", TradeStatus::Funded), "FUNDED");
        assert_eq!(format!("{}", TradeStatus::Completed), "COMPLETED");
    }

    #[test]
    fn only_completed_is_terminal() {
        assert!(TradeStatus::Completed.is_terminal());
        assert!(!TradeStatus::Created.is_terminal());
        assert!(!TradeStatus::Funded.is_terminal());
        assert!(!TradeStatus::Delivered.is_terminal());
        assert!(!TradeStatus::Disputed.is_terminal());
    }

    #[test]
    fn pending_total_sums_both_sides() {
        let trade = make_trade();
        assert_eq!(trade.pending_total(), 25);
    }

    #[test]
    fn retained_value_matches_funding_while_open() {
        let trade = make_trade();
        assert_eq!(trade.retained_value(), trade.value_received);
    }

    #[test]
    fn retained_value_zero_when_completed() {
        let mut trade = make_trade();
        trade.status = TradeStatus::Completed;
        trade.take_pending_fees();
        assert_eq!(trade.retained_value(), 0);
    }

    #[test]
    fn take_pending_fees_snapshots_and_zeroes() {
        let mut trade = make_trade();
        let (operator, platform) = trade.take_pending_fees();
        assert_eq!(operator, 5);
        assert_eq!(platform, 20);
        assert_eq!(trade.pending_total(), 0);

        // A second take finds nothing — fees cannot be double-counted.
        assert_eq!(trade.take_pending_fees(), (0, 0));
    }

    #[test]
    fn accrue_adds_onto_existing_balances() {
        let mut trade = make_trade();
        trade.accrue_fees(5, 20);
        assert_eq!(trade.pending_operator_fee, 10);
        assert_eq!(trade.pending_platform_fee, 40);
    }

    #[test]
    fn trade_serde_roundtrip() {
        let trade = make_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.id, back.id);
        assert_eq!(trade.amount, back.amount);
        assert_eq!(trade.status, back.status);
    }
}
