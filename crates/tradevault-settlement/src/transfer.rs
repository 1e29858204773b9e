//! Payout legs and the transfer execution boundary.
//!
//! A [`TransferSink`] is the engine's only way of moving value out of
//! custody. The contract is batch-atomic: `transfer_all` must validate
//! every leg before applying any, so a failed settlement leaves no
//! partial payout behind. On a transactional host this maps to one
//! transaction; the in-memory bank emulates it with a validate-then-apply
//! pass.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tradevault_types::{AccountId, Amount, EscrowError, Result, TradeId};

/// Why a payout leg exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    /// The seller's share of the principal.
    SellerPayout,
    /// The buyer's share of a disputed principal.
    BuyerPayout,
    /// The operator's cut of the fee pool.
    OperatorFee,
    /// The platform receiver's cut of the fee pool.
    PlatformFee,
}

impl std::fmt::Display for LegKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SellerPayout => write!(f, "SELLER_PAYOUT"),
            Self::BuyerPayout => write!(f, "BUYER_PAYOUT"),
            Self::OperatorFee => write!(f, "OPERATOR_FEE"),
            Self::PlatformFee => write!(f, "PLATFORM_FEE"),
        }
    }
}

/// One outbound transfer of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutLeg {
    pub to: AccountId,
    pub amount: Amount,
    pub kind: LegKind,
}

/// Destination for settlement payouts.
///
/// Implementations must be batch-atomic: either every leg is delivered or
/// none is. The engine relies on this to keep "partial payout" out of the
/// observable state space.
pub trait TransferSink {
    /// Deliver all legs of a settlement, atomically.
    ///
    /// # Errors
    /// Returns [`EscrowError::TransferFailed`] if any leg cannot be
    /// delivered; in that case no leg may have been applied.
    fn transfer_all(&mut self, trade_id: TradeId, legs: &[PayoutLeg]) -> Result<()>;
}

/// In-memory transfer sink for tests and simulation.
///
/// Credits per-account balances and keeps the full leg history. Recipients
/// can be marked as rejecting, which makes any batch naming them fail
/// before anything is applied — the hook used by rollback tests.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    balances: HashMap<AccountId, Amount>,
    rejecting: HashSet<AccountId>,
    history: Vec<(TradeId, PayoutLeg)>,
}

impl InMemoryBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future batch naming `account` fail.
    pub fn reject_recipient(&mut self, account: AccountId) {
        self.rejecting.insert(account);
    }

    /// Clear a previous rejection.
    pub fn accept_recipient(&mut self, account: AccountId) {
        self.rejecting.remove(&account);
    }

    /// Total value credited to an account so far.
    #[must_use]
    pub fn balance(&self, account: AccountId) -> Amount {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Every leg ever delivered, in order.
    #[must_use]
    pub fn history(&self) -> &[(TradeId, PayoutLeg)] {
        &self.history
    }

    /// Sum of all value that has left custody through this sink.
    #[must_use]
    pub fn total_paid(&self) -> Amount {
        self.balances.values().sum()
    }
}

impl TransferSink for InMemoryBank {
    fn transfer_all(&mut self, trade_id: TradeId, legs: &[PayoutLeg]) -> Result<()> {
        // Validate every leg before touching a balance.
        for leg in legs {
            if self.rejecting.contains(&leg.to) {
                return Err(EscrowError::TransferFailed {
                    reason: format!("recipient {} rejected {} leg", leg.to, leg.kind),
                });
            }
        }

        for leg in legs {
            *self.balances.entry(leg.to).or_insert(0) += leg.amount;
            self.history.push((trade_id, *leg));
        }
        Ok(())
    }
}
