//! Funds conservation invariant checker.
//!
//! Invariant enforced per trade over its whole lifecycle:
//! ```text
//! value_received == paid_out + retained
//! ```
//! where `retained` is the principal plus pending fees while the trade is
//! open, and zero once it completes. No transition may create or destroy
//! value; if this ever fails, something has gone catastrophically wrong
//! and the coordinator should halt the engine.

use std::collections::HashMap;

use tradevault_types::{Amount, EscrowError, Result, Trade, TradeId};

use crate::transfer::PayoutLeg;

/// Tracks value in and value out per trade and validates conservation.
#[derive(Debug, Default)]
pub struct FundsConservation {
    /// Value received at funding, per trade.
    received: HashMap<TradeId, Amount>,
    /// Total paid out through completed settlements, per trade.
    paid_out: HashMap<TradeId, Amount>,
}

impl FundsConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value attached at funding.
    pub fn record_funding(&mut self, trade_id: TradeId, value: Amount) {
        *self.received.entry(trade_id).or_insert(0) += value;
    }

    /// Record the legs of a delivered payout batch.
    pub fn record_payout(&mut self, trade_id: TradeId, legs: &[PayoutLeg]) {
        let total: Amount = legs.iter().map(|leg| leg.amount).sum();
        *self.paid_out.entry(trade_id).or_insert(0) += total;
    }

    /// Value received at funding for a trade.
    #[must_use]
    pub fn received(&self, trade_id: TradeId) -> Amount {
        self.received.get(&trade_id).copied().unwrap_or(0)
    }

    /// Value paid out so far for a trade.
    #[must_use]
    pub fn paid_out(&self, trade_id: TradeId) -> Amount {
        self.paid_out.get(&trade_id).copied().unwrap_or(0)
    }

    /// Verify the conservation invariant against the trade's current state.
    ///
    /// # Errors
    /// Returns [`EscrowError::ConservationViolation`] if value was created
    /// or destroyed.
    pub fn verify(&self, trade: &Trade) -> Result<()> {
        let received = self.received(trade.id);
        let paid = self.paid_out(trade.id);
        let retained = trade.retained_value();
        if paid + retained != received {
            return Err(EscrowError::ConservationViolation {
                reason: format!(
                    "{}: received {received} != paid {paid} + retained {retained}",
                    trade.id
                ),
            });
        }
        Ok(())
    }
}
