//! The lifecycle controller — the only code path that mutates a trade.
//!
//! Every state-advancing call is gated on the configured operator identity;
//! only funding is open to the buyer. Settlement follows a strict order:
//! the status flips to `Completed` and the pending fees are snapshotted
//! and zeroed *before* any transfer runs, and a failed transfer batch
//! restores the pre-settlement snapshot as one unit. Partial payout is
//! never an observable outcome.

use chrono::Utc;
use tradevault_settlement::{
    release_plan, FundsConservation, PayoutPlan, SettlementReceipt, TransferSink,
};
use tradevault_types::{
    AccountId, Amount, EngineConfig, EscrowError, Result, Trade, TradeEvent, TradeId, TradeStatus,
};

use crate::ledger::TradeLedger;

/// The escrow settlement engine: ledger, lifecycle control, fee accrual,
/// and atomic payout.
pub struct SettlementEngine {
    config: EngineConfig,
    ledger: TradeLedger,
    conservation: FundsConservation,
    events: Vec<TradeEvent>,
    receipts: Vec<SettlementReceipt>,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ledger: TradeLedger::new(),
            conservation: FundsConservation::new(),
            events: Vec::new(),
            receipts: Vec::new(),
        }
    }

    // -----------------------------------------------------------------
    // Inbound operations (coordinator-facing)
    // -----------------------------------------------------------------

    /// Create a trade, already funded.
    ///
    /// The caller is the buyer and must attach exactly
    /// `amount + buyer_fee(amount)`. The buyer-side fee split is accrued
    /// onto the pending balances immediately; payout is deferred to
    /// settlement.
    ///
    /// # Errors
    /// - [`EscrowError::InvalidParty`] for a nil buyer/seller or self-trade
    /// - [`EscrowError::InvalidAmount`] for a zero principal
    /// - [`EscrowError::IncorrectFunding`] on any over- or underpayment
    pub fn fund(
        &mut self,
        buyer: AccountId,
        seller: AccountId,
        amount: Amount,
        value_sent: Amount,
    ) -> Result<TradeId> {
        if buyer.is_nil() {
            return Err(EscrowError::InvalidParty {
                reason: "buyer is the zero identity".into(),
            });
        }
        if seller.is_nil() {
            return Err(EscrowError::InvalidParty {
                reason: "seller is the zero identity".into(),
            });
        }
        if seller == buyer {
            return Err(EscrowError::InvalidParty {
                reason: "buyer and seller are the same account".into(),
            });
        }
        if amount == 0 {
            return Err(EscrowError::InvalidAmount);
        }
        let expected = self.config.fees.funding_required(amount);
        if value_sent != expected {
            return Err(EscrowError::IncorrectFunding {
                expected,
                sent: value_sent,
            });
        }

        let buyer_fee = self.config.fees.side_fee(amount);
        let split = self.config.fees.split(buyer_fee);
        let id = self.ledger.insert(Trade {
            id: TradeId(0), // assigned by the ledger
            buyer,
            seller,
            amount,
            status: TradeStatus::Funded,
            delivered_at: None,
            funded_at: Utc::now(),
            value_received: value_sent,
            pending_platform_fee: split.platform,
            pending_operator_fee: split.operator,
        });
        self.conservation.record_funding(id, value_sent);

        tracing::info!(
            trade_id = %id,
            buyer = %buyer.short(),
            seller = %seller.short(),
            amount,
            value_sent,
            "trade funded"
        );
        self.events.push(TradeEvent::Funded {
            trade_id: id,
            buyer,
            seller,
            amount,
            value_received: value_sent,
        });
        if split.total() > 0 {
            self.events.push(TradeEvent::FeesAccrued {
                trade_id: id,
                operator: split.operator,
                platform: split.platform,
            });
        }
        Ok(id)
    }

    /// Confirm delivery. Operator-only; the trade must be `Funded`.
    pub fn mark_delivered(&mut self, id: TradeId, acting_as: AccountId) -> Result<()> {
        self.require_operator(acting_as)?;
        let trade = self.ledger.get_mut(id).ok_or(EscrowError::NotFound(id))?;
        if trade.status != TradeStatus::Funded {
            return Err(EscrowError::InvalidState {
                expected: TradeStatus::Funded,
                actual: trade.status,
            });
        }
        let now = Utc::now();
        trade.status = TradeStatus::Delivered;
        trade.delivered_at = Some(now);

        tracing::info!(trade_id = %id, "delivery confirmed");
        self.events.push(TradeEvent::Delivered { trade_id: id, at: now });
        Ok(())
    }

    /// Approve delivery on the buyer's behalf and settle. Operator-only;
    /// the trade must be `Delivered`.
    pub fn approve_delivery(
        &mut self,
        id: TradeId,
        acting_as: AccountId,
        sink: &mut dyn TransferSink,
    ) -> Result<()> {
        self.require_operator(acting_as)?;
        self.require_status(id, TradeStatus::Delivered)?;
        self.settle_with(id, sink, TradeEvent::Approved { trade_id: id }, release_builder)
    }

    /// Release to the seller once the post-delivery timeout has elapsed.
    /// Operator-only; the trade must be `Delivered`.
    ///
    /// Eligibility is re-evaluated against the clock on every call; a call
    /// arriving at the exact threshold succeeds.
    pub fn release_after_timeout(
        &mut self,
        id: TradeId,
        acting_as: AccountId,
        sink: &mut dyn TransferSink,
    ) -> Result<()> {
        self.require_operator(acting_as)?;
        self.require_status(id, TradeStatus::Delivered)?;

        let trade = self.ledger.get(id).ok_or(EscrowError::NotFound(id))?;
        let delivered_at = trade.delivered_at.ok_or_else(|| {
            EscrowError::Internal("delivered trade has no delivery timestamp".into())
        })?;
        let deadline = delivered_at + self.config.release_timeout();
        let now = Utc::now();
        if now < deadline {
            return Err(EscrowError::TimeoutNotReached {
                remaining_secs: (deadline - now).num_seconds(),
            });
        }
        self.settle_with(id, sink, TradeEvent::TimedOut { trade_id: id }, release_builder)
    }

    /// Record a dispute raised by the buyer or the seller. Operator-only;
    /// the trade must be `Delivered`.
    pub fn open_dispute(
        &mut self,
        id: TradeId,
        acting_as: AccountId,
        raised_by: AccountId,
    ) -> Result<()> {
        self.require_operator(acting_as)?;
        let trade = self.ledger.get_mut(id).ok_or(EscrowError::NotFound(id))?;
        if trade.status != TradeStatus::Delivered {
            return Err(EscrowError::InvalidState {
                expected: TradeStatus::Delivered,
                actual: trade.status,
            });
        }
        if raised_by != trade.buyer && raised_by != trade.seller {
            return Err(EscrowError::InvalidParty {
                reason: format!("{} is not a party to {id}", raised_by.short()),
            });
        }
        trade.status = TradeStatus::Disputed;

        tracing::warn!(trade_id = %id, raised_by = %raised_by.short(), "dispute opened");
        self.events.push(TradeEvent::Disputed {
            trade_id: id,
            raised_by,
        });
        Ok(())
    }

    // -----------------------------------------------------------------
    // Read side (presentation layer / observers)
    // -----------------------------------------------------------------

    /// Look up a trade by id.
    #[must_use]
    pub fn trade(&self, id: TradeId) -> Option<&Trade> {
        self.ledger.get(id)
    }

    /// The lifecycle event log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[TradeEvent] {
        &self.events
    }

    /// Receipts for every completed settlement, oldest first.
    #[must_use]
    pub fn receipts(&self) -> &[SettlementReceipt] {
        &self.receipts
    }

    /// Number of trades ever recorded.
    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.ledger.len()
    }

    /// Check the conservation invariant for a trade:
    /// value received at funding == payouts so far + value still retained.
    pub fn verify_conservation(&self, id: TradeId) -> Result<()> {
        let trade = self.ledger.get(id).ok_or(EscrowError::NotFound(id))?;
        self.conservation.verify(trade)
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    pub(crate) fn require_operator(&self, acting_as: AccountId) -> Result<()> {
        if acting_as == self.config.operator {
            Ok(())
        } else {
            Err(EscrowError::InvalidParty {
                reason: format!("{} is not the operator", acting_as.short()),
            })
        }
    }

    pub(crate) fn require_status(&self, id: TradeId, expected: TradeStatus) -> Result<()> {
        let trade = self.ledger.get(id).ok_or(EscrowError::NotFound(id))?;
        if trade.status == expected {
            Ok(())
        } else {
            Err(EscrowError::InvalidState {
                expected,
                actual: trade.status,
            })
        }
    }

    /// Shared settlement core for release and dispute paths.
    ///
    /// Ordering is load-bearing:
    /// 1. `AlreadyCompleted` guard (the sole double-settlement check)
    /// 2. Snapshot the trade, flip to `Completed` before any transfer
    /// 3. Plan legs (accrues the settlement-side fee, snapshots-and-zeroes
    ///    the pending balances)
    /// 4. Execute the batch; on failure restore the snapshot — status flip
    ///    and fee balances included — and surface the error
    pub(crate) fn settle_with(
        &mut self,
        id: TradeId,
        sink: &mut dyn TransferSink,
        trigger: TradeEvent,
        build: impl FnOnce(&mut Trade, &EngineConfig) -> PayoutPlan,
    ) -> Result<()> {
        let config = self.config.clone();
        let trade = self.ledger.get_mut(id).ok_or(EscrowError::NotFound(id))?;
        if trade.status == TradeStatus::Completed {
            return Err(EscrowError::AlreadyCompleted(id));
        }

        let snapshot = trade.clone();
        trade.status = TradeStatus::Completed;
        let plan = build(trade, &config);

        if let Err(err) = sink.transfer_all(id, &plan.legs) {
            *trade = snapshot;
            tracing::warn!(trade_id = %id, error = %err, "settlement aborted, state rolled back");
            return Err(err);
        }

        self.conservation.record_payout(id, &plan.legs);
        self.events.push(trigger);
        if plan.accrued.total() > 0 {
            self.events.push(TradeEvent::FeesAccrued {
                trade_id: id,
                operator: plan.accrued.operator,
                platform: plan.accrued.platform,
            });
        }
        for leg in &plan.legs {
            tracing::info!(
                trade_id = %id,
                to = %leg.to.short(),
                amount = leg.amount,
                kind = %leg.kind,
                "payout released"
            );
            self.events.push(TradeEvent::Released {
                trade_id: id,
                to: leg.to,
                amount: leg.amount,
            });
        }
        self.receipts.push(SettlementReceipt::new(id, plan.legs));
        Ok(())
    }
}

fn release_builder(trade: &mut Trade, config: &EngineConfig) -> PayoutPlan {
    release_plan(
        trade,
        &config.fees,
        config.operator,
        config.platform_receiver,
    )
}
