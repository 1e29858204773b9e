//! The dispute resolver — arbitrated settlement.
//!
//! Resolution funnels through the same settlement core as a normal
//! release: one combined fee comes off the principal, the remainder is
//! split between buyer and seller by the arbitrated bps shares, and the
//! payout runs with the same snapshot-then-zero, all-or-nothing
//! discipline.

use tradevault_settlement::{dispute_plan, TransferSink};
use tradevault_types::{
    constants::BPS_SCALE, AccountId, EscrowError, Result, TradeEvent, TradeId, TradeStatus,
};

use crate::engine::SettlementEngine;

impl SettlementEngine {
    /// Apply an arbitration outcome and settle. Operator-only; the trade
    /// must be `Disputed` and the shares must sum to 10 000 bps.
    ///
    /// A zero share skips that party's payout leg entirely; the fee legs
    /// are paid regardless.
    pub fn resolve_dispute(
        &mut self,
        id: TradeId,
        acting_as: AccountId,
        buyer_share_bps: u64,
        seller_share_bps: u64,
        sink: &mut dyn TransferSink,
    ) -> Result<()> {
        self.require_operator(acting_as)?;
        if u128::from(buyer_share_bps) + u128::from(seller_share_bps) != BPS_SCALE {
            return Err(EscrowError::InvalidSplit {
                buyer_bps: buyer_share_bps,
                seller_bps: seller_share_bps,
            });
        }
        self.require_status(id, TradeStatus::Disputed)?;

        tracing::info!(
            trade_id = %id,
            buyer_share_bps,
            seller_share_bps,
            "resolving dispute"
        );
        self.settle_with(
            id,
            sink,
            TradeEvent::DisputeResolved {
                trade_id: id,
                buyer_share_bps,
                seller_share_bps,
            },
            move |trade, config| {
                dispute_plan(
                    trade,
                    &config.fees,
                    buyer_share_bps,
                    seller_share_bps,
                    config.operator,
                    config.platform_receiver,
                )
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradevault_settlement::InMemoryBank;
    use tradevault_types::EngineConfig;

    struct Fixture {
        engine: SettlementEngine,
        bank: InMemoryBank,
        operator: AccountId,
        platform: AccountId,
        buyer: AccountId,
        seller: AccountId,
        id: TradeId,
    }

    /// A 1000-unit trade, delivered and disputed by the buyer.
    fn disputed_trade() -> Fixture {
        let operator = AccountId::new();
        let platform = AccountId::new();
        let mut engine = SettlementEngine::new(EngineConfig::new(operator, platform));
        let buyer = AccountId::new();
        let seller = AccountId::new();
        let id = engine.fund(buyer, seller, 1000, 1025).unwrap();
        engine.mark_delivered(id, operator).unwrap();
        engine.open_dispute(id, operator, buyer).unwrap();
        Fixture {
            engine,
            bank: InMemoryBank::new(),
            operator,
            platform,
            buyer,
            seller,
            id,
        }
    }

    #[test]
    fn resolve_splits_distributable_per_shares() {
        let mut fx = disputed_trade();
        fx.engine
            .resolve_dispute(fx.id, fx.operator, 6000, 4000, &mut fx.bank)
            .unwrap();

        // distributable = 1000 - 25 = 975 -> 585 / 390.
        assert_eq!(fx.bank.balance(fx.buyer), 585);
        assert_eq!(fx.bank.balance(fx.seller), 390);
        // Fee pool: 25 from funding + 25 from resolution = 50, split 10/40.
        assert_eq!(fx.bank.balance(fx.operator), 10);
        assert_eq!(fx.bank.balance(fx.platform), 40);

        assert_eq!(
            fx.engine.trade(fx.id).unwrap().status,
            TradeStatus::Completed
        );
        fx.engine.verify_conservation(fx.id).unwrap();
    }

    #[test]
    fn shares_must_sum_to_whole() {
        let mut fx = disputed_trade();
        let err = fx
            .engine
            .resolve_dispute(fx.id, fx.operator, 6000, 5000, &mut fx.bank)
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::InvalidSplit {
                buyer_bps: 6000,
                seller_bps: 5000
            }
        ));
        assert_eq!(fx.engine.trade(fx.id).unwrap().status, TradeStatus::Disputed);
    }

    #[test]
    fn resolve_requires_disputed_state() {
        let operator = AccountId::new();
        let mut engine = SettlementEngine::new(EngineConfig::new(operator, AccountId::new()));
        let mut bank = InMemoryBank::new();
        let id = engine
            .fund(AccountId::new(), AccountId::new(), 1000, 1025)
            .unwrap();
        engine.mark_delivered(id, operator).unwrap();

        let err = engine
            .resolve_dispute(id, operator, 5000, 5000, &mut bank)
            .unwrap_err();
        assert!(matches!(
            err,
            EscrowError::InvalidState {
                expected: TradeStatus::Disputed,
                ..
            }
        ));
    }

    #[test]
    fn resolve_requires_operator() {
        let mut fx = disputed_trade();
        let err = fx
            .engine
            .resolve_dispute(fx.id, AccountId::new(), 5000, 5000, &mut fx.bank)
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidParty { .. }));
    }

    #[test]
    fn full_refund_skips_seller_leg_but_pays_fees() {
        let mut fx = disputed_trade();
        fx.engine
            .resolve_dispute(fx.id, fx.operator, 10_000, 0, &mut fx.bank)
            .unwrap();

        assert_eq!(fx.bank.balance(fx.buyer), 975);
        assert_eq!(fx.bank.balance(fx.seller), 0);
        assert_eq!(fx.bank.balance(fx.operator), 10);
        assert_eq!(fx.bank.balance(fx.platform), 40);
        assert!(fx
            .bank
            .history()
            .iter()
            .all(|(_, leg)| leg.to != fx.seller));
        fx.engine.verify_conservation(fx.id).unwrap();
    }

    #[test]
    fn second_resolution_is_rejected_without_payment() {
        let mut fx = disputed_trade();
        fx.engine
            .resolve_dispute(fx.id, fx.operator, 5000, 5000, &mut fx.bank)
            .unwrap();
        let paid = fx.bank.total_paid();

        let err = fx
            .engine
            .resolve_dispute(fx.id, fx.operator, 5000, 5000, &mut fx.bank)
            .unwrap_err();
        assert!(matches!(err, EscrowError::InvalidState { .. }));
        assert_eq!(fx.bank.total_paid(), paid);
    }

    #[test]
    fn failed_resolution_leaves_trade_disputed() {
        let mut fx = disputed_trade();
        fx.bank.reject_recipient(fx.buyer);

        let err = fx
            .engine
            .resolve_dispute(fx.id, fx.operator, 6000, 4000, &mut fx.bank)
            .unwrap_err();
        assert!(matches!(err, EscrowError::TransferFailed { .. }));

        let trade = fx.engine.trade(fx.id).unwrap();
        assert_eq!(trade.status, TradeStatus::Disputed);
        assert_eq!(trade.pending_total(), 25);
        assert_eq!(fx.bank.total_paid(), 0);
        fx.engine.verify_conservation(fx.id).unwrap();

        // Retry after the sink recovers.
        fx.bank.accept_recipient(fx.buyer);
        fx.engine
            .resolve_dispute(fx.id, fx.operator, 6000, 4000, &mut fx.bank)
            .unwrap();
        assert_eq!(fx.bank.balance(fx.buyer), 585);
        fx.engine.verify_conservation(fx.id).unwrap();
    }

    #[test]
    fn dust_never_leaks_on_uneven_splits() {
        let operator = AccountId::new();
        let platform = AccountId::new();
        let mut engine = SettlementEngine::new(EngineConfig::new(operator, platform));
        let mut bank = InMemoryBank::new();
        let buyer = AccountId::new();
        let seller = AccountId::new();

        // 997 units: fee 24, distributable 973; 3333/6667 floors strand
        // one unit, which must surface in the platform leg.
        let funding = engine.config().fees.funding_required(997);
        let id = engine.fund(buyer, seller, 997, funding).unwrap();
        engine.mark_delivered(id, operator).unwrap();
        engine.open_dispute(id, operator, seller).unwrap();
        engine
            .resolve_dispute(id, operator, 3333, 6667, &mut bank)
            .unwrap();

        assert_eq!(bank.total_paid(), funding);
        engine.verify_conservation(id).unwrap();
    }
}
