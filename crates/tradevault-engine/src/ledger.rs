//! The trade ledger — single source of truth for every trade.
//!
//! Trades are keyed by their ledger-assigned id and are never deleted;
//! completed trades stay behind as history.

use std::collections::HashMap;

use tradevault_types::{constants::FIRST_TRADE_ID, Trade, TradeId};

/// Authoritative map of trade id → trade record.
#[derive(Debug)]
pub struct TradeLedger {
    trades: HashMap<TradeId, Trade>,
    next_id: TradeId,
}

impl TradeLedger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            trades: HashMap::new(),
            next_id: TradeId(FIRST_TRADE_ID),
        }
    }

    /// Insert a newly funded trade, assigning it the next id. Returns the
    /// assigned id.
    pub fn insert(&mut self, mut trade: Trade) -> TradeId {
        let id = self.next_id;
        self.next_id = id.next();
        trade.id = id;
        self.trades.insert(id, trade);
        id
    }

    #[must_use]
    pub fn get(&self, id: TradeId) -> Option<&Trade> {
        self.trades.get(&id)
    }

    pub fn get_mut(&mut self, id: TradeId) -> Option<&mut Trade> {
        self.trades.get_mut(&id)
    }

    #[must_use]
    pub fn contains(&self, id: TradeId) -> bool {
        self.trades.contains_key(&id)
    }

    /// Number of trades ever recorded (open and completed).
    #[must_use]
    pub fn len(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Iterate over all trades, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.values()
    }
}

impl Default for TradeLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tradevault_types::{AccountId, TradeStatus};

    fn blank_trade() -> Trade {
        Trade {
            id: TradeId(0),
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
    fn ids_assigned_monotonically_from_one() {
        let mut ledger = TradeLedger::new();
        let first = ledger.insert(blank_trade());
        let second = ledger.insert(blank_trade());
        assert_eq!(first, TradeId(1));
        assert_eq!(second, TradeId(2));
        assert_eq!(ledger.get(first).unwrap().id, first);
    }

    #[test]
    fn unknown_id_is_none() {
        let ledger = TradeLedger::new();
        assert!(ledger.get(TradeId(99)).is_none());
        assert!(!ledger.contains(TradeId(99)));
    }

    #[test]
    fn completed_trades_are_retained() {
        let mut ledger = TradeLedger::new();
        let id = ledger.insert(blank_trade());
        ledger.get_mut(id).unwrap().status = TradeStatus::Completed;
        assert!(ledger.contains(id));
        assert_eq!(ledger.len(), 1);
    }
}
