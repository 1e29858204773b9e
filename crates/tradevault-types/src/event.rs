//! Lifecycle events emitted by the engine for audit and UI refresh.
//!
//! Observers (the presentation layer, audit tooling) consume these from the
//! engine's event log; the engine mirrors each one as a `tracing` record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, TradeId};

/// One entry in the engine's append-only event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TradeEvent {
    /// A trade was created and funded in one step.
    Funded {
        trade_id: TradeId,
        buyer: AccountId,
        seller: AccountId,
        amount: Amount,
        value_received: Amount,
    },
    /// The operator confirmed delivery.
    Delivered {
        trade_id: TradeId,
        at: DateTime<Utc>,
    },
    /// Buyer approval (via the operator) triggered settlement.
    Approved { trade_id: TradeId },
    /// The release timeout elapsed and the seller was paid out.
    TimedOut { trade_id: TradeId },
    /// A party raised a dispute.
    Disputed {
        trade_id: TradeId,
        raised_by: AccountId,
    },
    /// Arbitration supplied a split and settlement ran.
    DisputeResolved {
        trade_id: TradeId,
        buyer_share_bps: u64,
        seller_share_bps: u64,
    },
    /// One payout leg of a settlement.
    Released {
        trade_id: TradeId,
        to: AccountId,
        amount: Amount,
    },
    /// A fee split was accrued onto the trade's pending balances.
    FeesAccrued {
        trade_id: TradeId,
        operator: Amount,
        platform: Amount,
    },
}

impl TradeEvent {
    /// The trade this event belongs to.
    #[must_use]
    pub fn trade_id(&self) -> TradeId {
        match self {
            Self::Funded { trade_id, .. }
            | Self::Delivered { trade_id, .. }
            | Self::Approved { trade_id }
            | Self::TimedOut { trade_id }
            | Self::Disputed { trade_id, .. }
            | Self::DisputeResolved { trade_id, .. }
            | Self::Released { trade_id, .. }
            | Self::FeesAccrued { trade_id, .. } => *trade_id,
        }
    }
}
