//! Settlement receipts for the audit trail.
//!
//! Every completed settlement produces a receipt carrying a SHA-256 hash
//! over a canonical encoding of its legs, so an observer can verify that a
//! reported payout matches what actually left custody.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tradevault_types::TradeId;

use crate::transfer::{LegKind, PayoutLeg};

/// Proof that a settlement ran, and exactly what it paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReceipt {
    /// The settled trade.
    pub trade_id: TradeId,
    /// Every leg that was delivered, in execution order.
    pub legs: Vec<PayoutLeg>,
    /// SHA-256 over the canonical encoding of `trade_id` and `legs`.
    pub payload_hash: [u8; 32],
    /// When the receipt was issued.
    pub issued_at: DateTime<Utc>,
}

impl SettlementReceipt {
    /// Issue a receipt for a delivered payout batch.
    #[must_use]
    pub fn new(trade_id: TradeId, legs: Vec<PayoutLeg>) -> Self {
        let payload_hash = Self::hash_payload(trade_id, &legs);
        Self {
            trade_id,
            legs,
            payload_hash,
            issued_at: Utc::now(),
        }
    }

    /// Canonical hash: `trade_id(8) || (to(16) || amount(16) || kind(1))*`.
    ///
    /// The fixed-width little-endian encoding keeps verification
    /// deterministic across hosts.
    #[must_use]
    pub fn hash_payload(trade_id: TradeId, legs: &[PayoutLeg]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(b"tradevault:receipt:v1:");
        hasher.update(trade_id.0.to_le_bytes());
        for leg in legs {
            hasher.update(leg.to.0.as_bytes());
            hasher.update(leg.amount.to_le_bytes());
            hasher.update([leg_kind_tag(leg.kind)]);
        }
        hasher.finalize().into()
    }

    /// Re-derive the hash and compare against the stored one.
    #[must_use]
    pub fn verify(&self) -> bool {
        Self::hash_payload(self.trade_id, &self.legs) == self.payload_hash
    }

    /// Hex rendering of the payload hash, for logs and display.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hex::encode(self.payload_hash)
    }
}

fn leg_kind_tag(kind: LegKind) -> u8 {
    match kind {
        LegKind::SellerPayout => 0,
        LegKind::BuyerPayout => 1,
        LegKind::OperatorFee => 2,
        LegKind::PlatformFee => 3,
    }
}
