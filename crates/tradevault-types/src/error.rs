//! Error types for the TradeVault settlement engine.
//!
//! All errors use the `TV_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Funding / party errors
//! - 2xx: Lifecycle errors
//! - 3xx: Settlement errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{Amount, TradeId, TradeStatus};

/// Central error enum for all TradeVault operations.
#[derive(Debug, Error)]
pub enum EscrowError {
    // =================================================================
    // Funding / Party Errors (1xx)
    // =================================================================
    /// A party identity is zero, self-dealing, or not authorized.
    #[error("TV_ERR_100: Invalid party: {reason}")]
    InvalidParty { reason: String },

    /// The trade principal must be positive.
    #[error("TV_ERR_101: Invalid amount: principal must be positive")]
    InvalidAmount,

    /// The value attached at funding did not match principal + buyer fee.
    #[error("TV_ERR_102: Incorrect funding: expected {expected}, sent {sent}")]
    IncorrectFunding { expected: Amount, sent: Amount },

    // =================================================================
    // Lifecycle Errors (2xx)
    // =================================================================
    /// The requested trade does not exist in the ledger.
    #[error("TV_ERR_200: Trade not found: {0}")]
    NotFound(TradeId),

    /// The operation is not valid for the trade's current status.
    #[error("TV_ERR_201: Invalid state: expected {expected}, got {actual}")]
    InvalidState {
        expected: TradeStatus,
        actual: TradeStatus,
    },

    /// The release timeout has not yet elapsed since delivery.
    #[error("TV_ERR_202: Timeout not reached: {remaining_secs}s remaining")]
    TimeoutNotReached { remaining_secs: i64 },

    /// Dispute shares must sum to 10 000 bps.
    #[error("TV_ERR_203: Invalid split: {buyer_bps} + {seller_bps} != 10000")]
    InvalidSplit { buyer_bps: u64, seller_bps: u64 },

    // =================================================================
    // Settlement Errors (3xx)
    // =================================================================
    /// The trade has already been settled (double-settlement guard).
    #[error("TV_ERR_300: Trade already completed: {0}")]
    AlreadyCompleted(TradeId),

    /// A payout leg could not be delivered; the whole settlement aborted.
    #[error("TV_ERR_301: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// Funds conservation invariant violated — critical safety alert.
    #[error("TV_ERR_302: Conservation violation: {reason}")]
    ConservationViolation { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("TV_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, EscrowError>;
