//! # tradevault-settlement
//!
//! The payout half of the TradeVault engine: planning the legs of a
//! settlement, executing them through a batch-atomic [`TransferSink`],
//! issuing hashed [`SettlementReceipt`]s, and checking the funds
//! conservation invariant after the fact.
//!
//! ## Settlement discipline
//!
//! 1. Accrue the settlement-side fee onto the trade's pending balances
//! 2. Snapshot-and-zero both pending balances (one step)
//! 3. Build payout legs; zero-amount legs are dropped
//! 4. Execute all legs as one atomic batch — all or none
//!
//! The lifecycle controller (in `tradevault-engine`) wraps this with the
//! status flip and the rollback on transfer failure.

pub mod conservation;
pub mod payout;
pub mod receipt;
pub mod transfer;

pub use conservation::FundsConservation;
pub use payout::{dispute_plan, release_plan, PayoutPlan};
pub use receipt::SettlementReceipt;
pub use transfer::{InMemoryBank, LegKind, PayoutLeg, TransferSink};
