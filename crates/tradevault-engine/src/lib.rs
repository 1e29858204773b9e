//! # tradevault-engine
//!
//! The custody core of TradeVault: the authoritative trade ledger and the
//! lifecycle controller that is the only code path allowed to mutate it.
//!
//! ## Architecture
//!
//! The [`SettlementEngine`] receives role-authenticated commands from an
//! external trade coordinator and:
//! 1. Validates the calling identity and the trade's current status
//! 2. Mutates the ledger (forward-only status machine)
//! 3. Accrues basis-point fees onto per-trade pending balances
//! 4. Runs the one atomic multi-party payout that ends a trade
//! 5. Emits lifecycle events and settlement receipts for observers
//!
//! Every mutating operation takes `&mut self` and runs to completion before
//! returning, so per-trade execution is single-writer by construction.

pub mod dispute;
pub mod engine;
pub mod ledger;

pub use engine::SettlementEngine;
pub use ledger::TradeLedger;
