//! # tradevault-types
//!
//! Shared types, errors, and configuration for the **TradeVault** escrow
//! settlement engine.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`TradeId`], [`AccountId`]
//! - **Trade model**: [`Trade`], [`TradeStatus`], [`Amount`]
//! - **Fee model**: [`FeeSchedule`], [`FeeSplit`]
//! - **Events**: [`TradeEvent`]
//! - **Configuration**: [`EngineConfig`]
//! - **Errors**: [`EscrowError`] with `TV_ERR_` prefix codes
//! - **Constants**: fee defaults, release timeout, bps scale

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fees;
pub mod ids;
pub mod trade;

// Re-export all primary types at crate root for ergonomic imports:
//   use tradevault_types::{Trade, TradeStatus, EscrowError, ...};

pub use config::*;
pub use error::*;
pub use event::*;
pub use fees::*;
pub use ids::*;
pub use trade::*;

// Constants are accessed via `tradevault_types::constants::FOO`
// (not re-exported to avoid name collisions).
