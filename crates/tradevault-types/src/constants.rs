//! System-wide constants for the TradeVault settlement engine.

/// Basis-point denominator: 10 000 bps = 100%.
pub const BPS_SCALE: u128 = 10_000;

/// Default per-side platform fee in basis points (2.5%).
pub const DEFAULT_PLATFORM_FEE_BPS: u64 = 250;

/// Operator's share of the combined fee pool, in basis points of
/// `DEFAULT_TOTAL_FEE_BPS` (100 of 500 = one fifth of collected fees).
pub const DEFAULT_OPERATOR_SHARE_BPS: u64 = 100;

/// Combined fee pool in basis points: buyer side + seller side.
pub const DEFAULT_TOTAL_FEE_BPS: u64 = 2 * DEFAULT_PLATFORM_FEE_BPS;

/// Default delay after delivery before an unapproved trade may be
/// released to the seller (one day).
pub const DEFAULT_RELEASE_TIMEOUT_SECS: i64 = 86_400;

/// Trade ids are assigned monotonically starting from this value.
pub const FIRST_TRADE_ID: u64 = 1;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "TradeVault";
