//! Configuration for a TradeVault engine instance.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RELEASE_TIMEOUT_SECS;
use crate::{AccountId, FeeSchedule};

/// Engine configuration: the privileged identities and the fee/timeout
/// parameters that govern every trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// The privileged identity allowed to drive state transitions.
    pub operator: AccountId,
    /// The fee-collecting party taking the majority of each fee pool.
    pub platform_receiver: AccountId,
    /// Fee parameters (bps rates and the operator's split).
    pub fees: FeeSchedule,
    /// Seconds after delivery before an unapproved trade may be released.
    pub release_timeout_secs: i64,
}

impl EngineConfig {
    /// Config with default fees and timeout for the given identities.
    #[must_use]
    pub fn new(operator: AccountId, platform_receiver: AccountId) -> Self {
        Self {
            operator,
            platform_receiver,
            fees: FeeSchedule::default(),
            release_timeout_secs: DEFAULT_RELEASE_TIMEOUT_SECS,
        }
    }

    /// The release timeout as a `chrono::Duration`.
    #[must_use]
    pub fn release_timeout(&self) -> Duration {
        Duration::seconds(self.release_timeout_secs)
    }
}
