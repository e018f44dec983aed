use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Trailing window the request count is reported over
    #[serde(with = "humantime_serde")]
    pub window: Duration,
    /// Prune the request ledger on this interval in addition to every stats
    /// query. Unset means pruning happens only when stats are queried.
    #[serde(with = "humantime_serde", skip_serializing_if = "Option::is_none")]
    pub prune_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(60),
            prune_interval: None,
        }
    }
}
