use serde::{Deserialize, Serialize};

/// Counters for probe and redirect activity.
///
/// Nothing records into this yet; `NetworkSimulator::stats` hands back zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub urls_checked: u64,
    pub urls_alive: u64,
    pub urls_redirected: u64,
    pub hosts_checked: u64,
    pub hosts_resolved: u64,
}
