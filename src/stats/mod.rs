mod clock;
mod ledger;
mod metrics;
mod tracker;

pub use clock::{format_uptime, ServerClock};
pub use ledger::RequestLedger;
pub use metrics::{bytes_to_mib, format_ram_usage, format_threads, MetricsSource, SystemMetrics};
pub use tracker::{StatsSnapshot, StatsTracker};
