use std::time::{Duration, Instant};

use super::{
    clock::{format_uptime, ServerClock},
    ledger::RequestLedger,
    metrics::{format_ram_usage, format_threads, MetricsSource},
};

/// Figures reported by the stats endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub ram_usage: String,
    pub threads: String,
    pub uptime: String,
    pub requests: usize,
}

/// Request accounting and process figures for one server instance.
///
/// Owned by the server and shared with the accounting middleware and the
/// stats handler.
pub struct StatsTracker {
    ledger: RequestLedger,
    clock: ServerClock,
    window: Duration,
    metrics: Box<dyn MetricsSource>,
}

impl StatsTracker {
    pub fn new(window: Duration, metrics: Box<dyn MetricsSource>) -> Self {
        Self {
            ledger: RequestLedger::new(),
            clock: ServerClock::start(),
            window,
            metrics,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn clock(&self) -> &ServerClock {
        &self.clock
    }

    pub fn ledger(&self) -> &RequestLedger {
        &self.ledger
    }

    /// Record a request that has just completed
    pub fn record_request(&self) {
        self.ledger.record(Instant::now());
    }

    /// Drop ledger entries that no window query can count anymore
    pub fn prune(&self) -> usize {
        self.ledger.prune(Instant::now(), self.window)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.snapshot_at(Instant::now())
    }

    pub fn snapshot_at(&self, now: Instant) -> StatsSnapshot {
        StatsSnapshot {
            ram_usage: format_ram_usage(self.metrics.memory_bytes()),
            threads: format_threads(
                self.metrics.worker_threads(),
                self.metrics.available_cpus(),
            ),
            uptime: format_uptime(self.clock.uptime_at(now)),
            requests: self.ledger.count_and_prune(now, self.window),
        }
    }
}

impl std::fmt::Debug for StatsTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsTracker")
            .field("clock", &self.clock)
            .field("window", &self.window)
            .field("recorded", &self.ledger.len())
            .finish_non_exhaustive()
    }
}
