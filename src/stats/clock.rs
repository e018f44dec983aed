use std::time::{Duration, Instant};

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Start time of the server, fixed at construction
#[derive(Debug, Clone, Copy)]
pub struct ServerClock {
    started: Instant,
}

impl ServerClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    /// Time elapsed between start and `now`, zero if `now` precedes the start
    pub fn uptime_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started)
    }
}

impl Default for ServerClock {
    fn default() -> Self {
        Self::start()
    }
}

/// Render a duration as `"D days H hours M minutes S seconds"`.
///
/// Each unit is the remainder after extracting the coarser ones; sub-second
/// precision is truncated.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();

    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    format!("{days} days {hours} hours {minutes} minutes {seconds} seconds")
}
