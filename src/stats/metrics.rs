use std::{
    num::NonZeroUsize,
    sync::{Mutex, PoisonError},
    thread,
};

use sysinfo::{Pid, System};
use tokio::runtime::Handle;
use tracing::warn;

const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Process-level figures reported by the stats endpoint
pub trait MetricsSource: Send + Sync {
    /// Memory held by the process, in bytes
    fn memory_bytes(&self) -> u64;

    /// Worker threads the runtime schedules requests on
    fn worker_threads(&self) -> usize;

    /// Processing units available to the process
    fn available_cpus(&self) -> usize;
}

/// Metrics read from the operating system and the tokio runtime
pub struct SystemMetrics {
    system: Mutex<System>,
    pid: Option<Pid>,
}

impl SystemMetrics {
    pub fn new() -> Self {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                warn!(
                    "Unable to determine current pid, memory usage will read 0: {}",
                    e
                );
                None
            }
        };

        Self {
            system: Mutex::new(System::new()),
            pid,
        }
    }
}

impl Default for SystemMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SystemMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemMetrics")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl MetricsSource for SystemMetrics {
    fn memory_bytes(&self) -> u64 {
        let Some(pid) = self.pid else {
            return 0;
        };

        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        if !system.refresh_process(pid) {
            return 0;
        }

        system.process(pid).map(|p| p.memory()).unwrap_or(0)
    }

    fn worker_threads(&self) -> usize {
        Handle::try_current()
            .map(|handle| handle.metrics().num_workers())
            .unwrap_or(1)
    }

    fn available_cpus(&self) -> usize {
        thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}

/// Whole mebibytes, truncated
pub fn bytes_to_mib(bytes: u64) -> u64 {
    bytes / BYTES_PER_MIB
}

pub fn format_ram_usage(bytes: u64) -> String {
    format!("{} MiB", bytes_to_mib(bytes))
}

pub fn format_threads(workers: usize, cpus: usize) -> String {
    format!("{}/{}", workers, cpus)
}
