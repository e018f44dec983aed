use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

/// Completion times of served requests, oldest first.
///
/// Appends and window queries share a single lock, so a query never observes
/// a half-applied prune and concurrent appends are never lost. Entries are
/// only removed when the window is queried (or pruned explicitly); a ledger
/// that is never queried keeps growing.
#[derive(Debug, Default)]
pub struct RequestLedger {
    timestamps: Mutex<Vec<Instant>>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the completion time of a request
    pub fn record(&self, now: Instant) {
        self.lock().push(now);
    }

    /// Count entries newer than `now - window`, after dropping every entry at
    /// or before `now - 2 * window`.
    pub fn count_and_prune(&self, now: Instant, window: Duration) -> usize {
        let mut timestamps = self.lock();

        retain_recent(&mut timestamps, now, window);

        match now.checked_sub(window) {
            Some(cutoff) => timestamps.iter().filter(|ts| **ts > cutoff).count(),
            None => timestamps.len(),
        }
    }

    /// Drop every entry at or before `now - 2 * window`, returning how many
    /// were removed.
    pub fn prune(&self, now: Instant, window: Duration) -> usize {
        let mut timestamps = self.lock();
        let before = timestamps.len();
        retain_recent(&mut timestamps, now, window);
        before - timestamps.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Plain timestamps stay consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, Vec<Instant>> {
        self.timestamps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn retain_recent(timestamps: &mut Vec<Instant>, now: Instant, window: Duration) {
    let max_age = window
        .checked_mul(2)
        .and_then(|retention| now.checked_sub(retention));

    if let Some(max_age) = max_age {
        timestamps.retain(|ts| *ts > max_age);
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    // Far enough from the epoch of `Instant` that `now - 2W` is representable
    fn base() -> Instant {
        Instant::now() + Duration::from_secs(3600)
    }

    fn secs(base: Instant, offset: u64) -> Instant {
        base + Duration::from_secs(offset)
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = RequestLedger::new();
        assert_eq!(ledger.count_and_prune(base(), WINDOW), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_window_scenario() {
        let ledger = RequestLedger::new();
        let base = base();

        for offset in [0, 30, 59, 61] {
            ledger.record(secs(base, offset));
        }

        // cutoff is t=1s, so t=0s falls outside the window but is retained
        assert_eq!(ledger.count_and_prune(secs(base, 61), WINDOW), 3);
        assert_eq!(ledger.len(), 4);
    }

    #[test]
    fn test_entry_at_cutoff_is_excluded() {
        let ledger = RequestLedger::new();
        let base = base();

        ledger.record(secs(base, 0));
        ledger.record(secs(base, 1));

        assert_eq!(ledger.count_and_prune(secs(base, 60), WINDOW), 1);
    }

    #[test]
    fn test_prunes_entries_older_than_twice_the_window() {
        let ledger = RequestLedger::new();
        let base = base();

        for offset in [0, 10, 60, 100, 130, 150] {
            ledger.record(secs(base, offset));
        }

        let now = secs(base, 130);
        // max_age is t=10s (inclusive), cutoff is t=70s
        assert_eq!(ledger.count_and_prune(now, WINDOW), 3);
        assert_eq!(ledger.len(), 4);

        let max_age = now - WINDOW * 2;
        let timestamps = ledger.lock();
        assert!(timestamps.iter().all(|ts| *ts > max_age));
    }

    #[test]
    fn test_repeated_query_is_stable() {
        let ledger = RequestLedger::new();
        let base = base();

        for offset in [5, 50, 90, 170, 175, 179] {
            ledger.record(secs(base, offset));
        }

        let now = secs(base, 180);
        let first = ledger.count_and_prune(now, WINDOW);
        let len_after_first = ledger.len();
        let second = ledger.count_and_prune(now, WINDOW);

        assert_eq!(first, second);
        assert_eq!(first, 3);
        assert_eq!(ledger.len(), len_after_first);
    }

    #[test]
    fn test_prune_preserves_order() {
        let ledger = RequestLedger::new();
        let base = base();

        for offset in [0, 200, 150, 250, 10] {
            ledger.record(secs(base, offset));
        }

        assert_eq!(ledger.prune(secs(base, 260), WINDOW), 2);

        let timestamps = ledger.lock();
        assert_eq!(
            *timestamps,
            vec![secs(base, 200), secs(base, 150), secs(base, 250)]
        );
    }

    #[test]
    fn test_zero_window() {
        let ledger = RequestLedger::new();
        let base = base();

        ledger.record(secs(base, 10));
        ledger.record(secs(base, 20));

        assert_eq!(ledger.count_and_prune(secs(base, 20), Duration::ZERO), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unrepresentable_bounds_keep_everything() {
        let ledger = RequestLedger::new();
        let now = Instant::now();

        ledger.record(now);

        assert_eq!(ledger.count_and_prune(now, Duration::MAX), 1);
        assert_eq!(ledger.prune(now, Duration::MAX), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_grows_without_queries() {
        let ledger = RequestLedger::new();
        let base = base();

        for offset in 0..10_000 {
            ledger.record(secs(base, offset));
        }

        assert_eq!(ledger.len(), 10_000);
    }

    #[test]
    fn test_concurrent_records() {
        const WRITERS: usize = 16;
        const PER_WRITER: usize = 1_000;

        let ledger = Arc::new(RequestLedger::new());
        let base = base();

        let handles: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..PER_WRITER {
                        let nanos = (writer * PER_WRITER + i) as u64;
                        ledger.record(base + Duration::from_nanos(nanos));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ledger.len(), WRITERS * PER_WRITER);

        let mut timestamps = ledger.lock().clone();
        timestamps.sort();
        timestamps.dedup();
        assert_eq!(timestamps.len(), WRITERS * PER_WRITER);
    }

    #[test]
    fn test_queries_alongside_records() {
        const WRITERS: usize = 8;
        const PER_WRITER: usize = 1_000;
        const READERS: usize = 4;
        const TOTAL: usize = WRITERS * PER_WRITER;

        let ledger = Arc::new(RequestLedger::new());
        let base = base();
        // Every record lies well inside (now - W, now]
        let now = secs(base, 1);
        let window = Duration::from_secs(3600);

        let writers: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    for i in 0..PER_WRITER {
                        let nanos = (writer * PER_WRITER + i) as u64;
                        ledger.record(base + Duration::from_nanos(nanos));
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..PER_WRITER {
                        let count = ledger.count_and_prune(now, window);
                        assert!(count <= TOTAL);
                        assert!(count >= last, "count went from {} to {}", last, count);
                        last = count;
                        assert_eq!(ledger.prune(now, window), 0);
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        assert_eq!(ledger.len(), TOTAL);
        assert_eq!(ledger.count_and_prune(now, window), TOTAL);
    }
}
