//! Shared progress counter with two throttled consumers.
//!
//! Workers tick the counter under a mutex; the critical section is O(1) and
//! never invokes a consumer. The bar sink fires at most every 100 ms and at
//! most once per 1% of work (plus a guaranteed final update); a structured
//! log line fires at most once per minute. Reporting is best-effort and
//! never delays cell computation beyond the counter increment.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::info;

/// Minimum interval between bar updates.
const BAR_INTERVAL: Duration = Duration::from_millis(100);
/// Minimum interval between structured log lines.
const LOG_INTERVAL: Duration = Duration::from_secs(60);

/// Consumer of throttled progress updates, e.g. a terminal progress bar.
pub trait ProgressSink: Send + Sync {
    /// Completed and total cell counts. Throttled by the driver.
    fn update(&self, done: usize, total: usize);
    /// Called once after the fill completes.
    fn finish(&self, _total: usize) {}
}

/// Sink that discards every update.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn update(&self, _done: usize, _total: usize) {}
}

struct State {
    done: usize,
    next_bar_at: usize,
    last_bar: Instant,
    last_log: Instant,
}

pub struct Progress<'s> {
    total: usize,
    bar_step: usize,
    sink: &'s dyn ProgressSink,
    state: Mutex<State>,
    started: Instant,
}

impl<'s> Progress<'s> {
    pub fn new(total: usize, sink: &'s dyn ProgressSink) -> Self {
        let now = Instant::now();
        Self {
            total,
            bar_step: (total / 100).max(1),
            sink,
            state: Mutex::new(State {
                done: 0,
                next_bar_at: (total / 100).max(1),
                // Backdate so the first threshold crossing reports at once.
                last_bar: now - BAR_INTERVAL,
                last_log: now,
            }),
            started: now,
        }
    }

    /// Records one completed cell. Consumers run outside the lock.
    pub fn tick(&self) {
        let (done, bar, log);
        {
            let mut st = self.state.lock().expect("progress lock poisoned");
            st.done += 1;
            done = st.done;
            let now = Instant::now();
            bar = (done >= st.next_bar_at && now.duration_since(st.last_bar) >= BAR_INTERVAL)
                || done == self.total;
            if bar {
                st.last_bar = now;
                st.next_bar_at = done + self.bar_step;
            }
            log = now.duration_since(st.last_log) >= LOG_INTERVAL;
            if log {
                st.last_log = now;
            }
        }
        if bar {
            self.sink.update(done, self.total);
        }
        if log {
            let pct = if self.total == 0 {
                100.0
            } else {
                done as f64 * 100.0 / self.total as f64
            };
            info!(
                target: "matrix.compute",
                done,
                total = self.total,
                pct,
                elapsed_s = self.started.elapsed().as_secs(),
                "fill_progress"
            );
        }
    }

    pub fn done(&self) -> usize {
        self.state.lock().expect("progress lock poisoned").done
    }

    pub fn finish(&self) {
        self.sink.finish(self.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        updates: AtomicUsize,
        last_done: AtomicUsize,
        finished: AtomicUsize,
    }

    impl CountingSink {
        fn new() -> Self {
            Self {
                updates: AtomicUsize::new(0),
                last_done: AtomicUsize::new(0),
                finished: AtomicUsize::new(0),
            }
        }
    }

    impl ProgressSink for CountingSink {
        fn update(&self, done: usize, _total: usize) {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.last_done.store(done, Ordering::SeqCst);
        }
        fn finish(&self, _total: usize) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn final_tick_always_reports() {
        let sink = CountingSink::new();
        let p = Progress::new(10, &sink);
        for _ in 0..10 {
            p.tick();
        }
        p.finish();
        assert_eq!(p.done(), 10);
        assert!(sink.updates.load(Ordering::SeqCst) >= 1);
        assert_eq!(sink.last_done.load(Ordering::SeqCst), 10);
        assert_eq!(sink.finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bar_updates_are_throttled_by_step() {
        let sink = CountingSink::new();
        let p = Progress::new(10_000, &sink);
        for _ in 0..10_000 {
            p.tick();
        }
        // At most one update per 1% plus the final one.
        assert!(sink.updates.load(Ordering::SeqCst) <= 101);
    }

    #[test]
    fn counter_is_exact_under_contention() {
        let sink = NullSink;
        let p = Progress::new(4_000, &sink);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1_000 {
                        p.tick();
                    }
                });
            }
        });
        assert_eq!(p.done(), 4_000);
    }
}
