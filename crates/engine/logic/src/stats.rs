//! Decision counters

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Monotonic counters updated on every decision
///
/// Reads are not synchronised with each other, so a snapshot taken under load
/// may be off by a few in-flight decisions.
#[derive(Debug, Default)]
pub struct DecisionCounters {
    evaluations: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    evaluation_nanos: AtomicU64,
}

impl DecisionCounters {
    pub fn new() -> Self {
        DecisionCounters::default()
    }

    pub(crate) fn record_hit(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self, elapsed: Duration) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.evaluation_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub fn snapshot(&self, cache_size: usize) -> PerformanceStats {
        PerformanceStats {
            evaluations: self.evaluations.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            evaluation_time: Duration::from_nanos(self.evaluation_nanos.load(Ordering::Relaxed)),
            cache_size,
        }
    }

    pub fn reset(&self) {
        self.evaluations.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.evaluation_nanos.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time copy of the decision counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerformanceStats {
    /// Every call to the facade, hit or miss
    pub evaluations: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    /// Time spent evaluating rules on cache misses
    pub evaluation_time: Duration,
    pub cache_size: usize,
}

impl PerformanceStats {
    /// Mean evaluation time over all decisions
    pub fn average_time(&self) -> Duration {
        if self.evaluations == 0 {
            return Duration::ZERO;
        }
        let nanos = self.evaluation_time.as_nanos() / u128::from(self.evaluations);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }

    /// Percentage of decisions served from the cache
    pub fn hit_rate(&self) -> f64 {
        if self.evaluations == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.evaluations as f64 * 100.0
    }
}

impl fmt::Display for PerformanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.evaluations == 0 {
            return write!(f, "No evaluations performed yet");
        }

        let avg = self.average_time();
        writeln!(f, "Performance Stats:")?;
        writeln!(f, "  Total Evaluations: {}", self.evaluations)?;
        writeln!(
            f,
            "  Avg Evaluation Time: {:.3}ms ({:.1}µs)",
            avg.as_secs_f64() * 1_000.0,
            avg.as_secs_f64() * 1_000_000.0
        )?;
        writeln!(f, "  Cache Hits: {} ({:.1}%)", self.cache_hits, self.hit_rate())?;
        writeln!(f, "  Cache Misses: {}", self.cache_misses)?;
        write!(f, "  Cache Size: {} entries", self.cache_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_and_reset() {
        let counters = DecisionCounters::new();
        counters.record_miss(Duration::from_micros(30));
        counters.record_hit();
        counters.record_hit();
        counters.record_miss(Duration::from_micros(10));

        let stats = counters.snapshot(2);
        assert_eq!(stats.evaluations, 4);
        assert_eq!(stats.cache_hits, 2);
        assert_eq!(stats.cache_misses, 2);
        assert_eq!(stats.evaluation_time, Duration::from_micros(40));
        assert_eq!(stats.average_time(), Duration::from_micros(10));
        assert!((stats.hit_rate() - 50.0).abs() < f64::EPSILON);

        counters.reset();
        assert_eq!(counters.snapshot(0), PerformanceStats::default());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PerformanceStats::default().to_string(),
            "No evaluations performed yet"
        );

        let stats = PerformanceStats {
            evaluations: 10,
            cache_hits: 9,
            cache_misses: 1,
            evaluation_time: Duration::from_micros(50),
            cache_size: 1,
        };
        let text = stats.to_string();
        assert!(text.contains("Total Evaluations: 10"));
        assert!(text.contains("Cache Hits: 9 (90.0%)"));
        assert!(text.contains("Cache Size: 1 entries"));
    }
}
