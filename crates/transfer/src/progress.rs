use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding-window estimate of transfer throughput.
///
/// Samples older than the window are discarded, so a short stall shows up
/// in the rate instead of being averaged away over the whole transfer.
pub struct RateMeter {
    samples: VecDeque<(Instant, u64)>,
    window: Duration,
}

impl RateMeter {
    /// Default sampling window.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

    pub fn new(window: Duration) -> Self {
        Self {
            samples: VecDeque::new(),
            window,
        }
    }

    /// Records `bytes` transferred at the current instant.
    pub fn record(&mut self, bytes: u64) {
        let now = Instant::now();
        self.samples.push_back((now, bytes));

        while let Some(&(t, _)) = self.samples.front() {
            if now.duration_since(t) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Average throughput in bytes/second within the window.
    ///
    /// Returns 0.0 with fewer than two samples.
    pub fn bytes_per_second(&self) -> f64 {
        let (Some(&(first, _)), Some(&(last, _))) =
            (self.samples.front(), self.samples.back())
        else {
            return 0.0;
        };

        let elapsed = last.duration_since(first);
        if self.samples.len() < 2 || elapsed.is_zero() {
            return 0.0;
        }

        let total: u64 = self.samples.iter().map(|&(_, b)| b).sum();
        total as f64 / elapsed.as_secs_f64()
    }

    /// Estimated time to transfer `remaining` bytes at the current rate.
    ///
    /// `None` while the rate is unknown or zero.
    pub fn eta(&self, remaining: u64) -> Option<Duration> {
        let rate = self.bytes_per_second();
        if rate <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(remaining as f64 / rate))
    }

    /// Discards all samples, ready for the next transfer.
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

impl Default for RateMeter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_samples_means_zero_rate() {
        let meter = RateMeter::default();
        assert_eq!(meter.bytes_per_second(), 0.0);
        assert!(meter.eta(1000).is_none());
    }

    #[test]
    fn single_sample_means_zero_rate() {
        let mut meter = RateMeter::default();
        meter.record(512);
        assert_eq!(meter.bytes_per_second(), 0.0);
    }

    #[test]
    fn rate_is_positive_after_two_samples() {
        let mut meter = RateMeter::default();
        meter.record(500);
        std::thread::sleep(Duration::from_millis(50));
        meter.record(500);

        // Timing is imprecise; just check a sane sign.
        assert!(meter.bytes_per_second() > 0.0);
        assert!(meter.eta(10_000).is_some());
    }

    #[test]
    fn old_samples_fall_out_of_the_window() {
        let mut meter = RateMeter::new(Duration::from_millis(20));
        meter.record(1_000_000);
        std::thread::sleep(Duration::from_millis(60));
        meter.record(10);

        // The large early sample is outside the window now.
        assert_eq!(meter.samples.len(), 1);
    }

    #[test]
    fn reset_clears_samples() {
        let mut meter = RateMeter::default();
        meter.record(100);
        meter.record(200);
        meter.reset();
        assert_eq!(meter.bytes_per_second(), 0.0);
    }
}
