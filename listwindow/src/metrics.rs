/// Rolling average over the most recent recompute latencies.
const LATENCY_WINDOW: usize = 32;

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    scroll_events: u64,
    resize_events: u64,
    recomputes: u64,
    measurements: u64,
    errors_reported: u64,
    latency_micros: [u64; LATENCY_WINDOW],
    latency_filled: usize,
    latency_cursor: usize,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self {
            scroll_events: 0,
            resize_events: 0,
            recomputes: 0,
            measurements: 0,
            errors_reported: 0,
            latency_micros: [0; LATENCY_WINDOW],
            latency_filled: 0,
            latency_cursor: 0,
        }
    }

    pub(crate) fn scroll_event(&mut self) {
        self.scroll_events += 1;
    }

    pub(crate) fn resize_event(&mut self) {
        self.resize_events += 1;
    }

    pub(crate) fn recompute(&mut self) {
        self.recomputes += 1;
    }

    pub(crate) fn measurement(&mut self) {
        self.measurements += 1;
    }

    pub(crate) fn error(&mut self) {
        self.errors_reported += 1;
    }

    #[cfg_attr(not(feature = "std"), allow(dead_code))]
    pub(crate) fn record_latency(&mut self, micros: u64) {
        self.latency_micros[self.latency_cursor] = micros;
        self.latency_cursor = (self.latency_cursor + 1) % LATENCY_WINDOW;
        self.latency_filled = (self.latency_filled + 1).min(LATENCY_WINDOW);
    }

    fn average_latency_micros(&self) -> u64 {
        if self.latency_filled == 0 {
            return 0;
        }
        let sum: u64 = self.latency_micros[..self.latency_filled].iter().sum();
        sum / self.latency_filled as u64
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            scroll_events: self.scroll_events,
            resize_events: self.resize_events,
            recomputes: self.recomputes,
            measurements: self.measurements,
            errors_reported: self.errors_reported,
            avg_recompute_micros: self.average_latency_micros(),
        }
    }
}

/// Read-only observability counters.
///
/// All counters are monotonically increasing for the engine's lifetime
/// (including across `configure`/`invalidate`); the latency figure is a
/// rolling average over the most recent recomputes, in microseconds, and is
/// always zero in `no_std` builds where the engine has no clock.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricsSnapshot {
    pub scroll_events: u64,
    pub resize_events: u64,
    pub recomputes: u64,
    pub measurements: u64,
    pub errors_reported: u64,
    pub avg_recompute_micros: u64,
}
