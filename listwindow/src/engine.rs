use alloc::vec::Vec;
use core::cmp;

#[cfg(feature = "std")]
use std::time::Instant;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::measure::{CacheKey, MeasurementCache};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::offset_index::OffsetIndex;
use crate::policy::HeightPolicy;
use crate::range::compute_range;
use crate::scroll::{ScrollRequest, resolve_target};
use crate::types::{
    Alignment, Behavior, ScrollDirection, ScrollState, ScrollTarget, ViewItem, ViewState,
    VirtualRange,
};

/// The virtualization engine: the single entry point that owns the
/// measurement cache, the offset index, and the scroll state machine.
///
/// Headless and pull-based: every operation runs synchronously to completion
/// in response to one discrete host event and hands back an immutable
/// [`ViewState`] snapshot. The engine never re-renders anything itself and
/// never owns a timer or an animation: the host delivers viewport samples,
/// millisecond ticks, and observed row heights, and decides when to repaint.
///
/// All inputs are clamped rather than rejected: a bad index or a stale
/// measurement is reported through the configured diagnostics sink and the
/// engine keeps producing valid views.
#[derive(Clone, Debug)]
pub struct Engine<K = u64> {
    config: EngineConfig<K>,
    scroll: ScrollState,
    cache: MeasurementCache<K>,
    offsets: OffsetIndex,
    metrics: Metrics,
    /// Highest item count ever configured; indexes below it were valid at
    /// some point, so late measurements for them are stale rather than
    /// malformed.
    high_count: usize,
    disposed: bool,
}

impl<K: CacheKey> Engine<K> {
    pub fn new(config: EngineConfig<K>) -> Self {
        lw_debug!(
            count = config.count,
            overscan = config.overscan,
            "Engine::new"
        );
        let mut engine = Self {
            scroll: ScrollState::default(),
            cache: MeasurementCache::new(),
            offsets: OffsetIndex::new(0),
            metrics: Metrics::new(),
            high_count: config.count,
            disposed: false,
            config,
        };
        if !engine.config.height_policy.is_valid() {
            engine.report(EngineError::InvalidConfiguration {
                reason: "zero-height policy",
            });
        }
        engine.rebuild();
        engine
    }

    pub fn config(&self) -> &EngineConfig<K> {
        &self.config
    }

    pub fn count(&self) -> usize {
        self.config.count
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replaces item count, height policy, and overscan, rebuilding the
    /// measurement cache and offset index in `O(n)`.
    ///
    /// An unusable policy is reported and the last-known-good configuration
    /// is retained. Measurements cached under stable keys survive the
    /// rebuild; the scroll offset is re-clamped against the new extent.
    pub fn configure(&mut self, count: usize, height_policy: HeightPolicy, overscan: usize) {
        if self.disposed {
            return;
        }
        if !height_policy.is_valid() {
            self.report(EngineError::InvalidConfiguration {
                reason: "zero-height policy",
            });
            return;
        }
        lw_debug!(count, overscan, "configure");
        self.high_count = self.high_count.max(count);
        self.config.count = count;
        self.config.height_policy = height_policy;
        self.config.overscan = overscan;
        self.rebuild();
        self.scroll.offset = self.clamp_offset(self.scroll.offset);
    }

    /// Feeds one host viewport sample (scroll or resize; the engine treats
    /// both as the same kind of event) and returns the resulting view.
    ///
    /// An offset differing from the previous sample marks the engine as
    /// scrolling and stamps `now_ms` for the idle debounce. A size change
    /// never invalidates measurements.
    pub fn on_viewport_change(&mut self, offset: u64, viewport_size: u32, now_ms: u64) -> ViewState {
        if self.disposed {
            return ViewState::empty();
        }
        lw_trace!(offset, viewport_size, now_ms, "viewport sample");

        if viewport_size == 0 {
            self.report(EngineError::InvalidConfiguration {
                reason: "zero-size viewport sample",
            });
        }
        if viewport_size != self.scroll.viewport_size {
            self.metrics.resize_event();
            self.scroll.viewport_size = viewport_size;
        }

        let clamped = self.clamp_offset(offset);
        if clamped != self.scroll.offset {
            self.scroll.direction = if clamped > self.scroll.offset {
                Some(ScrollDirection::Forward)
            } else {
                Some(ScrollDirection::Backward)
            };
            self.scroll.offset = clamped;
            self.scroll.is_scrolling = true;
            self.scroll.last_event_ms = Some(now_ms);
            self.metrics.scroll_event();
        }

        self.compute_view()
    }

    /// Records one observed row height and recomputes the view from the last
    /// known viewport sample. No new host event is required for the
    /// corrected layout to take effect.
    pub fn on_item_measured(&mut self, index: usize, height: u32) -> ViewState {
        if self.disposed {
            return ViewState::empty();
        }
        self.record_measurement(index, height);
        self.compute_view()
    }

    /// Applies a batch of measurements with a single recompute at the end.
    pub fn apply_measurements(
        &mut self,
        measurements: impl IntoIterator<Item = (usize, u32)>,
    ) -> ViewState {
        if self.disposed {
            return ViewState::empty();
        }
        for (index, height) in measurements {
            self.record_measurement(index, height);
        }
        self.compute_view()
    }

    /// Like [`Self::on_item_measured`], but shifts the scroll offset by the
    /// measured delta when the row lies above the viewport, so content on
    /// screen does not visually jump. Returns the applied offset delta.
    pub fn on_item_resized(&mut self, index: usize, height: u32) -> i64 {
        if self.disposed {
            return 0;
        }
        if index >= self.config.count {
            self.report_out_of_range(index);
            return 0;
        }
        let item_start = self.offsets.offset_of(index);
        let delta = self.record_measurement(index, height);
        if delta != 0 && item_start < self.scroll.offset {
            let shifted = if delta > 0 {
                self.scroll.offset.saturating_add(delta as u64)
            } else {
                self.scroll.offset.saturating_sub(delta.unsigned_abs())
            };
            self.scroll.offset = self.clamp_offset(shifted);
            return delta;
        }
        0
    }

    /// Resolves a logical scroll request into a clamped target offset.
    ///
    /// `Behavior::Instant` applies the offset immediately (without marking
    /// the engine as scrolling, which is reserved for real host samples).
    /// `Behavior::Smooth` only returns the target: the host animates and
    /// feeds the intermediate offsets back as viewport samples, and a newer
    /// request simply supersedes the older one.
    pub fn scroll_to(
        &mut self,
        index: usize,
        alignment: Alignment,
        behavior: Behavior,
    ) -> ScrollTarget {
        if self.disposed {
            return ScrollTarget {
                offset: self.scroll.offset,
                behavior,
            };
        }
        let count = self.config.count;
        if count == 0 {
            return ScrollTarget {
                offset: 0,
                behavior,
            };
        }
        let index = if index >= count {
            self.report(EngineError::InvalidIndex { index, count });
            count - 1
        } else {
            index
        };

        let target = resolve_target(
            alignment,
            self.offsets.offset_of(index),
            self.cache.height_of(index),
            self.scroll.offset,
            self.scroll.viewport_size,
            self.offsets.total(),
        );
        lw_trace!(index, target, "scroll_to");
        if behavior == Behavior::Instant {
            self.set_offset(target);
        }
        ScrollTarget {
            offset: target,
            behavior,
        }
    }

    /// Convenience wrapper resolving a bundled [`ScrollRequest`].
    pub fn scroll_request(&mut self, request: ScrollRequest) -> ScrollTarget {
        self.scroll_to(request.index, request.alignment, request.behavior)
    }

    /// Sets the scroll offset programmatically (clamped) without engaging
    /// the scrolling state machine. Used for instant jumps and anchor
    /// restoration.
    pub fn set_offset(&mut self, offset: u64) -> u64 {
        let clamped = self.clamp_offset(offset);
        match clamped.cmp(&self.scroll.offset) {
            cmp::Ordering::Greater => self.scroll.direction = Some(ScrollDirection::Forward),
            cmp::Ordering::Less => self.scroll.direction = Some(ScrollDirection::Backward),
            cmp::Ordering::Equal => {}
        }
        self.scroll.offset = clamped;
        clamped
    }

    /// Advances the scrolling state machine. Flips Scrolling → Idle once the
    /// quiet period since the last offset-changing sample has elapsed, and
    /// returns `true` exactly once per flip.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.disposed || !self.scroll.is_scrolling {
            return false;
        }
        let Some(last) = self.scroll.last_event_ms else {
            return false;
        };
        if now_ms.saturating_sub(last) < self.config.idle_delay_ms {
            return false;
        }
        lw_trace!(now_ms, "scrolling idle");
        self.scroll.is_scrolling = false;
        self.scroll.direction = None;
        self.scroll.last_event_ms = None;
        true
    }

    /// Drops cached measurements (all of them, or only those at and above
    /// `from`) and re-estimates the affected rows. Used when the underlying
    /// item list structurally changes without a full `configure`.
    pub fn invalidate(&mut self, from: Option<usize>) {
        if self.disposed {
            return;
        }
        lw_debug!(from = from.unwrap_or(0), "invalidate");
        match from {
            Some(from) if from > 0 => {
                let key = &self.config.item_key;
                self.cache
                    .invalidate_from(from, &self.config.height_policy, |i| key(i));
            }
            _ => self.cache.invalidate_all(&self.config.height_policy),
        }
        self.offsets = OffsetIndex::from_heights(self.cache.heights());
        self.scroll.offset = self.clamp_offset(self.scroll.offset);
    }

    /// Re-seeds per-index heights from the keyed measurement cache after the
    /// host reordered or replaced items while the count stayed the same.
    pub fn sync_keys(&mut self) {
        if self.disposed {
            return;
        }
        self.rebuild();
        self.scroll.offset = self.clamp_offset(self.scroll.offset);
    }

    /// Recomputes the view from the last known viewport sample.
    pub fn compute_view(&mut self) -> ViewState {
        if self.disposed {
            return ViewState::empty();
        }
        #[cfg(feature = "std")]
        let started = Instant::now();

        let range = self.virtual_range();
        let mut items = Vec::with_capacity(range.len());
        self.walk_items(range, |item| items.push(item));
        self.metrics.recompute();
        #[cfg(feature = "std")]
        self.metrics
            .record_latency(started.elapsed().as_micros() as u64);

        ViewState {
            range,
            items,
            total_height: self.offsets.total(),
            is_scrolling: self.scroll.is_scrolling,
        }
    }

    /// The current index window, computed without allocating.
    pub fn virtual_range(&self) -> VirtualRange {
        if self.disposed {
            return VirtualRange::EMPTY;
        }
        compute_range(
            self.scroll.offset,
            self.scroll.viewport_size,
            self.config.overscan,
            self.config.count,
            &self.offsets,
        )
    }

    /// Zero-allocation iteration over the current window's row descriptors.
    /// Unlike [`Self::compute_view`], this does not count as a recompute.
    pub fn for_each_view_item(&self, f: impl FnMut(ViewItem)) {
        self.walk_items(self.virtual_range(), f);
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll.offset
    }

    pub fn viewport_size(&self) -> u32 {
        self.scroll.viewport_size
    }

    pub fn is_scrolling(&self) -> bool {
        self.scroll.is_scrolling
    }

    pub fn direction(&self) -> Option<ScrollDirection> {
        self.scroll.direction
    }

    pub fn total_height(&self) -> u64 {
        self.offsets.total()
    }

    pub fn item_start(&self, index: usize) -> Option<u64> {
        (index < self.config.count).then(|| self.offsets.offset_of(index))
    }

    pub fn item_height(&self, index: usize) -> Option<u32> {
        (index < self.config.count).then(|| self.cache.height_of(index))
    }

    pub fn is_measured(&self, index: usize) -> bool {
        self.cache.is_measured(index)
    }

    pub fn key_for(&self, index: usize) -> K {
        (self.config.item_key)(index)
    }

    pub fn max_scroll_offset(&self) -> u64 {
        self.offsets
            .total()
            .saturating_sub(self.scroll.viewport_size as u64)
    }

    pub fn clamp_offset(&self, offset: u64) -> u64 {
        offset.min(self.max_scroll_offset())
    }

    /// Releases every retained structure. Subsequent queries return empty
    /// views and further mutations are ignored; the host is responsible for
    /// detaching the scroll/resize observers that fed this engine.
    pub fn dispose(&mut self) {
        lw_debug!("dispose");
        self.cache.release();
        self.offsets = OffsetIndex::new(0);
        self.scroll = ScrollState::default();
        self.disposed = true;
    }

    fn rebuild(&mut self) {
        let key = &self.config.item_key;
        self.cache
            .rebuild(self.config.count, &self.config.height_policy, |i| key(i));
        self.offsets = OffsetIndex::from_heights(self.cache.heights());
    }

    /// Shared measurement path. Returns the height delta applied to the
    /// offset index (zero for no-ops and rejected indexes).
    fn record_measurement(&mut self, index: usize, height: u32) -> i64 {
        if index >= self.config.count {
            self.report_out_of_range(index);
            return 0;
        }
        let key = (self.config.item_key)(index);
        let delta = self.cache.record(index, key, height);
        if delta != 0 {
            self.offsets.update(index, delta);
        }
        lw_trace!(index, height, delta, "measurement");
        self.metrics.measurement();
        delta
    }

    fn report_out_of_range(&mut self, index: usize) {
        let count = self.config.count;
        let error = if index < self.high_count {
            EngineError::StaleMeasurement { index, count }
        } else {
            EngineError::InvalidIndex { index, count }
        };
        self.report(error);
    }

    fn report(&mut self, error: EngineError) {
        lw_warn!(%error, "recoverable anomaly");
        self.metrics.error();
        if let Some(sink) = &self.config.sink {
            sink.report(&error);
        }
    }

    fn walk_items(&self, range: VirtualRange, mut f: impl FnMut(ViewItem)) {
        if range.is_empty() {
            return;
        }
        let mut offset_top = self.offsets.offset_of(range.overscan_start);
        for index in range.overscan_start..=range.overscan_end {
            let height = self.cache.height_of(index);
            f(ViewItem {
                index,
                offset_top,
                height,
                is_visible: range.is_visible(index),
            });
            offset_top = offset_top.saturating_add(height as u64);
        }
    }
}
