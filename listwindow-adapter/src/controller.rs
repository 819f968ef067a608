use listwindow::{Alignment, Behavior, Engine, EngineConfig, ScrollTarget, ViewState};

use crate::slot::{MeasureQueue, RowSlot};
use crate::tween::{Easing, Tween};
use crate::{ListKey, ScrollAnchor, apply_anchor, capture_first_visible_anchor};

const DEFAULT_TWEEN_MS: u64 = 250;

/// A framework-neutral controller wrapping a [`listwindow::Engine`].
///
/// The engine is deliberately clock-free; the controller is where wall-clock
/// concerns live. Hosts drive it with three calls:
/// - [`Controller::on_viewport`] when a scroll/resize event arrives
/// - [`Controller::tick`] each frame or timer tick (tween progress + idle
///   debouncing)
/// - [`Controller::scroll_to`] for programmatic navigation
///
/// Smooth scrolling is last-write-wins: a new request replaces the active
/// tween, and any real viewport event cancels it (the user's hand beats the
/// animation).
#[derive(Clone, Debug)]
pub struct Controller<K = u64> {
    engine: Engine<K>,
    tween: Option<Tween>,
}

impl<K: ListKey> Controller<K> {
    pub fn new(config: EngineConfig<K>) -> Self {
        Self {
            engine: Engine::new(config),
            tween: None,
        }
    }

    pub fn from_engine(engine: Engine<K>) -> Self {
        Self {
            engine,
            tween: None,
        }
    }

    pub fn engine(&self) -> &Engine<K> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<K> {
        &mut self.engine
    }

    pub fn into_engine(self) -> Engine<K> {
        self.engine
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    pub fn cancel_animation(&mut self) {
        self.tween = None;
    }

    /// Forwards a real host viewport sample. Cancels any active tween.
    pub fn on_viewport(&mut self, offset: u64, viewport_size: u32, now_ms: u64) -> ViewState {
        self.cancel_animation();
        self.engine.on_viewport_change(offset, viewport_size, now_ms)
    }

    /// Advances the controller one tick.
    ///
    /// While a tween is active this samples it, feeds the offset to the
    /// engine as a synthetic viewport sample, and returns the new offset so
    /// the host can move its real scroll container. Otherwise it just runs
    /// the idle debounce.
    pub fn tick(&mut self, now_ms: u64) -> Option<u64> {
        let Some(tween) = self.tween else {
            self.engine.tick(now_ms);
            return None;
        };

        let offset = tween.sample(now_ms);
        let viewport = self.engine.viewport_size();
        self.engine.on_viewport_change(offset, viewport, now_ms);

        if tween.is_done(now_ms) {
            self.tween = None;
        }
        Some(self.engine.scroll_offset())
    }

    /// Resolves and executes a logical scroll request.
    ///
    /// `Behavior::Instant` jumps immediately; `Behavior::Smooth` starts a
    /// tween with the default duration and easing (see
    /// [`Controller::scroll_to_animated`] to choose them).
    pub fn scroll_to(
        &mut self,
        index: usize,
        alignment: Alignment,
        behavior: Behavior,
        now_ms: u64,
    ) -> ScrollTarget {
        match behavior {
            Behavior::Instant => {
                self.cancel_animation();
                self.engine.scroll_to(index, alignment, Behavior::Instant)
            }
            Behavior::Smooth => self.scroll_to_animated(
                index,
                alignment,
                now_ms,
                DEFAULT_TWEEN_MS,
                Easing::SmoothStep,
            ),
        }
    }

    /// Starts (or replaces) a tween toward an index.
    pub fn scroll_to_animated(
        &mut self,
        index: usize,
        alignment: Alignment,
        now_ms: u64,
        duration_ms: u64,
        easing: Easing,
    ) -> ScrollTarget {
        let target = self.engine.scroll_to(index, alignment, Behavior::Smooth);
        self.tween = Some(Tween::new(
            self.engine.scroll_offset(),
            target.offset,
            now_ms,
            duration_ms,
            easing,
        ));
        target
    }

    /// Computes the current view and hands each row to `paint` as a
    /// [`RowSlot`]. Observed heights queue into `queue`; call
    /// [`Controller::flush_measurements`] afterwards to apply them.
    pub fn render_pass(
        &mut self,
        queue: &MeasureQueue,
        mut paint: impl FnMut(RowSlot<'_>),
    ) -> ViewState {
        let view = self.engine.compute_view();
        for item in &view.items {
            paint(RowSlot {
                item: *item,
                is_scrolling: view.is_scrolling,
                queue,
            });
        }
        view
    }

    /// Applies all queued measurements in one batch (a single recompute).
    /// Returns `None` when the queue was empty.
    pub fn flush_measurements(&mut self, queue: &MeasureQueue) -> Option<ViewState> {
        let batch = queue.drain();
        if batch.is_empty() {
            return None;
        }
        Some(self.engine.apply_measurements(batch))
    }

    pub fn capture_anchor(&self) -> Option<ScrollAnchor<K>> {
        capture_first_visible_anchor(&self.engine)
    }

    /// Re-applies a captured anchor. Cancels any active tween.
    pub fn apply_anchor(
        &mut self,
        anchor: &ScrollAnchor<K>,
        key_to_index: impl FnMut(&K) -> Option<usize>,
    ) -> bool {
        self.cancel_animation();
        apply_anchor(&mut self.engine, anchor, key_to_index)
    }
}
