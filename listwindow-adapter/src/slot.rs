use alloc::vec::Vec;
use core::cell::RefCell;

use listwindow::ViewItem;

/// Collects observed row heights during a render pass.
///
/// Rendering iterates immutably over a view snapshot while measurements
/// mutate the engine, so slots queue their observations here and the host
/// applies them in one batch (one recompute) via
/// `Controller::flush_measurements`.
#[derive(Debug, Default)]
pub struct MeasureQueue {
    pending: RefCell<Vec<(usize, u32)>>,
}

impl MeasureQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    pub(crate) fn push(&self, index: usize, height: u32) {
        self.pending.borrow_mut().push((index, height));
    }

    pub(crate) fn drain(&self) -> Vec<(usize, u32)> {
        core::mem::take(&mut *self.pending.borrow_mut())
    }
}

/// One row handed to the renderer: layout, visibility, and a measurement
/// channel back into the engine.
///
/// The renderer resolves `index` against the host's data store, paints, and
/// calls [`RowSlot::measure`] once the real height is known.
#[derive(Debug)]
pub struct RowSlot<'a> {
    pub(crate) item: ViewItem,
    pub(crate) is_scrolling: bool,
    pub(crate) queue: &'a MeasureQueue,
}

impl RowSlot<'_> {
    pub fn index(&self) -> usize {
        self.item.index
    }

    pub fn offset_top(&self) -> u64 {
        self.item.offset_top
    }

    pub fn height(&self) -> u32 {
        self.item.height
    }

    pub fn is_visible(&self) -> bool {
        self.item.is_visible
    }

    /// Whether the list was scrolling when this frame was computed. Rows can
    /// use this to paint cheap placeholders during fast scrolls.
    pub fn is_scrolling(&self) -> bool {
        self.is_scrolling
    }

    /// Reports the row's rendered height. Heights matching the current
    /// estimate are skipped; everything else is queued for the next flush.
    pub fn measure(&self, observed_height: u32) {
        if observed_height != self.item.height {
            self.queue.push(self.item.index, observed_height);
        }
    }
}
