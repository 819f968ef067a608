use core::fmt;

use listwindow::Engine;

use crate::ListKey;

/// A visual position pinned to an item identity rather than an offset.
///
/// Typical use: a task list or chat timeline that prepends items (load
/// older entries above) and must not appear to jump. Capture before the data
/// change, apply after, and the row the user was looking at stays put.
#[derive(Clone, PartialEq, Eq)]
pub struct ScrollAnchor<K> {
    pub key: K,
    /// Distance from the anchor row's top edge to the viewport's top edge.
    pub offset_from_start: u64,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("key", &self.key)
            .field("offset_from_start", &self.offset_from_start)
            .finish()
    }
}

/// Captures an anchor for the first visible row, or `None` when nothing is
/// visible.
pub fn capture_first_visible_anchor<K: ListKey>(engine: &Engine<K>) -> Option<ScrollAnchor<K>> {
    let range = engine.virtual_range();
    if range.is_empty() {
        return None;
    }
    let index = range.visible_start;
    let start = engine.item_start(index)?;
    Some(ScrollAnchor {
        key: engine.key_for(index),
        offset_from_start: engine.scroll_offset().saturating_sub(start),
    })
}

/// Re-applies a captured anchor against the current dataset.
///
/// The host supplies `key_to_index` for the *new* item order. Returns `true`
/// when the anchor was found and the offset adjusted.
pub fn apply_anchor<K: ListKey>(
    engine: &mut Engine<K>,
    anchor: &ScrollAnchor<K>,
    mut key_to_index: impl FnMut(&K) -> Option<usize>,
) -> bool {
    let Some(index) = key_to_index(&anchor.key) else {
        return false;
    };
    let Some(start) = engine.item_start(index) else {
        return false;
    };
    engine.set_offset(start.saturating_add(anchor.offset_from_start));
    true
}
