use core::cmp;

use crate::offset_index::OffsetIndex;
use crate::types::VirtualRange;

/// Maps one viewport sample to the index window to materialize.
///
/// Pure: the same inputs always produce the same range. The offset is
/// clamped to `[0, max(0, total - viewport)]` before any tree query, so a
/// sample past the end of the list resolves to the last page rather than an
/// out-of-bounds window.
///
/// Edge cases:
/// - `count == 0` yields [`VirtualRange::EMPTY`].
/// - `viewport_size == 0` collapses the visible span to a single index
///   (overscan still widens the materialized window).
pub fn compute_range(
    scroll_offset: u64,
    viewport_size: u32,
    overscan: usize,
    count: usize,
    offsets: &OffsetIndex,
) -> VirtualRange {
    if count == 0 {
        return VirtualRange::EMPTY;
    }
    debug_assert_eq!(offsets.len(), count);

    let view = viewport_size as u64;
    let total = offsets.total();
    let max_scroll = total.saturating_sub(view);
    let offset = scroll_offset.min(max_scroll);

    let visible_start = offsets.index_at_offset(offset);
    let visible_end = if view == 0 {
        visible_start
    } else {
        // Inclusive bottom edge of the viewport; index_at_offset clamps to
        // the last row when the viewport extends past the list.
        let last = offset.saturating_add(view - 1);
        cmp::max(offsets.index_at_offset(last), visible_start)
    };

    VirtualRange {
        overscan_start: visible_start.saturating_sub(overscan),
        visible_start,
        visible_end,
        overscan_end: cmp::min(count - 1, visible_end.saturating_add(overscan)),
        count,
    }
}
