use crate::types::{Alignment, Behavior};

/// A logical scroll request, before resolution against the current layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollRequest {
    pub index: usize,
    pub alignment: Alignment,
    pub behavior: Behavior,
}

/// Resolves an alignment against a row's geometry into a clamped offset.
///
/// `item_start`/`item_height` are the target row's current layout,
/// `current_offset` is only consulted for [`Alignment::Auto`], and the
/// result is clamped to `[0, max(0, total - viewport)]`. Saturating integer
/// math throughout: a row taller than the viewport centers past its start
/// rather than underflowing.
pub fn resolve_target(
    alignment: Alignment,
    item_start: u64,
    item_height: u32,
    current_offset: u64,
    viewport_size: u32,
    total: u64,
) -> u64 {
    let view = viewport_size as u64;
    let height = item_height as u64;
    let item_end = item_start.saturating_add(height);

    let target = match alignment {
        Alignment::Start => item_start,
        Alignment::End => item_end.saturating_sub(view),
        Alignment::Center => {
            let center = item_start.saturating_add(height / 2);
            center.saturating_sub(view / 2)
        }
        Alignment::Auto => {
            let current_end = current_offset.saturating_add(view);
            if item_start >= current_offset && item_end <= current_end {
                current_offset
            } else if item_start < current_offset {
                item_start
            } else {
                item_end.saturating_sub(view)
            }
        }
    };

    target.min(total.saturating_sub(view))
}
