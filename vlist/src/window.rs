use core::cmp;

use crate::height::HeightModel;
use crate::types::WindowRange;

/// Clamps a raw scroll offset so the viewport never extends past the end of
/// the content: the result is at most `total - viewport` (and `0` when the
/// content is shorter than the viewport).
pub fn clamp_scroll_top(model: &HeightModel, scroll_top: u64, viewport_height: u32) -> u64 {
    scroll_top.min(model.total().saturating_sub(viewport_height as u64))
}

/// Computes the strict visible window: the half-open index range from the
/// smallest `s` with `offset(s + 1) > scroll_top` to the smallest `e` with
/// `offset(e) >= scroll_top + viewport_height`.
///
/// Every item whose extent intersects the (clamped) viewport lies inside
/// the result. An empty list or a zero-height viewport yields `(0, 0)`.
pub fn visible_window(model: &HeightModel, scroll_top: u64, viewport_height: u32) -> WindowRange {
    if model.count() == 0 || viewport_height == 0 {
        return WindowRange::EMPTY;
    }
    let total = model.total();
    if total == 0 {
        return WindowRange::EMPTY;
    }

    let view = viewport_height as u64;
    let top = clamp_scroll_top(model, scroll_top, viewport_height);
    // The viewport is half-open at the bottom: an item starting exactly at
    // `top + view` is out.
    let bottom = cmp::min(top.saturating_add(view), total) - 1;

    let start = model.index_at(top);
    let end = model.index_at(bottom) + 1;
    WindowRange { start, end }
}

/// Applies overscan expansion, clamped to `[0, count]`.
pub fn expand_window(range: WindowRange, overscan: usize, count: usize) -> WindowRange {
    if range.is_empty() {
        return range;
    }
    WindowRange {
        start: range.start.saturating_sub(overscan),
        end: cmp::min(count, range.end.saturating_add(overscan)),
    }
}
