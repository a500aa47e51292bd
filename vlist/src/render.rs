use crate::height::HeightModel;
use crate::types::WindowRange;

/// A window item with its absolute position in the content.
///
/// The surrounding scroll surface gives the container a fixed extent equal
/// to the list's total height and positions each item absolutely at `top`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionedItem {
    pub index: usize,
    /// Absolute start offset in the scroll axis.
    pub top: u64,
    pub height: u32,
}

impl PositionedItem {
    pub fn bottom(&self) -> u64 {
        self.top.saturating_add(self.height as u64)
    }
}

/// Emits one positioned item per index in `range`, walking a running offset
/// instead of querying the table per item.
pub(crate) fn for_each_positioned(
    model: &HeightModel,
    range: WindowRange,
    mut f: impl FnMut(PositionedItem),
) {
    if range.is_empty() {
        return;
    }
    let end = range.end.min(model.count());
    let mut top = model.offset_of(range.start);
    for index in range.start..end {
        let height = model.height_at(index);
        f(PositionedItem { index, top, height });
        top = top.saturating_add(height as u64);
    }
}
