use alloc::sync::Arc;

use crate::height::HeightSource;
use crate::list::VirtualList;

/// Overscan applied when none is configured.
pub const DEFAULT_OVERSCAN: usize = 3;

/// A callback fired when the engine's output may have changed.
///
/// UI layers subscribe here instead of re-deriving engine state on their own
/// render passes; see [`VirtualList::batch_update`] for coalescing several
/// updates into one notification.
pub type OnChangeCallback = Arc<dyn Fn(&VirtualList) + Send + Sync>;

/// Configuration for [`VirtualList`].
///
/// Cheap to clone: the height source and callbacks are `Arc`-stored, so
/// adapters can tweak a field and call [`VirtualList::set_options`] without
/// reallocating closures.
pub struct VirtualListOptions {
    /// Logical item count; may change between renders.
    pub count: usize,
    /// Fixed or per-index height source.
    pub height: HeightSource,
    /// Viewport height in the scroll axis.
    pub viewport_height: u32,
    /// Extra items kept rendered beyond the strictly visible set, to reduce
    /// blank flashes during fast scroll. Clamped to the list bounds.
    pub overscan: usize,
    /// Optional subscription to engine state changes.
    pub on_change: Option<OnChangeCallback>,
}

impl VirtualListOptions {
    /// Options for a fixed-height list.
    pub fn fixed(count: usize, item_height: u32) -> Self {
        Self::new(count, HeightSource::Fixed(item_height))
    }

    /// Options for a dynamic-height list driven by a per-index estimate.
    pub fn per_item(
        count: usize,
        estimate: impl Fn(usize) -> u32 + Send + Sync + 'static,
    ) -> Self {
        Self::new(count, HeightSource::per_item(estimate))
    }

    pub fn new(count: usize, height: HeightSource) -> Self {
        Self {
            count,
            height,
            viewport_height: 0,
            overscan: DEFAULT_OVERSCAN,
            on_change: None,
        }
    }

    pub fn with_viewport_height(mut self, viewport_height: u32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_on_change(
        mut self,
        on_change: Option<impl Fn(&VirtualList) + Send + Sync + 'static>,
    ) -> Self {
        self.on_change = on_change.map(|f| Arc::new(f) as _);
        self
    }
}

impl Clone for VirtualListOptions {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            height: self.height.clone(),
            viewport_height: self.viewport_height,
            overscan: self.overscan,
            on_change: self.on_change.clone(),
        }
    }
}

impl core::fmt::Debug for VirtualListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VirtualListOptions")
            .field("count", &self.count)
            .field("height", &self.height)
            .field("viewport_height", &self.viewport_height)
            .field("overscan", &self.overscan)
            .finish_non_exhaustive()
    }
}
