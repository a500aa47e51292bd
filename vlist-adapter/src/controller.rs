use alloc::sync::Arc;

use vlist::{Error, VirtualList, VirtualListOptions, WindowRange};

/// The side-effecting call a controller uses to instruct the external scroll
/// surface (a DOM container, a TUI viewport) to move to an offset.
pub type ScrollSurfaceFn = Arc<dyn Fn(u64) + Send + Sync>;

/// A framework-neutral controller that wraps a [`VirtualList`] and drives
/// the common event workflows: scroll/resize ingestion, programmatic
/// scroll-to-index, and raw measurement sanitization.
///
/// The controller holds no UI objects. The scroll surface is a callback the
/// UI layer registers; every applied target is also returned, so callers
/// without a callback can position the surface themselves.
#[derive(Clone)]
pub struct ScrollController {
    list: VirtualList,
    surface: Option<ScrollSurfaceFn>,
}

impl ScrollController {
    pub fn new(options: VirtualListOptions) -> Self {
        Self {
            list: VirtualList::new(options),
            surface: None,
        }
    }

    pub fn from_list(list: VirtualList) -> Self {
        Self {
            list,
            surface: None,
        }
    }

    pub fn list(&self) -> &VirtualList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut VirtualList {
        &mut self.list
    }

    pub fn into_list(self) -> VirtualList {
        self.list
    }

    /// Registers the scroll surface instructed on programmatic scrolls.
    pub fn set_scroll_surface(&mut self, surface: Option<impl Fn(u64) + Send + Sync + 'static>) {
        self.surface = surface.map(|f| Arc::new(f) as _);
    }

    /// Ingests a scroll event from the UI layer (wheel, drag, touch).
    pub fn on_scroll(&mut self, scroll_top: u64) {
        self.list.handle_scroll(scroll_top);
    }

    pub fn on_viewport_resize(&mut self, viewport_height: u32) {
        self.list.set_viewport_height(viewport_height);
    }

    pub fn window_range(&self) -> WindowRange {
        self.list.window_range()
    }

    /// Scrolls so that item `index` sits at the viewport top and instructs
    /// the scroll surface with the applied target.
    ///
    /// The target is computed from the offset table *at call time*, so
    /// repeated calls while dynamic heights are settling are idempotent
    /// against whatever table each call observes; a caller wanting the
    /// final-settled position issues a fresh call after remeasurement
    /// stabilizes. Out-of-range indices are rejected with
    /// [`Error::IndexOutOfRange`] and leave both the engine and the surface
    /// untouched.
    pub fn scroll_to_index(&mut self, index: usize) -> Result<u64, Error> {
        let target = self.list.scroll_to_index(index)?;
        ltrace!(index, target, "scroll_to_index");
        if let Some(surface) = &self.surface {
            surface(target);
        }
        Ok(target)
    }

    /// Scrolls to a raw offset (clamped) and instructs the surface.
    pub fn scroll_to_offset(&mut self, offset: u64) -> u64 {
        let target = self.list.clamp_scroll_top(offset);
        self.list.handle_scroll(target);
        if let Some(surface) = &self.surface {
            surface(target);
        }
        target
    }

    /// Ingests a raw measured height (e.g. fractional CSS pixels) for the
    /// current generation.
    pub fn report_measured_px(&mut self, index: usize, height_px: f64) {
        let epoch = self.list.epoch();
        self.report_measured_px_at_epoch(index, height_px, epoch);
    }

    /// Ingests a raw measured height captured under `epoch`.
    ///
    /// Non-finite or negative heights are recorded as `0` (with a
    /// diagnostic) so the offset table stays well-formed; everything else is
    /// rounded to whole pixels.
    pub fn report_measured_px_at_epoch(&mut self, index: usize, height_px: f64, epoch: u64) {
        self.list
            .measure_at_epoch(index, sanitize_height_px(height_px), epoch);
    }
}

impl core::fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollController")
            .field("list", &self.list)
            .finish_non_exhaustive()
    }
}

pub(crate) fn sanitize_height_px(height_px: f64) -> u32 {
    if !height_px.is_finite() || height_px < 0.0 {
        lwarn!(height_px, "invalid measured height treated as 0");
        return 0;
    }
    // Round half up; float-to-int casts saturate.
    ((height_px + 0.5) as u64).min(u32::MAX as u64) as u32
}
