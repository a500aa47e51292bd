use alloc::sync::Arc;
use alloc::vec::Vec;
use core::cell::Cell;

use crate::Error;
use crate::height::{HeightModel, HeightSource};
use crate::measure::{MeasureOutcome, Measurer};
use crate::options::VirtualListOptions;
use crate::render::{self, PositionedItem};
use crate::types::WindowRange;
use crate::window;

/// A headless windowing engine for one logical list.
///
/// The engine owns the offset table and the measurement cache. A UI layer
/// drives it with scroll/resize/measurement events and reads positioned
/// output; all recomputation happens synchronously inside the mutating
/// calls, on the thread that delivers the event. One instance per list —
/// no two instances share mutable state.
#[derive(Clone, Debug)]
pub struct VirtualList {
    options: VirtualListOptions,
    model: HeightModel,
    measurer: Measurer,
    scroll_top: u64,

    notify_depth: Cell<usize>,
    notify_pending: Cell<bool>,
}

impl VirtualList {
    pub fn new(options: VirtualListOptions) -> Self {
        ldebug!(
            count = options.count,
            viewport_height = options.viewport_height,
            overscan = options.overscan,
            "VirtualList::new"
        );
        let model = HeightModel::new(options.count, &options.height);
        Self {
            model,
            measurer: Measurer::new(),
            scroll_top: 0,
            options,
            notify_depth: Cell::new(0),
            notify_pending: Cell::new(false),
        }
    }

    pub fn options(&self) -> &VirtualListOptions {
        &self.options
    }

    pub fn count(&self) -> usize {
        self.options.count
    }

    pub fn overscan(&self) -> usize {
        self.options.overscan
    }

    pub fn viewport_height(&self) -> u32 {
        self.options.viewport_height
    }

    pub fn scroll_top(&self) -> u64 {
        self.scroll_top
    }

    /// Current generation; bumped by [`Self::reset_generation`].
    ///
    /// Asynchronous callbacks (paint measurements, load completions) capture
    /// this when scheduled and pass it back on settlement so superseded work
    /// can be fenced out.
    pub fn epoch(&self) -> u64 {
        self.measurer.epoch()
    }

    /// Number of cached measurements in the current generation.
    pub fn measurement_count(&self) -> usize {
        self.measurer.len()
    }

    fn notify_now(&self) {
        if let Some(cb) = &self.options.on_change {
            cb(self);
        }
    }

    fn notify(&self) {
        if self.notify_depth.get() > 0 {
            self.notify_pending.set(true);
            return;
        }
        self.notify_now();
    }

    /// Batches multiple updates into a single `on_change` notification.
    ///
    /// On a typical frame an adapter may update the viewport, the scroll
    /// offset, and a batch of measurements together; without batching each
    /// setter would fire `on_change` separately.
    pub fn batch_update(&mut self, f: impl FnOnce(&mut Self)) {
        let depth = self.notify_depth.get();
        self.notify_depth.set(depth.saturating_add(1));

        f(self);

        let depth = self.notify_depth.get();
        debug_assert!(depth > 0, "notify_depth underflow");
        let next = depth.saturating_sub(1);
        self.notify_depth.set(next);

        if next == 0 && self.notify_pending.replace(false) {
            self.notify_now();
        }
    }

    pub fn set_on_change(
        &mut self,
        on_change: Option<impl Fn(&VirtualList) + Send + Sync + 'static>,
    ) {
        self.options.on_change = on_change.map(|f| Arc::new(f) as _);
        self.notify();
    }

    /// Replaces the configuration, rebuilding the offset table only when the
    /// count or the height-source identity changed.
    pub fn set_options(&mut self, options: VirtualListOptions) {
        let prev_count = self.options.count;
        let height_unchanged = self.options.height.same_identity(&options.height);
        self.options = options;
        ltrace!(
            count = self.options.count,
            viewport_height = self.options.viewport_height,
            overscan = self.options.overscan,
            "set_options"
        );

        if self.options.count != prev_count || !height_unchanged {
            self.rebuild_model();
        }
        self.notify();
    }

    /// Clones the current options, applies `f`, then delegates to
    /// [`Self::set_options`].
    pub fn update_options(&mut self, f: impl FnOnce(&mut VirtualListOptions)) {
        let mut next = self.options.clone();
        f(&mut next);
        self.set_options(next);
    }

    pub fn set_count(&mut self, count: usize) {
        if self.options.count == count {
            return;
        }
        self.options.count = count;
        self.rebuild_model();
        self.notify();
    }

    pub fn set_overscan(&mut self, overscan: usize) {
        self.options.overscan = overscan;
        self.notify();
    }

    pub fn set_viewport_height(&mut self, viewport_height: u32) {
        if self.options.viewport_height == viewport_height {
            return;
        }
        self.options.viewport_height = viewport_height;
        self.notify();
    }

    pub fn set_height_source(&mut self, height: HeightSource) {
        self.options.height = height;
        self.rebuild_model();
        self.notify();
    }

    fn rebuild_model(&mut self) {
        ldebug!(
            count = self.options.count,
            cached = self.measurer.len(),
            "rebuild_model"
        );
        self.model = HeightModel::new(self.options.count, &self.options.height);
        self.measurer.reapply(&mut self.model);
    }

    /// Applies a scroll event.
    ///
    /// Offsets past the end of the content are clamped to
    /// `max(0, total - viewport)` before they are stored.
    pub fn handle_scroll(&mut self, scroll_top: u64) {
        let clamped = self.clamp_scroll_top(scroll_top);
        if self.scroll_top == clamped {
            return;
        }
        ltrace!(scroll_top, clamped, "handle_scroll");
        self.scroll_top = clamped;
        self.notify();
    }

    pub fn total_height(&self) -> u64 {
        self.model.total()
    }

    pub fn max_scroll_top(&self) -> u64 {
        self.model
            .total()
            .saturating_sub(self.options.viewport_height as u64)
    }

    pub fn clamp_scroll_top(&self, scroll_top: u64) -> u64 {
        scroll_top.min(self.max_scroll_top())
    }

    /// The overscan-expanded window that should exist in the output.
    pub fn window_range(&self) -> WindowRange {
        window::expand_window(
            self.visible_range(),
            self.options.overscan,
            self.options.count,
        )
    }

    /// The strict visible window (no overscan).
    pub fn visible_range(&self) -> WindowRange {
        window::visible_window(&self.model, self.scroll_top, self.options.viewport_height)
    }

    /// The overscan-expanded window for a hypothetical scroll position,
    /// without mutating state.
    pub fn window_range_for(&self, scroll_top: u64, viewport_height: u32) -> WindowRange {
        window::expand_window(
            window::visible_window(&self.model, scroll_top, viewport_height),
            self.options.overscan,
            self.options.count,
        )
    }

    /// Absolute start offset of item `index`.
    pub fn item_top(&self, index: usize) -> Result<u64, Error> {
        if index >= self.options.count {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.options.count,
            });
        }
        Ok(self.model.offset_of(index))
    }

    /// Current height of item `index` (measured if available, estimated
    /// otherwise).
    pub fn item_height(&self, index: usize) -> Result<u32, Error> {
        self.model.height_of(index)
    }

    /// The item whose extent contains `offset`, if any.
    pub fn index_at_offset(&self, offset: u64) -> Option<usize> {
        (offset < self.model.total()).then(|| self.model.index_at(offset))
    }

    /// Computes the scroll target that puts item `index` at the viewport
    /// top, clamped so the viewport stays inside the content.
    ///
    /// Out-of-range indices are rejected with [`Error::IndexOutOfRange`] —
    /// never clamped — so a caller holding a stale index after a data swap
    /// hears about it instead of silently landing on the last row.
    pub fn scroll_to_index_offset(&self, index: usize) -> Result<u64, Error> {
        if index >= self.options.count {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.options.count,
            });
        }
        Ok(self.clamp_scroll_top(self.model.offset_of(index)))
    }

    /// Scrolls so that item `index` sits at the viewport top.
    ///
    /// The target comes from the offset table *at call time*; while dynamic
    /// heights are still settling there is no retry loop — issue a fresh
    /// call once remeasurement stabilizes. Returns the applied (clamped)
    /// offset.
    pub fn scroll_to_index(&mut self, index: usize) -> Result<u64, Error> {
        let target = self.scroll_to_index_offset(index)?;
        ltrace!(index, target, "scroll_to_index");
        if self.scroll_top != target {
            self.scroll_top = target;
            self.notify();
        }
        Ok(target)
    }

    /// Reports an observed height for the current generation.
    ///
    /// Fixed-height lists have nothing to measure; such reports are dropped
    /// with a diagnostic. Reports for indices beyond the current count are
    /// dropped silently (a paint callback racing a shrink).
    pub fn measure(&mut self, index: usize, height: u32) {
        let epoch = self.measurer.epoch();
        self.measure_at_epoch(index, height, epoch);
    }

    /// Reports an observed height captured under `epoch`.
    ///
    /// Asynchronous paint callbacks capture [`Self::epoch`] when scheduled;
    /// if a generation reset lands first, the report is dropped.
    pub fn measure_at_epoch(&mut self, index: usize, height: u32, epoch: u64) {
        if index >= self.options.count {
            return;
        }
        if self.model.is_fixed() {
            lwarn!(index, height, "measurement on a fixed-height list dropped");
            return;
        }
        match self.measurer.report(index, height, epoch) {
            MeasureOutcome::Applied => {
                ltrace!(index, height, "measure");
                self.model.set_height(index, height);
                self.model.flush();
                self.notify();
            }
            MeasureOutcome::Unchanged | MeasureOutcome::Stale => {}
        }
    }

    /// Reports a batch of observed heights with a single offset-table
    /// recomputation from the smallest dirtied index.
    pub fn measure_many(&mut self, measurements: impl IntoIterator<Item = (usize, u32)>) {
        if self.model.is_fixed() {
            lwarn!("measurement batch on a fixed-height list dropped");
            return;
        }
        let epoch = self.measurer.epoch();
        let mut applied = false;
        for (index, height) in measurements {
            if index >= self.options.count {
                continue;
            }
            if self.measurer.report(index, height, epoch) == MeasureOutcome::Applied {
                self.model.set_height(index, height);
                applied = true;
            }
        }
        if applied {
            self.model.flush();
            self.notify();
        }
    }

    /// Starts a new generation: drops every cached measurement and rebuilds
    /// the offset table from the estimates.
    ///
    /// Call this when the list is handed an unrelated item set. In-flight
    /// measurement callbacks and load completions that captured the old
    /// epoch are fenced out when they settle.
    pub fn reset_generation(&mut self) {
        self.measurer.reset_generation();
        self.rebuild_model();
        self.notify();
    }

    /// Emits one positioned item per index in the current window.
    pub fn for_each_positioned(&self, f: impl FnMut(PositionedItem)) {
        render::for_each_positioned(&self.model, self.window_range(), f);
    }

    /// Collects the current window into `out` (clears `out` first).
    ///
    /// Prefer [`Self::for_each_positioned`] with a reused buffer in hot
    /// paths.
    pub fn collect_positioned(&self, out: &mut Vec<PositionedItem>) {
        out.clear();
        self.for_each_positioned(|item| out.push(item));
    }

    /// Maps the current window through the caller's renderer into `out`
    /// (clears `out` first).
    ///
    /// The surrounding scroll surface is responsible for giving the overall
    /// container a fixed extent of [`Self::total_height`] and positioning
    /// each entry absolutely at its `top`.
    pub fn render_visible<T>(
        &self,
        mut render: impl FnMut(PositionedItem) -> T,
        out: &mut Vec<T>,
    ) {
        out.clear();
        self.for_each_positioned(|item| out.push(render(item)));
    }
}
