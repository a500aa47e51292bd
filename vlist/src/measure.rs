#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::height::HeightModel;

#[cfg(feature = "std")]
type HeightCache = HashMap<usize, u32>;
#[cfg(not(feature = "std"))]
type HeightCache = BTreeMap<usize, u32>;

/// What happened to a measurement report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasureOutcome {
    /// The cache changed; the offset table must be patched from this index.
    Applied,
    /// The report matched the cached value; nothing to do.
    Unchanged,
    /// The report belongs to a superseded generation and was dropped.
    Stale,
}

/// Observed-height cache for the dynamic-height variant.
///
/// The cache is scoped to one engine instance and fenced by a generation
/// epoch: an asynchronous report captured before a wholesale data swap
/// carries the old epoch and is dropped, so it can never corrupt positions
/// of the replacement content. Dropping stale reports is expected
/// steady-state behavior during rapid swaps, not an error.
#[derive(Clone, Debug, Default)]
pub struct Measurer {
    cache: HeightCache,
    epoch: u64,
}

impl Measurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Records an observed height.
    ///
    /// Reports apply in arrival order within a generation; a report whose
    /// `epoch` does not match the current generation is dropped.
    pub fn report(&mut self, index: usize, height: u32, epoch: u64) -> MeasureOutcome {
        if epoch != self.epoch {
            ldebug!(
                index,
                epoch,
                current = self.epoch,
                "stale measurement dropped"
            );
            return MeasureOutcome::Stale;
        }
        if self.cache.get(&index) == Some(&height) {
            return MeasureOutcome::Unchanged;
        }
        self.cache.insert(index, height);
        MeasureOutcome::Applied
    }

    /// Drops every cached measurement and starts a new generation.
    pub fn reset_generation(&mut self) {
        ldebug!(
            dropped = self.cache.len(),
            epoch = self.epoch,
            "reset_generation"
        );
        self.cache.clear();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Replays cached measurements onto a freshly rebuilt model.
    ///
    /// Entries beyond the model's count stay cached: they apply again if the
    /// list grows back within the same generation.
    pub fn reapply(&self, model: &mut HeightModel) {
        for (&index, &height) in self.cache.iter() {
            if index < model.count() {
                model.set_height(index, height);
            }
        }
        model.flush();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
