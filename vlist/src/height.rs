use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::Error;

/// Where item heights come from.
///
/// `Fixed` lists answer every offset query in O(1) without materializing a
/// table. `PerItem` lists resolve the source once per rebuild and cache a
/// cumulative offset table until the count or the source identity changes.
pub enum HeightSource {
    /// Every item has the same height.
    Fixed(u32),
    /// Heights vary by index. The closure provides the *estimate*; measured
    /// heights override it until the next generation reset.
    PerItem(Arc<dyn Fn(usize) -> u32 + Send + Sync>),
}

impl HeightSource {
    pub fn per_item(f: impl Fn(usize) -> u32 + Send + Sync + 'static) -> Self {
        Self::PerItem(Arc::new(f))
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    pub(crate) fn resolve(&self, index: usize) -> u32 {
        match self {
            Self::Fixed(h) => *h,
            Self::PerItem(f) => f(index),
        }
    }

    /// Same constant, or the same closure allocation.
    pub(crate) fn same_identity(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::PerItem(a), Self::PerItem(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Clone for HeightSource {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(h) => Self::Fixed(*h),
            Self::PerItem(f) => Self::PerItem(Arc::clone(f)),
        }
    }
}

impl core::fmt::Debug for HeightSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Fixed(h) => f.debug_tuple("Fixed").field(h).finish(),
            Self::PerItem(_) => f.write_str("PerItem(..)"),
        }
    }
}

/// Per-item heights plus the cumulative offset table over them.
///
/// Invariants:
/// - `offset_of(0) == 0`, `offset_of(i + 1) == offset_of(i) + height(i)`
/// - offsets are non-decreasing; `offset_of(count)` is the total extent
///
/// Zero heights are legal: such items occupy no extent but remain
/// addressable by index.
#[derive(Clone, Debug)]
pub struct HeightModel {
    count: usize,
    repr: Repr,
}

#[derive(Clone, Debug)]
enum Repr {
    Fixed {
        height: u32,
    },
    Dynamic {
        heights: Vec<u32>,
        /// `count + 1` cumulative entries, valid up to `dirty_from`.
        offsets: Vec<u64>,
        /// First item index whose `offset_of(i + 1)` is stale; `count` when
        /// the table is clean.
        dirty_from: usize,
    },
}

impl HeightModel {
    pub fn new(count: usize, source: &HeightSource) -> Self {
        let repr = match source {
            HeightSource::Fixed(h) => Repr::Fixed { height: *h },
            HeightSource::PerItem(_) => {
                let mut heights = Vec::with_capacity(count);
                let mut offsets = Vec::with_capacity(count + 1);
                offsets.push(0u64);
                let mut acc = 0u64;
                for i in 0..count {
                    let h = source.resolve(i);
                    heights.push(h);
                    acc = acc.saturating_add(h as u64);
                    offsets.push(acc);
                }
                Repr::Dynamic {
                    heights,
                    offsets,
                    dirty_from: count,
                }
            }
        };
        Self { count, repr }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.repr, Repr::Fixed { .. })
    }

    /// Start offset of item `index`; `index == count` yields the total
    /// extent.
    ///
    /// Callers stay within `0..=count` and flush pending height changes
    /// first; the public surface on `VirtualList` enforces both.
    pub fn offset_of(&self, index: usize) -> u64 {
        debug_assert!(
            index <= self.count,
            "offset_of out of range (index={index}, count={})",
            self.count
        );
        match &self.repr {
            Repr::Fixed { height } => (index.min(self.count) as u64).saturating_mul(*height as u64),
            Repr::Dynamic {
                offsets,
                dirty_from,
                ..
            } => {
                debug_assert_eq!(*dirty_from, self.count, "offset table read while dirty");
                offsets[index.min(self.count)]
            }
        }
    }

    /// Total content extent (`0` for an empty list).
    pub fn total(&self) -> u64 {
        self.offset_of(self.count)
    }

    pub fn height_of(&self, index: usize) -> Result<u32, Error> {
        if index >= self.count {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.count,
            });
        }
        Ok(self.height_at(index))
    }

    pub(crate) fn height_at(&self, index: usize) -> u32 {
        match &self.repr {
            Repr::Fixed { height } => *height,
            Repr::Dynamic { heights, .. } => heights[index],
        }
    }

    /// Maps a content offset to the index whose extent contains it — the
    /// smallest `i` with `offset_of(i + 1) > offset`.
    ///
    /// Requires `offset < total()`. O(1) for fixed heights, binary search
    /// over the offset table otherwise. Zero-height items at `offset` are
    /// skipped (their extent is empty).
    pub fn index_at(&self, offset: u64) -> usize {
        debug_assert!(offset < self.total(), "index_at past the content end");
        match &self.repr {
            Repr::Fixed { height } => {
                let h = *height as u64;
                if h == 0 {
                    return 0;
                }
                ((offset / h) as usize).min(self.count.saturating_sub(1))
            }
            Repr::Dynamic {
                offsets,
                dirty_from,
                ..
            } => {
                debug_assert_eq!(*dirty_from, self.count, "offset table read while dirty");
                offsets[1..].partition_point(|&end| end <= offset)
            }
        }
    }

    /// Overwrites a height and marks the offset table dirty from `index`.
    ///
    /// Fixed-height models have no per-item storage; the call is a no-op
    /// there (the `VirtualList` surface warns before reaching this point).
    /// Out-of-range indices are ignored.
    pub fn set_height(&mut self, index: usize, height: u32) {
        if index >= self.count {
            return;
        }
        if let Repr::Dynamic {
            heights,
            dirty_from,
            ..
        } = &mut self.repr
        {
            if heights[index] == height {
                return;
            }
            heights[index] = height;
            *dirty_from = (*dirty_from).min(index);
        }
    }

    /// Recomputes the stale suffix of the offset table, if any.
    ///
    /// A batch of height changes recomputes once, from the smallest dirty
    /// index only — items above it keep their offsets untouched.
    pub fn flush(&mut self) {
        let count = self.count;
        if let Repr::Dynamic {
            heights,
            offsets,
            dirty_from,
        } = &mut self.repr
        {
            if *dirty_from >= count {
                return;
            }
            let mut acc = offsets[*dirty_from];
            for i in *dirty_from..count {
                acc = acc.saturating_add(heights[i] as u64);
                offsets[i + 1] = acc;
            }
            *dirty_from = count;
        }
    }

    pub fn is_dirty(&self) -> bool {
        match &self.repr {
            Repr::Fixed { .. } => false,
            Repr::Dynamic { dirty_from, .. } => *dirty_from < self.count,
        }
    }
}
