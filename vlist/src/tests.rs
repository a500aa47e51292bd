use crate::*;

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

#[derive(Clone, Copy, Debug)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        // Deterministic, dependency-free PRNG for tests.
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0
    }

    fn gen_range_u64(&mut self, start: u64, end_exclusive: u64) -> u64 {
        debug_assert!(start < end_exclusive);
        start + (self.next_u64() % (end_exclusive - start))
    }

    fn gen_range_usize(&mut self, start: usize, end_exclusive: usize) -> usize {
        self.gen_range_u64(start as u64, end_exclusive as u64) as usize
    }

    fn gen_range_u32(&mut self, start: u32, end_exclusive: u32) -> u32 {
        self.gen_range_u64(start as u64, end_exclusive as u64) as u32
    }

    fn gen_bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

fn expected_offsets(heights: &[u32]) -> Vec<u64> {
    let mut out = Vec::with_capacity(heights.len() + 1);
    let mut acc = 0u64;
    out.push(0);
    for &h in heights {
        acc += h as u64;
        out.push(acc);
    }
    out
}

fn expected_visible(heights: &[u32], scroll_top: u64, viewport_height: u32) -> WindowRange {
    let count = heights.len();
    if count == 0 || viewport_height == 0 {
        return WindowRange::EMPTY;
    }
    let offsets = expected_offsets(heights);
    let total = offsets[count];
    if total == 0 {
        return WindowRange::EMPTY;
    }

    let view = viewport_height as u64;
    let top = scroll_top.min(total.saturating_sub(view));
    let bottom_exclusive = (top + view).min(total);

    let mut start = count;
    for i in 0..count {
        if offsets[i + 1] > top {
            start = i;
            break;
        }
    }
    let mut end = count;
    for (i, &off) in offsets.iter().enumerate() {
        if off >= bottom_exclusive {
            end = i;
            break;
        }
    }
    WindowRange { start, end }
}

fn per_item_list(heights: &[u32]) -> VirtualList {
    let heights = heights.to_vec();
    VirtualList::new(VirtualListOptions::per_item(heights.len(), move |i| {
        heights[i]
    }))
}

#[test]
fn fixed_height_window_and_total() {
    let mut v = VirtualList::new(
        VirtualListOptions::fixed(1000, 60)
            .with_viewport_height(600)
            .with_overscan(3),
    );
    v.handle_scroll(300);

    assert_eq!(v.total_height(), 60_000);
    // Items 5..15 intersect [300, 900); overscan 3 widens to 2..18.
    assert_eq!(v.visible_range(), WindowRange { start: 5, end: 15 });
    assert_eq!(v.window_range(), WindowRange { start: 2, end: 18 });
    assert_eq!(v.window_range().len(), 16);
}

#[test]
fn window_calculator_is_pure_and_idempotent() {
    let source = HeightSource::Fixed(60);
    let model = HeightModel::new(1000, &source);

    let a = visible_window(&model, 300, 600);
    let b = visible_window(&model, 300, 600);
    assert_eq!(a, b);
    assert_eq!(a, WindowRange { start: 5, end: 15 });
    assert_eq!(expand_window(a, 3, 1000), WindowRange { start: 2, end: 18 });
    assert_eq!(clamp_scroll_top(&model, 1_000_000, 600), 59_400);
}

#[test]
fn scroll_to_index_targets_item_start() {
    let mut v = VirtualList::new(VirtualListOptions::fixed(1000, 60).with_viewport_height(600));

    assert_eq!(v.scroll_to_index(500), Ok(30_000));
    assert_eq!(v.scroll_top(), 30_000);

    // Near the end the target clamps so the viewport stays inside the
    // content: offset(999) = 59940 > max scroll 59400.
    assert_eq!(v.scroll_to_index(999), Ok(59_400));
    assert_eq!(v.scroll_top(), 59_400);
}

#[test]
fn out_of_range_indices_are_rejected() {
    let mut v = VirtualList::new(VirtualListOptions::fixed(1000, 60).with_viewport_height(600));

    let err = Error::IndexOutOfRange {
        index: 1000,
        count: 1000,
    };
    assert_eq!(v.scroll_to_index(1000), Err(err));
    assert_eq!(v.scroll_to_index_offset(1000), Err(err));
    assert_eq!(v.item_top(1000), Err(err));
    assert_eq!(v.item_height(1000), Err(err));
    assert_eq!(
        err.to_string(),
        "index 1000 out of range for a list of 1000 items"
    );

    // The rejection leaves scroll state untouched.
    assert_eq!(v.scroll_top(), 0);
}

#[test]
fn empty_list_reports_empty_window() {
    let v = VirtualList::new(VirtualListOptions::fixed(0, 60).with_viewport_height(600));

    assert_eq!(v.total_height(), 0);
    assert!(v.window_range().is_empty());
    assert!(v.visible_range().is_empty());
    assert_eq!(
        v.scroll_to_index_offset(0),
        Err(Error::IndexOutOfRange { index: 0, count: 0 })
    );
}

#[test]
fn scroll_past_end_clamps() {
    let mut v = VirtualList::new(
        VirtualListOptions::fixed(100, 10)
            .with_viewport_height(30)
            .with_overscan(3),
    );
    v.handle_scroll(12_345);

    assert_eq!(v.scroll_top(), 970);
    assert_eq!(v.visible_range(), WindowRange { start: 97, end: 100 });
    assert_eq!(v.window_range(), WindowRange { start: 94, end: 100 });
}

#[test]
fn zero_height_viewport_yields_empty_window() {
    let mut v = VirtualList::new(VirtualListOptions::fixed(100, 10));
    v.handle_scroll(50);
    assert!(v.window_range().is_empty());
}

#[test]
fn dynamic_remeasure_shifts_suffix_only() {
    let mut v =
        VirtualList::new(VirtualListOptions::per_item(50, |_| 100).with_viewport_height(300));

    assert_eq!(v.total_height(), 5_000);
    v.measure(10, 140);

    assert_eq!(v.item_top(9), Ok(900));
    assert_eq!(v.item_top(10), Ok(1_000));
    assert_eq!(v.item_top(11), Ok(1_140));
    assert_eq!(v.item_top(12), Ok(1_240));
    assert_eq!(v.total_height(), 5_040);
}

#[test]
fn offset_table_recomputes_only_the_dirty_suffix() {
    let source = HeightSource::per_item(|_| 10);
    let mut model = HeightModel::new(10, &source);

    model.set_height(7, 25);
    model.set_height(3, 0);
    assert!(model.is_dirty());

    model.flush();
    assert!(!model.is_dirty());
    assert_eq!(model.offset_of(3), 30);
    assert_eq!(model.offset_of(4), 30); // item 3 now has zero extent
    assert_eq!(model.offset_of(8), 85);
    assert_eq!(model.total(), 105);
}

#[test]
fn stale_epoch_measurement_is_noop() {
    let mut v =
        VirtualList::new(VirtualListOptions::per_item(50, |_| 100).with_viewport_height(300));

    let old_epoch = v.epoch();
    v.reset_generation();
    assert_eq!(v.epoch(), old_epoch + 1);

    v.measure_at_epoch(10, 999, old_epoch);
    assert_eq!(v.measurement_count(), 0);
    assert_eq!(v.item_height(10), Ok(100));
    assert_eq!(v.total_height(), 5_000);
}

#[test]
fn reset_generation_drops_measurements() {
    let mut v =
        VirtualList::new(VirtualListOptions::per_item(20, |_| 10).with_viewport_height(50));

    v.measure(3, 40);
    v.measure(4, 0);
    assert_eq!(v.measurement_count(), 2);
    assert_eq!(v.total_height(), 220);

    v.reset_generation();
    assert_eq!(v.measurement_count(), 0);
    assert_eq!(v.total_height(), 200);
    assert_eq!(v.item_height(3), Ok(10));
}

#[test]
fn measurer_outcomes() {
    let mut m = Measurer::new();

    assert_eq!(m.report(0, 10, 0), MeasureOutcome::Applied);
    assert_eq!(m.report(0, 10, 0), MeasureOutcome::Unchanged);
    assert_eq!(m.report(0, 12, 1), MeasureOutcome::Stale);
    assert_eq!(m.len(), 1);

    m.reset_generation();
    assert_eq!(m.epoch(), 1);
    assert!(m.is_empty());
    assert_eq!(m.report(0, 12, 1), MeasureOutcome::Applied);
}

#[test]
fn measurement_on_fixed_list_is_dropped() {
    let mut v = VirtualList::new(VirtualListOptions::fixed(10, 20).with_viewport_height(50));

    v.measure(3, 99);
    v.measure_many([(0, 1), (1, 2)]);
    assert_eq!(v.measurement_count(), 0);
    assert_eq!(v.item_height(3), Ok(20));
    assert_eq!(v.total_height(), 200);
}

#[test]
fn measurement_past_count_is_dropped() {
    let mut v =
        VirtualList::new(VirtualListOptions::per_item(5, |_| 10).with_viewport_height(50));

    v.measure(5, 99);
    v.measure(100, 99);
    assert_eq!(v.measurement_count(), 0);
    assert_eq!(v.total_height(), 50);
}

#[test]
fn measure_many_equals_sequential_measures() {
    let mut a =
        VirtualList::new(VirtualListOptions::per_item(20, |_| 10).with_viewport_height(60));
    let mut b = a.clone();

    a.measure(3, 25);
    a.measure(7, 0);
    a.measure(19, 100);
    b.measure_many([(3, 25), (7, 0), (19, 100)]);

    assert_eq!(a.total_height(), b.total_height());
    for i in 0..20 {
        assert_eq!(a.item_top(i), b.item_top(i));
        assert_eq!(a.item_height(i), b.item_height(i));
    }
}

#[test]
fn set_count_preserves_measurements_within_generation() {
    let mut v =
        VirtualList::new(VirtualListOptions::per_item(2, |_| 1).with_viewport_height(10));

    v.measure(0, 5);
    v.set_count(4);
    v.measure(3, 7);
    assert_eq!(v.total_height(), 5 + 1 + 1 + 7);
    assert_eq!(v.item_top(3), Ok(7));

    v.set_count(2);
    assert_eq!(v.total_height(), 6);
    assert_eq!(v.item_height(1), Ok(1));

    // Growing back within the same generation restores the cached height.
    v.set_count(4);
    assert_eq!(v.item_height(3), Ok(7));
    assert_eq!(v.total_height(), 14);
}

#[test]
fn zero_height_items_stay_addressable() {
    let mut v = per_item_list(&[60, 0, 60]);
    v.set_viewport_height(60);
    v.set_overscan(0);

    assert_eq!(v.total_height(), 120);
    assert_eq!(v.item_top(1), Ok(60));
    assert_eq!(v.item_top(2), Ok(60));
    assert_eq!(v.scroll_to_index(1), Ok(60));

    // A zero-extent item never intersects the viewport.
    assert_eq!(v.visible_range(), WindowRange { start: 2, end: 3 });
}

#[test]
fn index_at_offset_boundaries() {
    let v = per_item_list(&[10; 10]);

    assert_eq!(v.index_at_offset(0), Some(0));
    assert_eq!(v.index_at_offset(9), Some(0));
    assert_eq!(v.index_at_offset(10), Some(1));
    assert_eq!(v.index_at_offset(99), Some(9));
    assert_eq!(v.index_at_offset(100), None);
}

#[test]
fn fixed_and_per_item_sources_agree() {
    for &(n, h) in &[(0usize, 10u32), (1, 7), (13, 0), (50, 24)] {
        let fixed = VirtualList::new(VirtualListOptions::fixed(n, h).with_viewport_height(40));
        let dynamic =
            VirtualList::new(VirtualListOptions::per_item(n, move |_| h).with_viewport_height(40));

        assert_eq!(fixed.total_height(), dynamic.total_height(), "n={n} h={h}");
        for scroll in [0u64, 5, 33, 100, 10_000] {
            assert_eq!(
                fixed.window_range_for(scroll, 40),
                dynamic.window_range_for(scroll, 40),
                "n={n} h={h} scroll={scroll}"
            );
        }
        for i in 0..n {
            assert_eq!(fixed.item_top(i), dynamic.item_top(i));
            assert_eq!(fixed.item_height(i), dynamic.item_height(i));
        }
    }
}

#[test]
fn positioned_output_matches_offsets() {
    let mut v = per_item_list(&[10, 0, 30, 5, 25]);
    v.set_viewport_height(100);
    v.set_overscan(0);
    v.handle_scroll(0);

    let mut out = Vec::new();
    v.collect_positioned(&mut out);
    assert_eq!(out.len(), 5); // total 70 < viewport, everything is in
    for item in &out {
        assert_eq!(Ok(item.top), v.item_top(item.index));
        assert_eq!(Ok(item.height), v.item_height(item.index));
    }
    assert_eq!(out[2].bottom(), 40);

    let mut labels = Vec::new();
    v.render_visible(|it| (it.index, it.top), &mut labels);
    assert_eq!(labels.len(), 5);
    assert_eq!(labels[4], (4, 45));
}

#[test]
fn batch_update_coalesces_notifications() {
    let hits = Arc::new(AtomicUsize::new(0));
    let h = Arc::clone(&hits);
    let mut v = VirtualList::new(
        VirtualListOptions::fixed(100, 10)
            .with_viewport_height(50)
            .with_on_change(Some(move |_: &VirtualList| {
                h.fetch_add(1, Ordering::SeqCst);
            })),
    );

    v.batch_update(|l| {
        l.handle_scroll(100);
        l.set_viewport_height(60);
        l.set_overscan(2);
    });
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    v.handle_scroll(200);
    assert_eq!(hits.load(Ordering::SeqCst), 2);

    // A scroll to the already-clamped position changes nothing and stays
    // silent.
    v.handle_scroll(200);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn set_options_rebuilds_only_on_count_or_source_change() {
    let mut v =
        VirtualList::new(VirtualListOptions::per_item(10, |_| 10).with_viewport_height(50));
    v.measure(2, 30);
    assert_eq!(v.total_height(), 120);

    // Same source identity, same count: measurements survive untouched.
    v.update_options(|o| o.overscan = 1);
    assert_eq!(v.overscan(), 1);
    assert_eq!(v.total_height(), 120);

    // Count change rebuilds but replays the cache.
    let mut next = v.options().clone();
    next.count = 20;
    v.set_options(next);
    assert_eq!(v.item_height(2), Ok(30));
    assert_eq!(v.total_height(), 220);

    // A new source identity re-estimates; cached measurements still win.
    let mut next = v.options().clone();
    next.height = HeightSource::per_item(|_| 50);
    v.set_options(next);
    assert_eq!(v.item_height(2), Ok(30));
    assert_eq!(v.item_height(3), Ok(50));
}

#[test]
fn random_windows_match_reference() {
    let mut rng = Lcg::new(0xC0FFEE);

    for _ in 0..200 {
        let n = rng.gen_range_usize(0, 40);
        let mut heights = Vec::with_capacity(n);
        for _ in 0..n {
            // Mix plenty of degenerate zero/small heights in.
            let h = if rng.gen_bool() {
                rng.gen_range_u32(0, 4)
            } else {
                rng.gen_range_u32(1, 120)
            };
            heights.push(h);
        }
        let total: u64 = heights.iter().map(|&h| h as u64).sum();
        let overscan = rng.gen_range_usize(0, 4);
        let mut v = per_item_list(&heights);
        v.set_overscan(overscan);

        for _ in 0..20 {
            let viewport = rng.gen_range_u32(0, 300);
            let scroll = rng.gen_range_u64(0, total + viewport as u64 + 50);
            v.set_viewport_height(viewport);
            v.handle_scroll(scroll);

            let strict = v.visible_range();
            assert_eq!(
                strict,
                expected_visible(&heights, scroll, viewport),
                "heights={heights:?} scroll={scroll} viewport={viewport}"
            );
            assert_eq!(strict, v.visible_range(), "recomputation must agree");

            let window = v.window_range();
            assert!(window.end <= n);
            assert!(window.start <= strict.start || strict.is_empty());
            assert!(strict.end <= window.end || strict.is_empty());

            // Coverage: every item intersecting the (clamped) viewport is in.
            if viewport > 0 && total > 0 {
                let offsets = expected_offsets(&heights);
                let view = viewport as u64;
                let top = scroll.min(total.saturating_sub(view));
                for i in 0..n {
                    let intersects = offsets[i] < top + view && offsets[i + 1] > top;
                    if intersects {
                        assert!(strict.contains(i), "index {i} missing from strict window");
                        assert!(window.contains(i), "index {i} missing from window");
                    }
                }
            }
        }
    }
}

#[test]
fn random_measurements_keep_offset_table_consistent() {
    let mut rng = Lcg::new(42);

    for _ in 0..50 {
        let n = rng.gen_range_usize(1, 30);
        let mut heights = Vec::with_capacity(n);
        for _ in 0..n {
            heights.push(rng.gen_range_u32(0, 60));
        }
        let mut v = per_item_list(&heights);
        v.set_viewport_height(80);

        for _ in 0..15 {
            let index = rng.gen_range_usize(0, n);
            let height = rng.gen_range_u32(0, 200);
            heights[index] = height;
            v.measure(index, height);

            let offsets = expected_offsets(&heights);
            assert_eq!(v.total_height(), offsets[n]);
            for i in 0..n {
                assert_eq!(v.item_top(i), Ok(offsets[i]));
                assert_eq!(v.item_height(i), Ok(heights[i]));
            }
        }
    }
}
