// Example: dynamic heights with post-paint measurement.
use vlist::{VirtualList, VirtualListOptions};

fn main() {
    // Rows are estimated at 80px until the UI measures them after paint.
    let mut list = VirtualList::new(
        VirtualListOptions::per_item(500, |_| 80)
            .with_viewport_height(400)
            .with_overscan(2),
    );
    list.handle_scroll(1_000);

    println!(
        "before: total={} range={:?}",
        list.total_height(),
        list.window_range()
    );

    // The paint pass reports real heights for the rows it rendered; the
    // offset table is patched from the smallest changed index only.
    let epoch = list.epoch();
    let range = list.window_range();
    list.measure_many((range.start..range.end).map(|i| (i, if i % 3 == 0 { 120 } else { 64 })));

    println!(
        "after: total={} range={:?}",
        list.total_height(),
        list.window_range()
    );

    // A wholesale data swap starts a new generation; the stale report from
    // the old content is dropped.
    list.reset_generation();
    list.measure_at_epoch(10, 999, epoch);
    println!(
        "after swap: total={} measurements={}",
        list.total_height(),
        list.measurement_count()
    );
}
