// Example: windowing a large fixed-height transaction feed.
use vlist::{VirtualList, VirtualListOptions};

fn main() {
    let mut list = VirtualList::new(
        VirtualListOptions::fixed(100_000, 60)
            .with_viewport_height(600)
            .with_overscan(3),
    );
    list.handle_scroll(123_456);

    println!("total_height={}", list.total_height());
    println!("visible_range={:?}", list.visible_range());
    println!("window_range={:?}", list.window_range());

    let mut rows = Vec::new();
    list.render_visible(|it| format!("tx #{} @ {}px", it.index, it.top), &mut rows);
    println!("first_row={:?}", rows.first());
    println!("last_row={:?}", rows.last());

    let off = list.scroll_to_index(99_999).expect("index exists");
    println!("after scroll_to_index: offset={off} range={:?}", list.window_range());
}
