// Example: wiring ScrollController + InfiniteLoader for a paged feed.
use vlist::VirtualListOptions;
use vlist_adapter::{InfiniteLoader, LoadOutcome, ScrollController};

fn main() {
    let mut controller =
        ScrollController::new(VirtualListOptions::fixed(100, 100).with_viewport_height(600));
    controller.set_scroll_surface(Some(|off| println!("surface <- scroll to {off}")));
    let mut loader = InfiniteLoader::new(200);

    // The user scrolls near the end of the loaded content.
    controller.on_scroll(9_300);
    println!(
        "distance_to_end={}",
        InfiniteLoader::distance_to_end(controller.list())
    );

    let Some(ticket) = loader.maybe_load_more(controller.list()) else {
        unreachable!("within threshold, nothing in flight");
    };

    // More scroll events land while the page request is in flight; the
    // guard suppresses duplicate requests.
    for delta in 0..5 {
        controller.on_scroll(9_300 + delta);
        assert!(loader.maybe_load_more(controller.list()).is_none());
    }

    // The page arrives: settle, grow the list, decide has_more.
    loader.settle(controller.list(), ticket, LoadOutcome::Loaded);
    controller.list_mut().set_count(200);
    loader.set_has_more(true);
    println!(
        "loaded: count={} total={}",
        controller.list().count(),
        controller.list().total_height()
    );

    let _ = controller.scroll_to_index(150).expect("newly loaded row");
    println!("window={:?}", controller.window_range());
}
