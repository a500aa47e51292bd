use vlist::VirtualList;

/// Outcome of a settled load request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// More items arrived; the caller grows the list count and decides
    /// `has_more`.
    Loaded,
    /// The request failed. The guard is released so a later scroll retries;
    /// `has_more` is untouched (turning it off is the caller's decision).
    Failed,
}

/// A one-shot token for an in-flight load request.
///
/// Issued by [`InfiniteLoader::maybe_load_more`] and consumed by
/// [`InfiniteLoader::settle`]. The captured epoch fences completions that
/// land after the list's generation changed mid-flight.
#[derive(Debug)]
pub struct LoadTicket {
    epoch: u64,
}

/// Watches distance-to-end and triggers at most one load request at a time.
///
/// The engine itself never blocks: the asynchronous load lives with the
/// caller, which runs it however it likes (future, task, request) and
/// settles the ticket when it completes. Dedupe is guard-based, not
/// time-based — however many scroll events fire while a request is in
/// flight, no second ticket is issued until the first settles.
#[derive(Clone, Debug)]
pub struct InfiniteLoader {
    threshold: u64,
    has_more: bool,
    loading: bool,
}

impl InfiniteLoader {
    pub fn new(threshold: u64) -> Self {
        Self {
            threshold,
            has_more: true,
            loading: false,
        }
    }

    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u64) {
        self.threshold = threshold;
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// `has_more` belongs to the caller (an empty page, an error it deems
    /// terminal); settling a request never flips it.
    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Remaining content below the viewport.
    pub fn distance_to_end(list: &VirtualList) -> u64 {
        let bottom = list
            .scroll_top()
            .saturating_add(list.viewport_height() as u64);
        list.total_height().saturating_sub(bottom)
    }

    /// Evaluates the proximity condition and issues a ticket when a load
    /// should start.
    ///
    /// Returns `None` — a silent no-op, not a failure — while a request is
    /// in flight, when the caller said there is nothing more, or while the
    /// end is farther away than `threshold`.
    pub fn maybe_load_more(&mut self, list: &VirtualList) -> Option<LoadTicket> {
        if !self.has_more || self.loading {
            return None;
        }
        if Self::distance_to_end(list) >= self.threshold {
            return None;
        }
        self.loading = true;
        let ticket = LoadTicket {
            epoch: list.epoch(),
        };
        ldebug!(epoch = ticket.epoch, "load request issued");
        Some(ticket)
    }

    /// Settles an in-flight request; success and failure both release the
    /// guard.
    ///
    /// A ticket issued before a generation reset is stale: the completion
    /// belongs to superseded content and is ignored ([`Self::reset`] is the
    /// swap workflow's release).
    pub fn settle(&mut self, list: &VirtualList, ticket: LoadTicket, outcome: LoadOutcome) {
        if ticket.epoch != list.epoch() {
            ldebug!(
                epoch = ticket.epoch,
                current = list.epoch(),
                "stale load completion dropped"
            );
            return;
        }
        ltrace!(epoch = ticket.epoch, "load request settled");
        match outcome {
            LoadOutcome::Loaded | LoadOutcome::Failed => self.loading = false,
        }
    }

    /// Releases the guard on a wholesale data swap; call alongside
    /// [`VirtualList::reset_generation`].
    pub fn reset(&mut self) {
        self.loading = false;
    }
}
