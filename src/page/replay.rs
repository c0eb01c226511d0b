//! Replaying a recorded page-event log
//!
//! The site runs its scroll handlers on every scroll, so the page state
//! after a burst must reflect where the burst ended. Replay coalesces
//! bursts on the trailing edge and flushes the settled position before any
//! other event and at the end of the log. Only the intermediate positions
//! are dropped.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{Page, PageEffect, PageEvent, PageState};
use crate::debounce::Debouncer;

/// A page event and when it happened, in milliseconds from the start of
/// the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub at_ms: u64,
    pub event: PageEvent,
}

impl TimedEvent {
    pub fn new(at_ms: u64, event: PageEvent) -> Self {
        Self { at_ms, event }
    }
}

/// What a replay did to the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayReport {
    /// Events that reached [`Page::handle`].
    pub handled: usize,
    /// Scroll events folded into a later position of the same burst.
    pub coalesced: usize,
    pub effects: Vec<PageEffect>,
    pub state: PageState,
}

#[derive(Default)]
struct Tally {
    handled: usize,
    scrolls_seen: usize,
    scrolls_handled: usize,
    effects: Vec<PageEffect>,
}

impl Tally {
    fn apply(&mut self, page: &mut Page, event: &PageEvent) {
        self.handled += 1;
        if event.is_scroll() {
            self.scrolls_handled += 1;
        }
        self.effects.extend(page.handle(event));
    }
}

/// Feed `events` through `page`, coalescing scroll bursts closer together
/// than `wait`.
pub fn replay<I>(page: &mut Page, wait: Duration, events: I) -> ReplayReport
where
    I: IntoIterator<Item = TimedEvent>,
{
    let mut scrolls: Debouncer<PageEvent> = Debouncer::new(wait, false);
    let mut tally = Tally::default();

    for TimedEvent { at_ms, event } in events {
        if let Some(settled) = scrolls.poll(at_ms) {
            tally.apply(page, &settled);
        }

        if event.is_scroll() {
            tally.scrolls_seen += 1;
            if let Some(ready) = scrolls.trigger(at_ms, event) {
                tally.apply(page, &ready);
            }
        } else {
            if let Some(settled) = scrolls.flush() {
                tally.apply(page, &settled);
            }
            tally.apply(page, &event);
        }
    }
    if let Some(settled) = scrolls.flush() {
        tally.apply(page, &settled);
    }

    let coalesced = tally.scrolls_seen - tally.scrolls_handled;
    debug!(handled = tally.handled, coalesced, "replay finished");

    ReplayReport {
        handled: tally.handled,
        coalesced,
        effects: tally.effects,
        state: page.state().clone(),
    }
}
