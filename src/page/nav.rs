//! Navigation: mobile menu, sticky header, smooth scroll, active section

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use super::layout::PageLayout;

/// Mobile navigation menu and the page-level state it drives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavMenu {
    /// `show` class on the menu.
    pub open: bool,
    /// `overflow: hidden` on the body while the menu covers the page.
    pub body_locked: bool,
}

impl NavMenu {
    pub fn toggle(&mut self) {
        self.open = !self.open;
        self.body_locked = self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.body_locked = false;
    }

    /// Value of the toggle button's `aria-expanded` attribute.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }
}

/// Header gets `scrolled` once the page is scrolled past `offset`.
pub fn header_scrolled(scroll_y: f64, offset: f64) -> bool {
    scroll_y > offset
}

/// Scroll target for an in-page anchor, leaving room for the fixed header.
///
/// `None` when the anchor does not resolve; the click is still swallowed.
pub fn smooth_scroll_target(layout: &PageLayout, href: &str) -> Option<f64> {
    match layout.resolve(href) {
        Some(section) => Some(section.offset_top - layout.header_height),
        None => {
            warn!(href, "anchor target not found");
            None
        }
    }
}

/// Nav links whose section contains the probe line `scroll_y + offset`.
pub fn active_links(layout: &PageLayout, scroll_y: f64, offset: f64) -> BTreeSet<String> {
    let probe = scroll_y + offset;
    layout
        .nav_links
        .iter()
        .filter(|href| match layout.resolve(href) {
            Some(section) => section.contains(probe),
            None => {
                debug!(href = %href, "nav link has no section");
                false
            }
        })
        .cloned()
        .collect()
}
