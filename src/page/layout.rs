//! Layout facts the page model needs from the host

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vertical extent of a section, in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionBox {
    pub offset_top: f64,
    pub height: f64,
}

impl SectionBox {
    pub fn new(offset_top: f64, height: f64) -> Self {
        Self { offset_top, height }
    }

    /// Half-open: the top edge is inside, the bottom edge is not.
    pub fn contains(&self, y: f64) -> bool {
        self.offset_top <= y && self.offset_top + self.height > y
    }
}

/// Host capability flags used for touch detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchSupport {
    /// `ontouchstart` exists on the window.
    pub touch_events: bool,
    /// `navigator.maxTouchPoints`.
    pub max_touch_points: u32,
}

impl TouchSupport {
    pub fn is_touch_device(&self) -> bool {
        self.touch_events || self.max_touch_points > 0
    }
}

/// Measured page structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Rendered height of the fixed header.
    pub header_height: f64,
    /// Sections by element id (without `#`).
    pub sections: BTreeMap<String, SectionBox>,
    /// `href` of every `.nav-link`, in document order.
    pub nav_links: Vec<String>,
    pub gallery_images: usize,
    pub cards: usize,
    pub touch: TouchSupport,
}

impl PageLayout {
    /// Resolve an in-page `href` such as `#about` to its section.
    pub fn resolve(&self, href: &str) -> Option<&SectionBox> {
        let id = href.strip_prefix('#')?;
        if id.is_empty() {
            return None;
        }
        self.sections.get(id)
    }

    pub fn is_nav_link(&self, href: &str) -> bool {
        self.nav_links.iter().any(|link| link == href)
    }

    pub fn with_section(mut self, id: impl Into<String>, section: SectionBox) -> Self {
        self.sections.insert(id.into(), section);
        self
    }

    pub fn with_nav_link(mut self, href: impl Into<String>) -> Self {
        self.nav_links.push(href.into());
        self
    }
}
