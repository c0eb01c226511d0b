//! Page interaction model
//!
//! Everything the site script does outside the contact form, as a pure
//! state machine. The host feeds [`PageEvent`]s in, reads [`PageState`]
//! back to sync classes and attributes, and performs the [`PageEffect`]s it
//! is handed (the model never scrolls the window itself).
//!
//! ```text
//! scroll / click / touch ─► PageEvent ─► Page::handle ─┬─► PageState (classes, attrs)
//!                                                      └─► PageEffect (scroll, log)
//! ```

mod layout;
mod nav;
mod replay;
mod reveal;
mod widgets;

pub use layout::{PageLayout, SectionBox, TouchSupport};
pub use nav::{active_links, header_scrolled, smooth_scroll_target, NavMenu};
pub use replay::{replay, ReplayReport, TimedEvent};
pub use reveal::{
    apply_reveal_plan, Origin, RevealCapability, RevealGroup, RevealLog, RevealOptions, RevealPlan,
};
pub use widgets::{back_to_top_visible, CardState, CardTransform, Gallery};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::config::{PageConfig, SiteConfig};

/// Host event delivered to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// DOM ready, with the restored scroll position.
    Loaded {
        #[serde(default)]
        y: f64,
    },
    Scrolled {
        y: f64,
    },
    NavToggleClicked,
    /// Any anchor click. Nav links also close the mobile menu.
    LinkClicked {
        href: String,
    },
    GalleryImageClicked {
        index: usize,
    },
    CardMouseEnter {
        index: usize,
    },
    CardMouseLeave {
        index: usize,
    },
    CardTouchStart {
        index: usize,
    },
    BackToTopClicked,
    SocialIconClicked {
        href: String,
    },
}

impl PageEvent {
    pub fn is_scroll(&self) -> bool {
        matches!(self, PageEvent::Scrolled { .. })
    }
}

/// Work the host has to carry out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PageEffect {
    /// Cancel the browser's default navigation for the event.
    PreventDefault,
    ScrollTo { top: f64, smooth: bool },
    /// Footer social icon clicked; hook for analytics.
    SocialClick { href: String },
}

/// Everything the page shows that the script controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageState {
    pub scroll_y: f64,
    pub nav: NavMenu,
    pub header_scrolled: bool,
    pub active_links: BTreeSet<String>,
    pub gallery: Gallery,
    pub cards: Vec<CardState>,
    pub back_to_top_visible: bool,
    pub touch_device: bool,
    /// Reveal groups registered with the animation library.
    pub revealed_groups: usize,
}

/// Event processor owning the page state.
pub struct Page {
    config: PageConfig,
    layout: PageLayout,
    reveal_plan: RevealPlan,
    reveal: Option<Box<dyn RevealCapability>>,
    state: PageState,
}

impl Page {
    pub fn new(config: PageConfig, layout: PageLayout) -> Self {
        let state = PageState {
            cards: vec![CardState::default(); layout.cards],
            ..PageState::default()
        };
        Self {
            config,
            layout,
            reveal_plan: RevealPlan::default(),
            reveal: None,
            state,
        }
    }

    pub fn from_site_config(config: &SiteConfig, layout: PageLayout) -> Self {
        let mut page = Self::new(config.page.clone(), layout);
        page.reveal_plan = config.reveal.clone();
        page
    }

    /// Make the reveal library available to the page.
    pub fn with_reveal(mut self, capability: Box<dyn RevealCapability>) -> Self {
        self.reveal = Some(capability);
        self
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn handle(&mut self, event: &PageEvent) -> Vec<PageEffect> {
        let mut effects = Vec::new();

        match event {
            PageEvent::Loaded { y } => self.on_load(*y),
            PageEvent::Scrolled { y } => self.on_scroll(*y),
            PageEvent::NavToggleClicked => {
                self.state.nav.toggle();
                debug!(open = self.state.nav.open, "nav menu toggled");
            }
            PageEvent::LinkClicked { href } => self.on_link(href, &mut effects),
            PageEvent::GalleryImageClicked { index } => {
                if *index < self.layout.gallery_images {
                    self.state.gallery.toggle(*index);
                } else {
                    warn!(index, "click on unknown gallery image");
                }
            }
            PageEvent::CardMouseEnter { index } => self.with_card(*index, CardState::mouse_enter),
            PageEvent::CardMouseLeave { index } => self.with_card(*index, CardState::mouse_leave),
            PageEvent::CardTouchStart { index } => self.with_card(*index, CardState::touch_start),
            PageEvent::BackToTopClicked => effects.push(PageEffect::ScrollTo {
                top: 0.0,
                smooth: true,
            }),
            PageEvent::SocialIconClicked { href } => {
                info!(href = %href, "Social icon clicked");
                effects.push(PageEffect::SocialClick { href: href.clone() });
            }
        }

        effects
    }

    fn on_load(&mut self, y: f64) {
        self.state.touch_device = self.layout.touch.is_touch_device();
        self.state.scroll_y = y;
        self.state.active_links =
            active_links(&self.layout, y, self.config.active_section_offset);
        self.state.back_to_top_visible = back_to_top_visible(y, self.config.back_to_top_offset);

        let capability = self
            .reveal
            .as_mut()
            .map(|boxed| boxed.as_mut() as &mut dyn RevealCapability);
        self.state.revealed_groups = apply_reveal_plan(&self.reveal_plan, capability);
    }

    fn on_scroll(&mut self, y: f64) {
        self.state.scroll_y = y;
        self.state.header_scrolled = header_scrolled(y, self.config.sticky_header_offset);
        self.state.active_links =
            active_links(&self.layout, y, self.config.active_section_offset);
        self.state.back_to_top_visible = back_to_top_visible(y, self.config.back_to_top_offset);
    }

    fn on_link(&mut self, href: &str, effects: &mut Vec<PageEffect>) {
        if self.layout.is_nav_link(href) {
            self.state.nav.close();
        }
        if href.starts_with('#') {
            effects.push(PageEffect::PreventDefault);
            if let Some(top) = smooth_scroll_target(&self.layout, href) {
                effects.push(PageEffect::ScrollTo { top, smooth: true });
            }
        }
    }

    fn with_card(&mut self, index: usize, apply: fn(&mut CardState)) {
        match self.state.cards.get_mut(index) {
            Some(card) => apply(card),
            None => warn!(index, "event on unknown card"),
        }
    }
}
