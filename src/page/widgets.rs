//! Gallery zoom, team cards, back-to-top button

use serde::Serialize;
use std::collections::BTreeSet;

/// Inline transform applied to a team card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CardTransform {
    /// No inline transform yet.
    #[default]
    #[serde(rename = "")]
    Unset,
    #[serde(rename = "translateY(-15px)")]
    Lifted,
    #[serde(rename = "translateY(0)")]
    Rest,
}

impl CardTransform {
    pub fn css(&self) -> &'static str {
        match self {
            CardTransform::Unset => "",
            CardTransform::Lifted => "translateY(-15px)",
            CardTransform::Rest => "translateY(0)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CardState {
    pub transform: CardTransform,
    /// `hover` class, toggled by touch since touch has no mouseenter.
    pub hover: bool,
}

impl CardState {
    pub fn mouse_enter(&mut self) {
        self.transform = CardTransform::Lifted;
    }

    pub fn mouse_leave(&mut self) {
        self.transform = CardTransform::Rest;
    }

    pub fn touch_start(&mut self) {
        self.hover = !self.hover;
    }
}

/// Indices of gallery images carrying the `zoomed` class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Gallery {
    zoomed: BTreeSet<usize>,
}

impl Gallery {
    /// Toggle zoom on one image. Returns the new state.
    pub fn toggle(&mut self, index: usize) -> bool {
        if self.zoomed.remove(&index) {
            false
        } else {
            self.zoomed.insert(index);
            true
        }
    }

    pub fn is_zoomed(&self, index: usize) -> bool {
        self.zoomed.contains(&index)
    }
}

/// Back-to-top button visibility for a scroll position.
pub fn back_to_top_visible(scroll_y: f64, offset: f64) -> bool {
    scroll_y > offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gallery_toggle_is_per_image() {
        let mut gallery = Gallery::default();
        assert!(gallery.toggle(2));
        assert!(gallery.toggle(0));
        assert!(!gallery.toggle(2));
        assert!(gallery.is_zoomed(0));
        assert!(!gallery.is_zoomed(2));
    }

    #[test]
    fn card_hover_cycle() {
        let mut card = CardState::default();
        assert_eq!(card.transform.css(), "");
        card.mouse_enter();
        assert_eq!(card.transform.css(), "translateY(-15px)");
        card.mouse_leave();
        assert_eq!(card.transform.css(), "translateY(0)");

        card.touch_start();
        assert!(card.hover);
        card.touch_start();
        assert!(!card.hover);
    }

    #[test]
    fn back_to_top_threshold() {
        assert!(!back_to_top_visible(300.0, 300.0));
        assert!(back_to_top_visible(301.0, 300.0));
    }
}
