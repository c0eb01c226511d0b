//! Scroll-triggered reveal hookup
//!
//! The animation library itself is opaque. The page only checks whether it
//! is available and, if so, hands it the site's reveal plan.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Edge the element animates in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Top,
    Bottom,
    Left,
    Right,
}

/// Options understood by the reveal library. Unset fields inherit from the
/// library-level defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    /// CSS length, e.g. `40px`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<bool>,
    /// Stagger between elements of one group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
}

/// One `reveal(selector, options)` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealGroup {
    pub selectors: Vec<String>,
    #[serde(default)]
    pub options: RevealOptions,
}

impl RevealGroup {
    fn new(selectors: &[&str], options: RevealOptions) -> Self {
        Self {
            selectors: selectors.iter().map(|s| s.to_string()).collect(),
            options,
        }
    }

    /// Comma-joined selector list as passed to the library.
    pub fn selector(&self) -> String {
        self.selectors.join(", ")
    }
}

/// Library defaults plus the groups to reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealPlan {
    pub defaults: RevealOptions,
    pub groups: Vec<RevealGroup>,
}

impl Default for RevealPlan {
    fn default() -> Self {
        let bottom = |interval_ms: u64, distance: Option<&str>| RevealOptions {
            origin: Some(Origin::Bottom),
            distance: distance.map(str::to_string),
            interval_ms: Some(interval_ms),
            ..RevealOptions::default()
        };

        Self {
            defaults: RevealOptions {
                origin: Some(Origin::Bottom),
                distance: Some("40px".into()),
                duration_ms: Some(1000),
                delay_ms: Some(200),
                mobile: Some(true),
                reset: Some(false),
                interval_ms: None,
            },
            groups: vec![
                RevealGroup::new(
                    &[".home-data", ".about-img", ".about-content"],
                    RevealOptions {
                        interval_ms: Some(200),
                        ..RevealOptions::default()
                    },
                ),
                RevealGroup::new(&[".card-container"], bottom(150, Some("30px"))),
                RevealGroup::new(&[".gallery-img"], bottom(100, Some("20px"))),
                RevealGroup::new(
                    &[".contact-info", ".contact-form-container"],
                    bottom(200, None),
                ),
            ],
        }
    }
}

/// The reveal library, when the host has it loaded.
pub trait RevealCapability: Send {
    /// Instantiate the library with its defaults.
    fn configure(&mut self, defaults: &RevealOptions);

    /// Register elements matching `selector` for reveal.
    fn reveal(&mut self, selector: &str, options: &RevealOptions);
}

/// Hand the plan to the library if present. Returns the number of groups
/// registered; an absent library is a no-op.
pub fn apply_reveal_plan(plan: &RevealPlan, capability: Option<&mut dyn RevealCapability>) -> usize {
    let Some(library) = capability else {
        debug!("reveal library not available, skipping animations");
        return 0;
    };

    library.configure(&plan.defaults);
    for group in &plan.groups {
        library.reveal(&group.selector(), &group.options);
    }
    debug!(groups = plan.groups.len(), "reveal plan applied");
    plan.groups.len()
}

/// Capability that records the calls it receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RevealLog {
    pub defaults: Option<RevealOptions>,
    pub revealed: Vec<(String, RevealOptions)>,
}

impl RevealCapability for RevealLog {
    fn configure(&mut self, defaults: &RevealOptions) {
        self.defaults = Some(defaults.clone());
    }

    fn reveal(&mut self, selector: &str, options: &RevealOptions) {
        self.revealed.push((selector.to_string(), options.clone()));
    }
}
