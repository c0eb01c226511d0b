//! Projection of validation and submission outcomes onto the view

use serde::Serialize;
use tracing::debug;

use super::fields::{FieldName, FormFieldState};
use super::view::FormView;

/// Fixed text of the failure alert. The failure detail only goes to logs.
pub const FAILURE_ALERT: &str = "There was a problem submitting your form. Please try again.";

/// Outcome of the network round-trip, consumed immediately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "reason", rename_all = "snake_case")]
pub enum SubmissionResult {
    Success,
    Failure(String),
}

/// Stateless mapping from outcomes to markers.
///
/// The banner auto-hide timer is not scheduled here; the dispatcher owns
/// it because only one may be pending at a time.
pub struct Reflector<'a> {
    view: &'a dyn FormView,
}

impl<'a> Reflector<'a> {
    pub fn new(view: &'a dyn FormView) -> Self {
        Self { view }
    }

    /// Remove every field marker. Runs at the start of each attempt.
    pub fn clear_markers(&self) {
        for field in FieldName::ALL {
            self.view.set_field_error(field, false);
        }
    }

    /// Mark exactly the invalid fields.
    pub fn show_field_states(&self, states: &[FormFieldState]) {
        for state in states.iter().filter(|s| !s.is_valid) {
            debug!(field = %state.name, "marking field invalid");
            self.view.set_field_error(state.name, true);
        }
    }

    pub fn show_result(&self, result: &SubmissionResult) {
        match result {
            SubmissionResult::Success => {
                self.view.reset_fields();
                self.view.set_banner_visible(true);
            }
            SubmissionResult::Failure(_) => {
                self.view.alert(FAILURE_ALERT);
            }
        }
    }

    pub fn hide_banner(&self) {
        self.view.set_banner_visible(false);
    }
}
