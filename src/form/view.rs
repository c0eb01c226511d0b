//! The browser boundary of the contact form
//!
//! `FormView` is everything the dispatcher is allowed to do to the page.
//! `MemoryView` is a headless implementation that records the state it
//! is driven into, for the CLI and for tests.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};

use super::fields::{ContactForm, FieldName};

/// Visible surface of the contact form.
///
/// Methods take `&self` because the banner timer calls back into the view
/// from a spawned task.
pub trait FormView: Send + Sync {
    /// Add or remove the `error` marker on one field.
    fn set_field_error(&self, field: FieldName, error: bool);

    /// Clear every input (the browser's `form.reset()`).
    fn reset_fields(&self);

    /// Toggle the `show` marker on the success banner.
    fn set_banner_visible(&self, visible: bool);

    /// Enable or disable the submit control.
    fn set_submit_enabled(&self, enabled: bool);

    /// Blocking user notification.
    fn alert(&self, message: &str);
}

/// What a `MemoryView` currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewSnapshot {
    pub fields: ContactForm,
    pub errors: BTreeSet<FieldName>,
    pub banner_visible: bool,
    pub submit_enabled: bool,
    pub alerts: Vec<String>,
    /// Every banner transition in order, `true` for shown.
    pub banner_history: Vec<bool>,
}

/// Headless view backed by a mutex.
#[derive(Debug)]
pub struct MemoryView {
    state: Mutex<ViewSnapshot>,
}

impl MemoryView {
    pub fn new(fields: ContactForm) -> Self {
        Self {
            state: Mutex::new(ViewSnapshot {
                fields,
                errors: BTreeSet::new(),
                banner_visible: false,
                submit_enabled: true,
                alerts: Vec::new(),
                banner_history: Vec::new(),
            }),
        }
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.lock().clone()
    }

    /// Current input values, as the next submit would read them.
    pub fn fields(&self) -> ContactForm {
        self.lock().fields.clone()
    }

    /// Simulate the user typing into the form.
    pub fn fill(&self, fields: ContactForm) {
        self.lock().fields = fields;
    }

    fn lock(&self) -> MutexGuard<'_, ViewSnapshot> {
        // A poisoned lock only means a panicking test; the data is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new(ContactForm::default())
    }
}

impl FormView for MemoryView {
    fn set_field_error(&self, field: FieldName, error: bool) {
        let mut state = self.lock();
        if error {
            state.errors.insert(field);
        } else {
            state.errors.remove(&field);
        }
    }

    fn reset_fields(&self) {
        self.lock().fields = ContactForm::default();
    }

    fn set_banner_visible(&self, visible: bool) {
        let mut state = self.lock();
        if state.banner_visible != visible {
            state.banner_history.push(visible);
        }
        state.banner_visible = visible;
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.lock().submit_enabled = enabled;
    }

    fn alert(&self, message: &str) {
        self.lock().alerts.push(message.to_string());
    }
}
