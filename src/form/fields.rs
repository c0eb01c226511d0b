//! Contact form field types

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three named inputs of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Name,
    Email,
    Message,
}

impl FieldName {
    /// All fields, in form order.
    pub const ALL: [FieldName; 3] = [FieldName::Name, FieldName::Email, FieldName::Message];

    /// The `name` attribute used in the multipart body.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Name => "name",
            FieldName::Email => "email",
            FieldName::Message => "message",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn value(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Message => &self.message,
        }
    }
}

/// Result of checking one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFieldState {
    pub name: FieldName,
    pub raw_value: String,
    pub is_valid: bool,
}

/// Fields that passed validation.
///
/// Only constructed by the validator, so holding one means every rule
/// held at the time of the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    form: ContactForm,
}

impl ValidFields {
    pub(crate) fn new(form: ContactForm) -> Self {
        Self { form }
    }

    /// Field name/value pairs in form order, as they go on the wire.
    pub fn parts(&self) -> impl Iterator<Item = (&'static str, &str)> {
        FieldName::ALL
            .into_iter()
            .map(move |f| (f.as_str(), self.form.value(f)))
    }

    pub fn form(&self) -> &ContactForm {
        &self.form
    }
}

/// A user-initiated submit action.
///
/// Mirrors the browser event: the dispatcher cancels the default
/// navigation before doing anything else.
#[derive(Debug, Clone)]
pub struct SubmitEvent {
    pub form: ContactForm,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: ContactForm) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}
