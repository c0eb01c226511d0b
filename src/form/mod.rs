//! Contact form: validation, submission dispatch, and outcome reflection
//!
//! # Architecture
//!
//! ```text
//! SubmitEvent ──► ContactFormDispatcher ──► validate()
//!                        │                     │
//!                        │ ValidFields         ▼ FormFieldState[]
//!                        ▼                  Reflector ──► FormView
//!                  FormTransport (POST)        ▲
//!                        │                     │
//!                        └── SubmissionResult ─┘
//! ```

mod dispatch;
mod fields;
mod reflect;
mod transport;
mod validate;
mod view;

pub use dispatch::{ContactFormDispatcher, DispatchPhase, SubmitOutcome, DEFAULT_BANNER_DURATION};
pub use fields::{ContactForm, FieldName, FormFieldState, SubmitEvent, ValidFields};
pub use reflect::{Reflector, SubmissionResult, FAILURE_ALERT};
pub use transport::{multipart_body, FormTransport, HttpTransport};
pub use validate::{field_states, is_valid_email, is_valid_message, is_valid_name, validate};
pub use view::{FormView, MemoryView, ViewSnapshot};
