//! Interactive layer of the Advancement Pioneers Network website
//!
//! The browser is kept behind small traits so the logic runs and tests
//! without a rendering engine:
//!
//! - [`form`]: contact form validation, submission dispatch over
//!   [`form::FormTransport`], and outcome reflection onto a
//!   [`form::FormView`]
//! - [`page`]: navigation, sticky header, smooth scroll, active section,
//!   gallery, cards, reveal hookup and back-to-top as a pure event processor
//! - [`debounce`]: collapsing bursts of events into one call
//! - [`config`]: YAML configuration with site defaults
//!
//! # Example
//!
//! ```ignore
//! use apn_site::form::{ContactForm, ContactFormDispatcher, HttpTransport, MemoryView, SubmitEvent};
//!
//! let view = Arc::new(MemoryView::default());
//! let transport = Arc::new(HttpTransport::new(config.form.request_timeout())?);
//! let dispatcher = ContactFormDispatcher::from_config(&config.form, transport, view.clone());
//!
//! let mut event = SubmitEvent::new(ContactForm::new("Ada", "ada@example.org", "Hello"));
//! let outcome = dispatcher.submit(&mut event).await;
//! ```

pub mod config;
pub mod debounce;
pub mod error;
pub mod form;
pub mod page;

pub use config::{ConfigLoader, SiteConfig};
pub use debounce::{Debounced, Debouncer};
pub use error::{ConfigError, Result, SiteError, SubmissionError, TransportError, ValidationError};
pub use form::{ContactForm, ContactFormDispatcher, SubmitEvent, SubmitOutcome};
pub use page::{Page, PageEffect, PageEvent, PageLayout, PageState};
