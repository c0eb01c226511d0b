//! Contact form submission dispatcher
//!
//! Sequences one submit attempt:
//!
//! ```text
//! Idle ──► Validating ──┬──► (invalid) ──────────────────► Idle
//!                       └──► Submitting ──┬──► Submitted ──(banner timer)──► Idle
//!                                         └──► (failed) ─────────────────► Idle
//! ```
//!
//! The banner auto-hide timer is the only thing that outlives an attempt.
//! At most one is pending: every new attempt cancels the previous one.

use reqwest::StatusCode;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info};
use url::Url;

use super::fields::{FieldName, SubmitEvent};
use super::reflect::{Reflector, SubmissionResult};
use super::transport::FormTransport;
use super::validate::{field_states, validate};
use super::view::FormView;
use crate::config::FormConfig;
use crate::error::SubmissionError;

/// Default banner auto-hide delay.
pub const DEFAULT_BANNER_DURATION: Duration = Duration::from_millis(5000);

/// Where the dispatcher currently is in an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    /// Success banner showing, hide timer pending.
    Submitted,
}

/// How a single submit attempt ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Validation failed; these fields are marked.
    Invalid { fields: Vec<FieldName> },
    /// 2xx received; fields reset and banner shown.
    Submitted,
    /// Non-2xx or network failure; the user was alerted.
    Failed { reason: String },
    /// Another attempt was still in flight; nothing happened.
    Busy,
}

#[derive(Default)]
struct BannerTimer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    view: Arc<dyn FormView>,
    phase: Mutex<DispatchPhase>,
    timer: Mutex<BannerTimer>,
    in_flight: AtomicBool,
}

impl Shared {
    fn set_phase(&self, phase: DispatchPhase) {
        let mut current = lock(&self.phase);
        if *current != phase {
            debug!(from = ?*current, to = ?phase, "dispatch phase");
            *current = phase;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Clears the in-flight flag and re-enables submit however the attempt ends.
struct InFlight<'a>(&'a Shared);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.view.set_submit_enabled(true);
        self.0.in_flight.store(false, Ordering::Release);
    }
}

/// Orchestrates validation, the POST, and outcome reflection.
pub struct ContactFormDispatcher {
    transport: Arc<dyn FormTransport>,
    action: Url,
    banner_duration: Duration,
    shared: Arc<Shared>,
}

impl ContactFormDispatcher {
    pub fn new(transport: Arc<dyn FormTransport>, view: Arc<dyn FormView>, action: Url) -> Self {
        Self {
            transport,
            action,
            banner_duration: DEFAULT_BANNER_DURATION,
            shared: Arc::new(Shared {
                view,
                phase: Mutex::new(DispatchPhase::Idle),
                timer: Mutex::new(BannerTimer::default()),
                in_flight: AtomicBool::new(false),
            }),
        }
    }

    pub fn from_config(
        config: &FormConfig,
        transport: Arc<dyn FormTransport>,
        view: Arc<dyn FormView>,
    ) -> Self {
        Self::new(transport, view, config.action.clone())
            .with_banner_duration(config.banner_duration())
    }

    pub fn with_banner_duration(mut self, duration: Duration) -> Self {
        self.banner_duration = duration;
        self
    }

    pub fn action(&self) -> &Url {
        &self.action
    }

    pub fn phase(&self) -> DispatchPhase {
        *lock(&self.shared.phase)
    }

    /// Whether a banner auto-hide is scheduled and has not fired yet.
    pub fn banner_pending(&self) -> bool {
        lock(&self.shared.timer).handle.is_some()
    }

    pub fn is_in_flight(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Handle one submit action.
    ///
    /// Must run inside a tokio runtime; a successful attempt spawns the
    /// banner timer.
    pub async fn submit(&self, event: &mut SubmitEvent) -> SubmitOutcome {
        event.prevent_default();

        if self.shared.in_flight.swap(true, Ordering::AcqRel) {
            debug!("submit ignored, previous attempt still in flight");
            return SubmitOutcome::Busy;
        }
        let _in_flight = InFlight(&self.shared);

        let view: &dyn FormView = self.shared.view.as_ref();
        let reflector = Reflector::new(view);

        self.cancel_banner_timer();
        reflector.hide_banner();
        reflector.clear_markers();

        self.shared.set_phase(DispatchPhase::Validating);
        let fields = match validate(&event.form) {
            Ok(fields) => fields,
            Err(err) => {
                debug!(%err, "contact form rejected");
                reflector.show_field_states(&field_states(&event.form));
                self.shared.set_phase(DispatchPhase::Idle);
                return SubmitOutcome::Invalid {
                    fields: err.invalid,
                };
            }
        };

        self.shared.set_phase(DispatchPhase::Submitting);
        view.set_submit_enabled(false);
        info!(action = %self.action, "submitting contact form");

        let result = match self.transport.post_form(&self.action, &fields).await {
            Ok(status) => classify(status),
            Err(err) => Err(SubmissionError::from(err)),
        };

        match result {
            Ok(()) => {
                info!("contact form submitted");
                reflector.show_result(&SubmissionResult::Success);
                self.shared.set_phase(DispatchPhase::Submitted);
                self.schedule_banner_hide();
                SubmitOutcome::Submitted
            }
            Err(err) => {
                error!(error = %err, "contact form submission failed");
                let reason = err.to_string();
                reflector.show_result(&SubmissionResult::Failure(reason.clone()));
                self.shared.set_phase(DispatchPhase::Idle);
                SubmitOutcome::Failed { reason }
            }
        }
    }

    fn cancel_banner_timer(&self) {
        let mut timer = lock(&self.shared.timer);
        timer.generation += 1;
        if let Some(handle) = timer.handle.take() {
            debug!("cancelling pending banner timer");
            handle.abort();
        }
    }

    fn schedule_banner_hide(&self) {
        let deadline = Instant::now() + self.banner_duration;
        let shared = Arc::clone(&self.shared);

        let mut timer = lock(&self.shared.timer);
        if let Some(previous) = timer.handle.take() {
            previous.abort();
        }
        timer.generation += 1;
        let generation = timer.generation;

        timer.handle = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;

            // A newer attempt may have replaced this timer between wake-up
            // and here; only the current generation may touch the banner.
            let mut timer = lock(&shared.timer);
            if timer.generation != generation {
                return;
            }
            timer.handle = None;
            Reflector::new(shared.view.as_ref()).hide_banner();
            shared.set_phase(DispatchPhase::Idle);
        }));
    }
}

fn classify(status: StatusCode) -> Result<(), SubmissionError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(SubmissionError::Status(status))
    }
}
