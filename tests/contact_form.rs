//! Contact form dispatcher tests against a scripted transport
//!
//! Time is paused so the banner timer can be stepped to the millisecond.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use url::Url;

use apn_site::form::{
    ContactForm, ContactFormDispatcher, DispatchPhase, FieldName, FormTransport, MemoryView,
    SubmitEvent, SubmitOutcome, ValidFields, FAILURE_ALERT,
};
use apn_site::TransportError;

// =============================================================================
// SCRIPTED TRANSPORT
// =============================================================================

/// Answers each call with the next scripted response; optionally holds the
/// request open until released.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<StatusCode, TransportError>>>,
    posted: Mutex<Vec<ContactForm>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl ScriptedTransport {
    fn answering(responses: Vec<Result<StatusCode, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    fn gated(self, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..self
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormTransport for ScriptedTransport {
    async fn post_form(
        &self,
        _action: &Url,
        fields: &ValidFields,
    ) -> Result<StatusCode, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.posted.lock().unwrap().push(fields.form().clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(StatusCode::OK))
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn filled() -> ContactForm {
    ContactForm::new("Ada Lovelace", "ada@example.org", "Hello from the tests")
}

fn setup(
    transport: ScriptedTransport,
    fields: ContactForm,
) -> (ContactFormDispatcher, Arc<ScriptedTransport>, Arc<MemoryView>) {
    let transport = Arc::new(transport);
    let view = Arc::new(MemoryView::new(fields));
    let dispatcher = ContactFormDispatcher::new(
        transport.clone(),
        view.clone(),
        Url::parse("https://forms.example.org/contact").unwrap(),
    );
    (dispatcher, transport, view)
}

async fn submit_current(dispatcher: &ContactFormDispatcher, view: &MemoryView) -> SubmitOutcome {
    let mut event = SubmitEvent::new(view.fields());
    let outcome = dispatcher.submit(&mut event).await;
    assert!(event.default_prevented());
    outcome
}

/// Advance paused time and let woken tasks run.
async fn advance_ms(ms: u64) {
    tokio::time::advance(Duration::from_millis(ms)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
// VALIDATION GATE
// =============================================================================

#[tokio::test(start_paused = true)]
async fn valid_form_posts_exactly_once() {
    let (dispatcher, transport, view) = setup(ScriptedTransport::default(), filled());

    let outcome = submit_current(&dispatcher, &view).await;

    assert_eq!(outcome, SubmitOutcome::Submitted);
    assert_eq!(transport.calls(), 1);
    assert_eq!(transport.posted.lock().unwrap()[0], filled());
}

#[tokio::test(start_paused = true)]
async fn invalid_fields_are_marked_and_nothing_is_sent() {
    let form = ContactForm::new("   ", "a b@c.com", "Still a message");
    let (dispatcher, transport, view) = setup(ScriptedTransport::default(), form.clone());

    let outcome = submit_current(&dispatcher, &view).await;

    assert_eq!(
        outcome,
        SubmitOutcome::Invalid {
            fields: vec![FieldName::Name, FieldName::Email]
        }
    );
    assert_eq!(transport.calls(), 0);

    let snap = view.snapshot();
    assert_eq!(
        snap.errors.into_iter().collect::<Vec<_>>(),
        vec![FieldName::Name, FieldName::Email]
    );
    assert_eq!(snap.fields, form);
    assert!(snap.alerts.is_empty());
    assert!(!snap.banner_visible);
    assert!(snap.submit_enabled);
    assert_eq!(dispatcher.phase(), DispatchPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn markers_are_cleared_on_the_next_attempt() {
    let (dispatcher, _transport, view) =
        setup(ScriptedTransport::default(), ContactForm::default());

    submit_current(&dispatcher, &view).await;
    assert_eq!(view.snapshot().errors.len(), 3);

    view.fill(ContactForm::new("Ada", "ada@example", "Hi"));
    let outcome = submit_current(&dispatcher, &view).await;
    assert_eq!(
        outcome,
        SubmitOutcome::Invalid {
            fields: vec![FieldName::Email]
        }
    );
    assert_eq!(
        view.snapshot().errors.into_iter().collect::<Vec<_>>(),
        vec![FieldName::Email]
    );

    view.fill(filled());
    assert_eq!(submit_current(&dispatcher, &view).await, SubmitOutcome::Submitted);
    assert!(view.snapshot().errors.is_empty());
}

// =============================================================================
// SUCCESS AND THE BANNER TIMER
// =============================================================================

#[tokio::test(start_paused = true)]
async fn success_resets_fields_and_hides_banner_after_exactly_5000ms() {
    let (dispatcher, _transport, view) = setup(ScriptedTransport::default(), filled());

    assert_eq!(submit_current(&dispatcher, &view).await, SubmitOutcome::Submitted);

    let snap = view.snapshot();
    assert_eq!(snap.fields, ContactForm::default());
    assert!(snap.banner_visible);
    assert!(snap.alerts.is_empty());
    assert_eq!(dispatcher.phase(), DispatchPhase::Submitted);
    assert!(dispatcher.banner_pending());

    advance_ms(4999).await;
    assert!(view.snapshot().banner_visible);
    assert_eq!(dispatcher.phase(), DispatchPhase::Submitted);

    advance_ms(1).await;
    assert!(!view.snapshot().banner_visible);
    assert_eq!(dispatcher.phase(), DispatchPhase::Idle);
    assert!(!dispatcher.banner_pending());

    advance_ms(20_000).await;
    assert_eq!(view.snapshot().banner_history, vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn second_success_replaces_the_pending_timer() {
    let (dispatcher, transport, view) = setup(ScriptedTransport::default(), filled());

    assert_eq!(submit_current(&dispatcher, &view).await, SubmitOutcome::Submitted);
    advance_ms(3000).await;

    view.fill(filled());
    assert_eq!(submit_current(&dispatcher, &view).await, SubmitOutcome::Submitted);
    assert_eq!(transport.calls(), 2);

    // The first timer would have fired at 5000.
    advance_ms(2500).await;
    assert!(view.snapshot().banner_visible);

    advance_ms(2499).await;
    assert!(view.snapshot().banner_visible);

    advance_ms(1).await;
    assert!(!view.snapshot().banner_visible);
    assert_eq!(view.snapshot().banner_history, vec![true, false, true, false]);
}

#[tokio::test(start_paused = true)]
async fn configured_banner_duration_is_honoured() {
    let (dispatcher, _transport, view) = setup(ScriptedTransport::default(), filled());
    let dispatcher = dispatcher.with_banner_duration(Duration::from_millis(1200));

    submit_current(&dispatcher, &view).await;
    advance_ms(1199).await;
    assert!(view.snapshot().banner_visible);
    advance_ms(1).await;
    assert!(!view.snapshot().banner_visible);
}

#[tokio::test(start_paused = true)]
async fn invalid_attempt_cancels_pending_banner_timer() {
    let (dispatcher, transport, view) = setup(ScriptedTransport::default(), filled());

    assert_eq!(submit_current(&dispatcher, &view).await, SubmitOutcome::Submitted);
    advance_ms(1000).await;

    // Fields were reset by the success, so this attempt is all-invalid.
    let outcome = submit_current(&dispatcher, &view).await;
    assert!(matches!(outcome, SubmitOutcome::Invalid { .. }));
    assert_eq!(transport.calls(), 1);

    let snap = view.snapshot();
    assert!(!snap.banner_visible);
    assert_eq!(snap.banner_history, vec![true, false]);
    assert!(!dispatcher.banner_pending());
    assert_eq!(dispatcher.phase(), DispatchPhase::Idle);

    // Past the point where the first timer would have fired.
    advance_ms(10_000).await;
    let later = view.snapshot();
    assert!(!later.banner_visible);
    assert_eq!(later.banner_history, vec![true, false]);
    assert_eq!(later.errors.len(), 3);
    assert_eq!(dispatcher.phase(), DispatchPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn failed_attempt_cancels_pending_banner_timer() {
    let (dispatcher, transport, view) = setup(
        ScriptedTransport::answering(vec![
            Ok(StatusCode::OK),
            Ok(StatusCode::INTERNAL_SERVER_ERROR),
        ]),
        filled(),
    );

    assert_eq!(submit_current(&dispatcher, &view).await, SubmitOutcome::Submitted);
    advance_ms(1000).await;

    view.fill(filled());
    let outcome = submit_current(&dispatcher, &view).await;
    assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
    assert_eq!(transport.calls(), 2);

    let snap = view.snapshot();
    assert!(!snap.banner_visible);
    assert_eq!(snap.banner_history, vec![true, false]);
    assert_eq!(snap.alerts, vec![FAILURE_ALERT.to_string()]);
    assert_eq!(snap.fields, filled());
    assert!(!dispatcher.banner_pending());

    advance_ms(10_000).await;
    let later = view.snapshot();
    assert!(!later.banner_visible);
    assert_eq!(later.banner_history, vec![true, false]);
    assert_eq!(later.fields, filled());
    assert_eq!(dispatcher.phase(), DispatchPhase::Idle);
}

// =============================================================================
// FAILURE
// =============================================================================

#[tokio::test(start_paused = true)]
async fn non_2xx_alerts_and_keeps_values() {
    let (dispatcher, transport, view) = setup(
        ScriptedTransport::answering(vec![Ok(StatusCode::INTERNAL_SERVER_ERROR)]),
        filled(),
    );

    let outcome = submit_current(&dispatcher, &view).await;

    match outcome {
        SubmitOutcome::Failed { reason } => assert!(reason.contains("500")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(transport.calls(), 1);

    let snap = view.snapshot();
    assert_eq!(snap.fields, filled());
    assert_eq!(snap.alerts, vec![FAILURE_ALERT.to_string()]);
    assert!(!snap.banner_visible);
    assert!(snap.banner_history.is_empty());
    assert!(snap.submit_enabled);
    assert_eq!(dispatcher.phase(), DispatchPhase::Idle);
    assert!(!dispatcher.banner_pending());
}

#[tokio::test(start_paused = true)]
async fn transport_error_alerts_and_keeps_values() {
    let (dispatcher, _transport, view) = setup(
        ScriptedTransport::answering(vec![Err(TransportError::InvalidAction(
            "ftp://forms.example.org".into(),
        ))]),
        filled(),
    );

    let outcome = submit_current(&dispatcher, &view).await;

    assert!(matches!(outcome, SubmitOutcome::Failed { .. }));
    let snap = view.snapshot();
    assert_eq!(snap.fields, filled());
    assert_eq!(snap.alerts.len(), 1);
    assert!(!snap.banner_visible);
}

#[tokio::test(start_paused = true)]
async fn failure_then_manual_retry_succeeds() {
    let (dispatcher, transport, view) = setup(
        ScriptedTransport::answering(vec![Ok(StatusCode::BAD_GATEWAY), Ok(StatusCode::CREATED)]),
        filled(),
    );

    assert!(matches!(
        submit_current(&dispatcher, &view).await,
        SubmitOutcome::Failed { .. }
    ));
    // No automatic retry happened.
    advance_ms(60_000).await;
    assert_eq!(transport.calls(), 1);

    assert_eq!(submit_current(&dispatcher, &view).await, SubmitOutcome::Submitted);
    assert_eq!(transport.calls(), 2);
    assert_eq!(view.snapshot().alerts.len(), 1);
}

// =============================================================================
// OVERLAPPING SUBMITS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn submit_while_in_flight_is_busy() {
    let gate = Arc::new(Notify::new());
    let (dispatcher, transport, view) =
        setup(ScriptedTransport::default().gated(gate.clone()), filled());
    let dispatcher = Arc::new(dispatcher);

    let first = {
        let dispatcher = dispatcher.clone();
        let mut event = SubmitEvent::new(view.fields());
        tokio::spawn(async move { dispatcher.submit(&mut event).await })
    };

    while transport.calls() == 0 {
        tokio::task::yield_now().await;
    }
    assert!(dispatcher.is_in_flight());
    assert_eq!(dispatcher.phase(), DispatchPhase::Submitting);
    assert!(!view.snapshot().submit_enabled);

    let mut event = SubmitEvent::new(view.fields());
    let second = dispatcher.submit(&mut event).await;
    assert_eq!(second, SubmitOutcome::Busy);
    assert!(event.default_prevented());
    assert_eq!(transport.calls(), 1);

    gate.notify_one();
    assert_eq!(first.await.unwrap(), SubmitOutcome::Submitted);
    assert!(!dispatcher.is_in_flight());
    assert!(view.snapshot().submit_enabled);
}

#[tokio::test(start_paused = true)]
async fn every_outcome_cancels_default_navigation() {
    let (dispatcher, _transport, view) = setup(
        ScriptedTransport::answering(vec![Ok(StatusCode::NOT_FOUND)]),
        ContactForm::default(),
    );

    let mut invalid = SubmitEvent::new(view.fields());
    dispatcher.submit(&mut invalid).await;
    assert!(invalid.default_prevented());

    let mut failed = SubmitEvent::new(filled());
    dispatcher.submit(&mut failed).await;
    assert!(failed.default_prevented());
}
