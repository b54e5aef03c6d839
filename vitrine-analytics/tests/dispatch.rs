//! Queueing, readiness and consent.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use common::{RecordingReporter, attached, dispatcher};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::sync::oneshot;
use vitrine_analytics::{
    Consent, ConsentStore, Dispatcher, DispatcherConfig, EventParams, MemoryConsentStore,
    ReportError, Reporter, StaticEnvironment, params,
};

#[tokio::test(start_paused = true)]
async fn test_queued_events_flush_in_order_enriched_at_flush_time() {
    let dispatcher = dispatcher();
    for i in 0..5 {
        dispatcher.record(&format!("event_{i}"), params! { "i" => i }).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
    }
    assert_eq!(dispatcher.queued(), 5);
    assert!(!dispatcher.is_ready());

    tokio::time::advance(Duration::from_secs(5)).await;
    let reporter = RecordingReporter::new();
    dispatcher.attach(reporter.clone()).unwrap();

    let events = reporter.events();
    assert_eq!(
        reporter.names(),
        vec!["event_0", "event_1", "event_2", "event_3", "event_4"]
    );
    for (i, (_, params)) in events.iter().enumerate() {
        assert_eq!(params["i"], json!(i));
        assert_eq!(params["session_duration"], json!(10), "enriched at flush");
        assert_eq!(params["user_agent"], json!("Mozilla/5.0 (Test)"));
        assert_eq!(params["viewport_width"], json!(1280));
        assert_eq!(params["viewport_height"], json!(720));
        assert!(params["timestamp"].as_str().unwrap().ends_with('Z'));
    }
    assert_eq!(dispatcher.queued(), 0);
    assert!(dispatcher.is_ready());
}

#[tokio::test]
async fn test_ready_dispatcher_forwards_immediately() {
    let (dispatcher, reporter) = attached();
    dispatcher.record("direct", params! {}).unwrap();
    assert_eq!(reporter.names(), vec!["direct"]);
    assert_eq!(dispatcher.queued(), 0);
}

#[tokio::test]
async fn test_second_attach_is_ignored() {
    let (dispatcher, first) = attached();
    let second = RecordingReporter::new();
    dispatcher.attach(second.clone()).unwrap();
    dispatcher.record("after", params! {}).unwrap();

    assert_eq!(first.names(), vec!["after"]);
    assert!(second.names().is_empty());
}

#[tokio::test]
async fn test_reporter_error_reaches_record_caller() {
    let dispatcher = dispatcher();
    dispatcher
        .attach(RecordingReporter::failing_on("bad"))
        .unwrap();
    assert!(dispatcher.record("bad", params! {}).is_err());
    assert!(dispatcher.record("good", params! {}).is_ok());
}

#[tokio::test]
async fn test_flush_error_drops_remaining_events_and_stays_ready() {
    let dispatcher = dispatcher();
    for name in ["a", "bad", "c"] {
        dispatcher.record(name, params! {}).unwrap();
    }
    let reporter = RecordingReporter::failing_on("bad");

    assert!(dispatcher.attach(reporter.clone()).is_err());
    assert_eq!(reporter.names(), vec!["a"]);
    assert_eq!(dispatcher.queued(), 0);
    assert!(dispatcher.is_ready());

    dispatcher.record("d", params! {}).unwrap();
    assert_eq!(reporter.names(), vec!["a", "d"]);
}

/// Answers every `click` by recording a `click_echo` through the dispatcher.
#[derive(Default)]
struct EchoReporter {
    dispatcher: OnceLock<Dispatcher>,
    names: Mutex<Vec<String>>,
}

impl Reporter for EchoReporter {
    fn report(&self, name: &str, _params: &EventParams) -> Result<(), ReportError> {
        self.names.lock().unwrap().push(name.to_owned());
        if name == "click"
            && let Some(dispatcher) = self.dispatcher.get()
        {
            dispatcher.record("click_echo", params! {})?;
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_reporter_may_record_through_the_dispatcher() {
    let dispatcher = dispatcher();
    dispatcher.record("click", params! {}).unwrap();
    dispatcher.record("scroll", params! {}).unwrap();

    let reporter = Arc::new(EchoReporter::default());
    reporter.dispatcher.set(dispatcher.clone()).ok().unwrap();
    dispatcher.attach(reporter.clone()).unwrap();
    assert_eq!(
        *reporter.names.lock().unwrap(),
        vec!["click", "scroll", "click_echo"],
        "events recorded during the flush join the back of the queue"
    );

    dispatcher.record("click", params! {}).unwrap();
    assert_eq!(
        *reporter.names.lock().unwrap(),
        vec!["click", "scroll", "click_echo", "click", "click_echo"]
    );
    assert_eq!(dispatcher.queued(), 0);
}

#[tokio::test]
async fn test_attach_when_ready_flushes_after_signal() {
    let dispatcher = dispatcher();
    dispatcher.record("early", params! {}).unwrap();

    let (ready, signal) = oneshot::channel::<Arc<dyn Reporter>>();
    let waiter = {
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move { dispatcher.attach_when_ready(signal).await })
    };
    let reporter = RecordingReporter::new();
    ready.send(reporter.clone()).ok().unwrap();
    waiter.await.unwrap().unwrap();

    assert_eq!(reporter.names(), vec!["early"]);
}

#[tokio::test]
async fn test_dropped_ready_signal_keeps_queueing() {
    let dispatcher = dispatcher();
    let (ready, signal) = oneshot::channel::<Arc<dyn Reporter>>();
    drop(ready);
    dispatcher.attach_when_ready(signal).await.unwrap();

    dispatcher.record("still_queued", params! {}).unwrap();
    assert!(!dispatcher.is_ready());
    assert_eq!(dispatcher.queued(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_poll_for_backend_checks_every_interval() {
    let dispatcher = dispatcher();
    dispatcher.record("queued", params! {}).unwrap();

    let reporter = RecordingReporter::new();
    let checks = Arc::new(AtomicUsize::new(0));
    let probe = {
        let reporter = reporter.clone();
        let checks = checks.clone();
        move || {
            if checks.fetch_add(1, Ordering::SeqCst) < 3 {
                None
            } else {
                Some(reporter.clone() as Arc<dyn Reporter>)
            }
        }
    };

    let started = tokio::time::Instant::now();
    dispatcher.poll_for_backend(probe).await.unwrap().unwrap();

    assert_eq!(checks.load(Ordering::SeqCst), 4);
    assert_eq!(started.elapsed(), Duration::from_millis(300));
    assert_eq!(reporter.names(), vec!["queued"]);
}

fn consent_dispatcher(store: Arc<MemoryConsentStore>) -> Dispatcher {
    Dispatcher::builder()
        .config(DispatcherConfig::builder().require_consent(true).build())
        .environment(StaticEnvironment::default())
        .consent_store(store)
        .build()
}

#[tokio::test]
async fn test_events_without_consent_are_dropped_not_queued() {
    let store = Arc::new(MemoryConsentStore::new());
    let dispatcher = consent_dispatcher(store);
    dispatcher.record("ignored", params! {}).unwrap();
    assert_eq!(dispatcher.queued(), 0);
}

#[tokio::test]
async fn test_accept_consent_persists_and_records_grant() {
    let store = Arc::new(MemoryConsentStore::new());
    let dispatcher = consent_dispatcher(store.clone());
    let reporter = RecordingReporter::new();
    dispatcher.attach(reporter.clone()).unwrap();

    dispatcher.accept_consent().unwrap();

    assert_eq!(store.get("analytics_consent").as_deref(), Some("accepted"));
    assert_eq!(dispatcher.consent(), Some(Consent::Accepted));
    let (name, params) = reporter.last();
    assert_eq!(name, "consent_granted");
    assert_eq!(params["consent_type"], json!("analytics"));
    assert_eq!(params["event_category"], json!("privacy"));
}

#[tokio::test]
async fn test_declined_consent_blocks_events() {
    let store = Arc::new(MemoryConsentStore::with_consent(Consent::Accepted));
    let dispatcher = consent_dispatcher(store.clone());
    let reporter = RecordingReporter::new();
    dispatcher.attach(reporter.clone()).unwrap();

    dispatcher.decline_consent();
    dispatcher.record("blocked", params! {}).unwrap();

    assert_eq!(store.get("analytics_consent").as_deref(), Some("declined"));
    assert!(reporter.names().is_empty());
}

#[tokio::test]
async fn test_helper_events_carry_categories() {
    let (dispatcher, reporter) = attached();
    dispatcher
        .track_template_view("saas", "Technology SaaS", "business")
        .unwrap();
    dispatcher.track_navigation("services", None).unwrap();
    dispatcher.track_download("brochure.pdf", "pdf").unwrap();

    let events = reporter.events();
    assert_eq!(events[0].0, "template_view");
    assert_eq!(events[0].1["template_category"], json!("business"));
    assert_eq!(events[0].1["event_category"], json!("template_interaction"));
    assert_eq!(events[1].0, "navigation_used");
    assert_eq!(events[1].1["navigation_method"], json!("click"));
    assert_eq!(events[2].1["file_name"], json!("brochure.pdf"));
    assert_eq!(events[2].1["event_category"], json!("engagement"));
}
