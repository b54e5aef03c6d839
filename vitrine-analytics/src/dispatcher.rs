//! Event queueing and forwarding.
//!
//! Before a [`Reporter`] is attached every event is appended to a FIFO queue.
//! Attaching drains the queue in insertion order and flips the dispatcher
//! into forwarding mode for good. Events recorded while the flush is running
//! join the back of the queue, so a flush and a concurrent
//! [`Dispatcher::record`] never interleave.
//!
//! The reporter is always called with no lock held, so it may itself record
//! through the same dispatcher.
//!
//! Readiness is a one-shot signal. It can be delivered three ways:
//!
//! - [`Dispatcher::attach`] when the host already holds the reporter
//! - [`Dispatcher::attach_when_ready`] when the host will send it later
//! - [`Dispatcher::poll_for_backend`] when the host can only check whether the
//!   backend script finished loading

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::consent::{CONSENT_KEY, Consent, ConsentStore, MemoryConsentStore};
use crate::enrich::{Environment, StaticEnvironment, enrich};
use crate::error::ReportError;
use crate::reporter::{BackendProbe, EventParams, Reporter};

/// An event recorded before the reporter was attached.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedEvent {
    /// Event name.
    pub name: String,
    /// Caller parameters, not yet enriched.
    pub parameters: EventParams,
}

/// Dispatcher behavior switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Drop events unless consent was accepted.
    pub require_consent: bool,
    /// Period of [`Dispatcher::poll_for_backend`].
    pub poll_interval: Duration,
    /// Delay before the performance report is taken.
    pub performance_delay: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            require_consent: false,
            poll_interval: Duration::from_millis(100),
            performance_delay: Duration::from_secs(3),
        }
    }
}

impl DispatcherConfig {
    /// Create a new builder for DispatcherConfig.
    pub fn builder() -> DispatcherConfigBuilder {
        DispatcherConfigBuilder::default()
    }
}

/// Builder for [`DispatcherConfig`].
#[derive(Debug, Clone, Default)]
pub struct DispatcherConfigBuilder {
    config: DispatcherConfig,
}

impl DispatcherConfigBuilder {
    /// Drop events unless consent was accepted.
    pub fn require_consent(mut self, required: bool) -> Self {
        self.config.require_consent = required;
        self
    }

    /// Set the backend polling period.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the performance report delay.
    pub fn performance_delay(mut self, delay: Duration) -> Self {
        self.config.performance_delay = delay;
        self
    }

    /// Build the DispatcherConfig.
    pub fn build(self) -> DispatcherConfig {
        self.config
    }
}

struct State {
    reporter: Option<Arc<dyn Reporter>>,
    queue: VecDeque<QueuedEvent>,
    flushing: bool,
}

struct Inner {
    config: DispatcherConfig,
    session_start: Instant,
    environment: Arc<dyn Environment>,
    consent: Arc<dyn ConsentStore>,
    state: Mutex<State>,
}

/// Buffers events until the reporting backend is ready, then forwards them.
///
/// Cheap to clone; clones share the queue and the reporter.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("Dispatcher")
            .field("config", &self.inner.config)
            .field("ready", &state.reporter.is_some())
            .field("queued", &state.queue.len())
            .finish()
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Dispatcher {
    /// Create a new builder for Dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// The active configuration.
    pub fn config(&self) -> &DispatcherConfig {
        &self.inner.config
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a reporter is attached.
    pub fn is_ready(&self) -> bool {
        self.lock().reporter.is_some()
    }

    /// Number of events waiting for the reporter.
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    /// Records an event.
    ///
    /// Queued when no reporter is attached yet, otherwise enriched and
    /// forwarded right away. Dropped when consent is required but missing.
    pub fn record(&self, name: &str, parameters: EventParams) -> Result<(), ReportError> {
        if !self.has_consent() {
            debug!(event = name, "event not sent, consent not given");
            return Ok(());
        }

        let mut state = self.lock();
        match state.reporter.clone() {
            Some(reporter) if !state.flushing => {
                drop(state);
                self.send(reporter.as_ref(), name, &parameters)
            }
            _ => {
                state.queue.push_back(QueuedEvent {
                    name: name.to_owned(),
                    parameters,
                });
                Ok(())
            }
        }
    }

    /// Attaches the reporter and flushes the queue in insertion order.
    ///
    /// Only the first call has an effect. If the reporter fails during the
    /// flush, the remaining queued events are dropped and the error is
    /// returned; the dispatcher stays ready.
    pub fn attach(&self, reporter: Arc<dyn Reporter>) -> Result<(), ReportError> {
        let mut state = self.lock();
        if state.reporter.is_some() {
            debug!("reporter already attached");
            return Ok(());
        }
        state.reporter = Some(Arc::clone(&reporter));
        state.flushing = true;
        debug!(queued = state.queue.len(), "reporter attached, flushing queue");

        loop {
            let batch = std::mem::take(&mut state.queue);
            if batch.is_empty() {
                state.flushing = false;
                return Ok(());
            }
            drop(state);
            for event in batch {
                if let Err(error) = self.send(reporter.as_ref(), &event.name, &event.parameters) {
                    let mut state = self.lock();
                    state.queue.clear();
                    state.flushing = false;
                    return Err(error);
                }
            }
            state = self.lock();
        }
    }

    /// Waits for the reporter to be sent on `ready`, then attaches it.
    ///
    /// If the sender is dropped the dispatcher keeps queueing.
    pub async fn attach_when_ready(
        &self,
        ready: oneshot::Receiver<Arc<dyn Reporter>>,
    ) -> Result<(), ReportError> {
        match ready.await {
            Ok(reporter) => self.attach(reporter),
            Err(_) => {
                debug!("reporter sender dropped before readiness");
                Ok(())
            }
        }
    }

    /// Checks `probe` now and then every `poll_interval` until it yields a
    /// reporter, then attaches it.
    ///
    /// The loop has no timeout; abort the returned handle to stop it.
    pub fn poll_for_backend<P>(&self, probe: P) -> JoinHandle<Result<(), ReportError>>
    where
        P: BackendProbe + 'static,
    {
        let dispatcher = self.clone();
        let interval = self.inner.config.poll_interval;
        tokio::spawn(async move {
            loop {
                if let Some(reporter) = probe.detect() {
                    return dispatcher.attach(reporter);
                }
                tokio::time::sleep(interval).await;
            }
        })
    }

    /// The stored consent decision, if any.
    pub fn consent(&self) -> Option<Consent> {
        self.inner
            .consent
            .get(CONSENT_KEY)
            .as_deref()
            .and_then(Consent::parse)
    }

    /// Whether events are currently processed.
    pub fn has_consent(&self) -> bool {
        !self.inner.config.require_consent || self.consent() == Some(Consent::Accepted)
    }

    /// Stores an accepted decision and records `consent_granted`.
    pub fn accept_consent(&self) -> Result<(), ReportError> {
        self.inner
            .consent
            .set(CONSENT_KEY, Consent::Accepted.as_str());
        debug!("analytics consent accepted");
        self.record(
            "consent_granted",
            crate::params! {
                "consent_type" => "analytics",
                "event_category" => "privacy",
            },
        )
    }

    /// Stores a declined decision.
    pub fn decline_consent(&self) {
        self.inner
            .consent
            .set(CONSENT_KEY, Consent::Declined.as_str());
        debug!("analytics consent declined");
    }

    fn send(
        &self,
        reporter: &dyn Reporter,
        name: &str,
        parameters: &EventParams,
    ) -> Result<(), ReportError> {
        let enriched = enrich(
            parameters,
            self.inner.session_start,
            self.inner.environment.as_ref(),
        );
        debug!(event = name, params = ?enriched, "analytics event");
        reporter.report(name, &enriched)
    }
}

/// Builder for [`Dispatcher`].
pub struct DispatcherBuilder {
    config: DispatcherConfig,
    environment: Arc<dyn Environment>,
    consent: Arc<dyn ConsentStore>,
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self {
            config: DispatcherConfig::default(),
            environment: Arc::new(StaticEnvironment::default()),
            consent: Arc::new(MemoryConsentStore::new()),
        }
    }
}

impl DispatcherBuilder {
    /// Set the configuration.
    pub fn config(self, config: DispatcherConfig) -> Self {
        Self { config, ..self }
    }

    /// Set the environment readers used for enrichment.
    pub fn environment(self, environment: impl Environment + 'static) -> Self {
        Self {
            environment: Arc::new(environment),
            ..self
        }
    }

    /// Set the consent storage.
    pub fn consent_store(self, store: Arc<dyn ConsentStore>) -> Self {
        Self {
            consent: store,
            ..self
        }
    }

    /// Build the Dispatcher. The session starts now.
    pub fn build(self) -> Dispatcher {
        Dispatcher {
            inner: Arc::new(Inner {
                config: self.config,
                session_start: Instant::now(),
                environment: self.environment,
                consent: self.consent,
                state: Mutex::new(State {
                    reporter: None,
                    queue: VecDeque::new(),
                    flushing: false,
                }),
            }),
        }
    }
}
