#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use vitrine_analytics::{Dispatcher, EventParams, ReportError, Reporter, StaticEnvironment};

/// Reporter that keeps every event it receives.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<(String, EventParams)>>,
    fail_on: Option<String>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Rejects events named `name`.
    pub fn failing_on(name: &str) -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::default(),
            fail_on: Some(name.to_owned()),
        })
    }

    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn events(&self) -> Vec<(String, EventParams)> {
        self.events.lock().unwrap().clone()
    }

    pub fn last(&self) -> (String, EventParams) {
        self.events.lock().unwrap().last().cloned().unwrap()
    }
}

impl Reporter for RecordingReporter {
    fn report(&self, name: &str, params: &EventParams) -> Result<(), ReportError> {
        if self.fail_on.as_deref() == Some(name) {
            return Err(ReportError::backend(format!("rejected {name}")));
        }
        self.events
            .lock()
            .unwrap()
            .push((name.to_owned(), params.clone()));
        Ok(())
    }
}

pub fn dispatcher() -> Dispatcher {
    Dispatcher::builder()
        .environment(StaticEnvironment::new("Mozilla/5.0 (Test)", 1280, 720))
        .build()
}

/// A ready dispatcher and its reporter.
pub fn attached() -> (Dispatcher, Arc<RecordingReporter>) {
    let dispatcher = dispatcher();
    let reporter = RecordingReporter::new();
    dispatcher.attach(reporter.clone()).unwrap();
    (dispatcher, reporter)
}
