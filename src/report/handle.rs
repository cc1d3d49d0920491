//! Per-test report handle

use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use super::types::{ReportEvent, Status, TestRecord};

#[derive(Debug, Default)]
struct HandleState {
    events: Vec<ReportEvent>,
    status: Option<Status>,
    finished_at: Option<DateTime<Utc>>,
}

/// Append-only event log of one test, bound to the thread that started it
#[derive(Debug)]
pub struct ReportHandle {
    id: String,
    name: String,
    thread: ThreadId,
    started_at: DateTime<Utc>,
    state: Mutex<HandleState>,
}

impl ReportHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            thread: thread::current().id(),
            started_at: Utc::now(),
            state: Mutex::new(HandleState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, HandleState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    /// Append an event; ignored once the handle is sealed
    pub fn record(&self, status: Status, message: impl Into<String>, screenshot: Option<String>) {
        let mut state = self.state();
        if state.finished_at.is_some() {
            return;
        }
        state.events.push(ReportEvent {
            status,
            message: message.into(),
            timestamp: Utc::now(),
            screenshot,
        });
    }

    /// Mark the overall test outcome; the last mark wins
    pub fn mark(&self, status: Status) {
        let mut state = self.state();
        if state.finished_at.is_none() {
            state.status = Some(status);
        }
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.state().events.clone()
    }

    pub fn status(&self) -> Option<Status> {
        self.state().status
    }

    /// Seal the handle; further events are dropped
    pub fn seal(&self) {
        let mut state = self.state();
        if state.finished_at.is_none() {
            state.finished_at = Some(Utc::now());
        }
    }

    pub fn is_sealed(&self) -> bool {
        self.state().finished_at.is_some()
    }

    /// Serializable snapshot
    pub fn record_snapshot(&self) -> TestRecord {
        let state = self.state();
        TestRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            thread: format!("{:?}", self.thread),
            started_at: self.started_at,
            finished_at: state.finished_at,
            status: state.status,
            events: state.events.clone(),
        }
    }
}
