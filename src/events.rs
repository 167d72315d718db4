//! Structured fetch events and the observers that receive them.
//!
//! The fetcher and resolver never log directly. They report [`FetchEvent`]s
//! to an injected [`FetchObserver`]; [`TracingObserver`] forwards them to
//! `tracing`, and [`RecordingObserver`] keeps them in memory for inspection.

use crate::error::FetchError;
use crate::resolver::{CandidateError, RequestKind};
use std::sync::Mutex;
use tracing::{debug, info, warn, Level};

/// Something that happened while serving a logical request.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchEvent {
    /// A GET is about to be issued.
    RequestStarted { url: String },
    /// The full response body has been read.
    ResponseReceived {
        url: String,
        status: u16,
        body_len: usize,
    },
    /// The GET itself failed before a response body was available.
    RequestFailed { url: String, error: FetchError },
    /// The resolver is about to try a candidate.
    CandidateStarted {
        kind: RequestKind,
        attempt: usize,
        label: &'static str,
        url: String,
    },
    /// A candidate failed and the chain moves on.
    CandidateFailed {
        kind: RequestKind,
        attempt: usize,
        label: &'static str,
        error: CandidateError,
    },
    /// A candidate produced the returned document.
    CandidateSucceeded {
        kind: RequestKind,
        attempt: usize,
        label: &'static str,
        normalized: bool,
    },
    /// Every candidate failed.
    ChainExhausted { kind: RequestKind, attempts: usize },
}

impl FetchEvent {
    /// Severity of the event.
    pub fn level(&self) -> Level {
        match self {
            FetchEvent::RequestStarted { .. }
            | FetchEvent::ResponseReceived { .. }
            | FetchEvent::RequestFailed { .. }
            | FetchEvent::CandidateStarted { .. } => Level::DEBUG,
            FetchEvent::CandidateSucceeded { .. } => Level::INFO,
            FetchEvent::CandidateFailed { .. } | FetchEvent::ChainExhausted { .. } => Level::WARN,
        }
    }
}

/// Receiver of fetch events.
pub trait FetchObserver: Send + Sync {
    fn observe(&self, event: &FetchEvent);
}

/// Forwards events to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FetchObserver for TracingObserver {
    fn observe(&self, event: &FetchEvent) {
        match event {
            FetchEvent::RequestStarted { url } => debug!(%url, "Making request"),
            FetchEvent::ResponseReceived {
                url,
                status,
                body_len,
            } => debug!(%url, status, body_len, "Response received"),
            FetchEvent::RequestFailed { url, error } => {
                debug!(%url, class = error.class(), error = %error, "Request failed")
            }
            FetchEvent::CandidateStarted {
                kind,
                attempt,
                label,
                url,
            } => debug!(kind = %kind, attempt, label, %url, "Trying endpoint"),
            FetchEvent::CandidateFailed {
                kind,
                attempt,
                label,
                error,
            } => warn!(kind = %kind, attempt, label, error = %error, "Endpoint failed, falling back"),
            FetchEvent::CandidateSucceeded {
                kind,
                attempt,
                label,
                normalized,
            } => info!(kind = %kind, attempt, label, normalized, "Endpoint succeeded"),
            FetchEvent::ChainExhausted { kind, attempts } => {
                warn!(kind = %kind, attempts, "All endpoints failed")
            }
        }
    }
}

/// Keeps every event in memory.
///
/// Useful for tests and for callers that want to report the attempt history.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<FetchEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far.
    pub fn events(&self) -> Vec<FetchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events at exactly the given level.
    pub fn at_level(&self, level: Level) -> Vec<FetchEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() == level)
            .collect()
    }
}

impl FetchObserver for RecordingObserver {
    fn observe(&self, event: &FetchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_levels() {
        let started = FetchEvent::RequestStarted {
            url: "https://example.test".to_string(),
        };
        assert_eq!(started.level(), Level::DEBUG);

        let exhausted = FetchEvent::ChainExhausted {
            kind: RequestKind::Alerts,
            attempts: 2,
        };
        assert_eq!(exhausted.level(), Level::WARN);
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.observe(&FetchEvent::RequestStarted {
            url: "a".to_string(),
        });
        observer.observe(&FetchEvent::ChainExhausted {
            kind: RequestKind::Detours,
            attempts: 2,
        });

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], FetchEvent::RequestStarted { .. }));
        assert_eq!(observer.at_level(Level::WARN).len(), 1);
    }
}
