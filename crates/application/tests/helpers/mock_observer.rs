#![allow(dead_code)]

use linkrelay_application::ports::QueryObserver;
use linkrelay_domain::CanonicalQuery;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Accepted(CanonicalQuery),
    Ignored(CanonicalQuery),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ObservedEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn accepted(&self) -> Vec<CanonicalQuery> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Accepted(q) => Some(q),
                ObservedEvent::Ignored(_) => None,
            })
            .collect()
    }

    pub fn ignored(&self) -> Vec<CanonicalQuery> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ObservedEvent::Ignored(q) => Some(q),
                ObservedEvent::Accepted(_) => None,
            })
            .collect()
    }
}

impl QueryObserver for RecordingObserver {
    fn query_accepted(&self, query: &CanonicalQuery) {
        self.events
            .lock()
            .unwrap()
            .push(ObservedEvent::Accepted(query.clone()));
    }

    fn query_ignored(&self, query: &CanonicalQuery) {
        self.events
            .lock()
            .unwrap()
            .push(ObservedEvent::Ignored(query.clone()));
    }
}
