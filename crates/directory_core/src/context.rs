//! Shared handle injected into every coordinator.
//!
//! The directory state lives behind a single lock, and every transition is
//! applied while holding it without awaiting. Remote calls happen outside the
//! lock; their results are applied in one step afterwards.

use std::sync::Arc;

use shared::domain::Client;
use tokio::sync::{broadcast, Mutex, MutexGuard};

use crate::{
    events::{DirectoryEvent, Notice},
    sequence::{CoordinatorState, OperationKind, Resolution, Sequencer, Ticket},
    store::DirectoryStore,
};

const EVENT_BUFFER: usize = 256;

/// Ordered route last returned by the optimizer.
#[derive(Debug, Default, Clone)]
pub struct RouteView {
    pub clients: Vec<Client>,
    /// Store revision the route was requested at; `None` when there is no
    /// usable route.
    pub computed_at: Option<u64>,
}

#[derive(Debug, Default)]
pub struct DirectoryState {
    pub store: DirectoryStore,
    pub sequencer: Sequencer,
    pub route: RouteView,
    pub filter_text: String,
    /// Seq of the filter whose result `visible` currently holds.
    pub shown_filter: Option<u64>,
}

impl DirectoryState {
    pub fn begin(&mut self, kind: OperationKind) -> Ticket {
        self.sequencer.begin(kind, self.store.revision())
    }

    /// Records the resolution and drops journal entries nobody needs anymore.
    pub fn finish(&mut self, ticket: &Ticket, resolution: Resolution) {
        self.sequencer.finish(ticket, resolution);
        let oldest = self.sequencer.oldest_in_flight_revision();
        self.store.prune_journal(oldest);
    }
}

/// Point-in-time copy of the directory for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySnapshot {
    pub all: Vec<Client>,
    pub visible: Vec<Client>,
    pub revision: u64,
    pub filter_text: String,
}

pub struct DirectoryContext {
    state: Mutex<DirectoryState>,
    events: broadcast::Sender<DirectoryEvent>,
}

pub type DirectoryHandle = Arc<DirectoryContext>;

impl DirectoryContext {
    pub fn new() -> Self {
        Self::with_store(DirectoryStore::new())
    }

    pub fn with_store(store: DirectoryStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            state: Mutex::new(DirectoryState {
                store,
                ..DirectoryState::default()
            }),
            events,
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, DirectoryState> {
        self.state.lock().await
    }

    pub async fn begin(&self, kind: OperationKind) -> Ticket {
        self.lock().await.begin(kind)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }

    pub fn emit(&self, event: DirectoryEvent) {
        // No subscriber is a normal state for headless callers.
        let _ = self.events.send(event);
    }

    pub fn notify(&self, notice: Notice) {
        self.emit(DirectoryEvent::Notification(notice));
    }

    pub async fn snapshot(&self) -> DirectorySnapshot {
        let state = self.lock().await;
        DirectorySnapshot {
            all: state.store.all().to_vec(),
            visible: state.store.visible().to_vec(),
            revision: state.store.revision(),
            filter_text: state.filter_text.clone(),
        }
    }

    pub async fn route_view(&self) -> RouteView {
        self.lock().await.route.clone()
    }

    pub async fn state(&self, kind: OperationKind) -> CoordinatorState {
        self.lock().await.sequencer.state(kind)
    }

    pub async fn last_resolution(&self, kind: OperationKind) -> Option<Resolution> {
        self.lock().await.sequencer.last_resolution(kind)
    }
}

impl Default for DirectoryContext {
    fn default() -> Self {
        Self::new()
    }
}
