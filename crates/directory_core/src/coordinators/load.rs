use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Outcome;
use crate::{
    context::DirectoryHandle,
    events::{DirectoryEvent, Notice, LIST_FAILED},
    sequence::{OperationKind, Resolution},
    service::ClientService,
};

/// Loads the full client list into both collections.
#[derive(Clone)]
pub struct LoadCoordinator {
    ctx: DirectoryHandle,
    service: Arc<dyn ClientService>,
}

impl LoadCoordinator {
    pub fn new(ctx: DirectoryHandle, service: Arc<dyn ClientService>) -> Self {
        Self { ctx, service }
    }

    /// Fetches every client. An applied load resets the filter unless a
    /// filter submitted after this load started still owns the view; a
    /// failed load changes nothing.
    pub async fn load(&self) -> Outcome {
        let (ticket, filter_seq) = {
            let mut state = self.ctx.lock().await;
            let filter_seq = state.sequencer.latest(OperationKind::Filter);
            (state.begin(OperationKind::List), filter_seq)
        };

        let reply = self.service.list().await;

        let mut state = self.ctx.lock().await;
        if !state.sequencer.is_latest(&ticket) {
            state.finish(&ticket, Resolution::Discarded);
            debug!(seq = ticket.seq, "directory: discarding superseded list response");
            return Outcome::Discarded;
        }

        let Some(records) = reply.into_option() else {
            state.finish(&ticket, Resolution::Failed);
            drop(state);
            warn!("directory: client list failed");
            self.ctx.notify(Notice::error(LIST_FAILED));
            return Outcome::Failed;
        };

        let replayed = state.store.revision() != ticket.revision;
        let records = state.store.reconcile(ticket.revision, records);
        let newer_filter = state.sequencer.latest(OperationKind::Filter) > filter_seq;
        if state.shown_filter.is_some_and(|seq| seq > filter_seq) {
            // A newer filter result is on screen; keep it over the new list.
            state.store.refresh_all(records);
        } else {
            state.store.replace_all(records);
            state.shown_filter = None;
            if !newer_filter {
                state.sequencer.supersede(OperationKind::Filter);
                state.filter_text.clear();
            }
        }
        state.finish(&ticket, Resolution::Succeeded);
        let revision = state.store.revision();
        let count = state.store.len();
        drop(state);

        info!(count, replayed, "directory: client list loaded");
        self.ctx.emit(DirectoryEvent::DirectoryChanged { revision });
        Outcome::Applied(())
    }
}
