use std::sync::Arc;

use tracing::{debug, info, warn};

use super::Outcome;
use crate::{
    context::{DirectoryHandle, DirectoryState},
    events::{DirectoryEvent, Notice, FILTER_FAILED},
    sequence::{OperationKind, Resolution},
    service::ClientService,
};

/// Turns the operator's filter text into either a local pass-through (empty
/// text) or a remote filtered fetch.
#[derive(Clone)]
pub struct FilterController {
    ctx: DirectoryHandle,
    service: Arc<dyn ClientService>,
}

impl FilterController {
    pub fn new(ctx: DirectoryHandle, service: Arc<dyn ClientService>) -> Self {
        Self { ctx, service }
    }

    pub async fn text(&self) -> String {
        self.ctx.lock().await.filter_text.clone()
    }

    /// Records an edit of the filter text. Edits never reach the server, but
    /// an edit that empties the text restores the unfiltered view at once.
    pub async fn set_text(&self, text: impl Into<String>) -> Outcome {
        let text = text.into();
        let mut state = self.ctx.lock().await;
        let cleared = text.trim().is_empty();
        state.filter_text = text;
        if !cleared {
            return Outcome::Skipped(());
        }
        let revision = show_everything(&mut state);
        drop(state);
        self.ctx.emit(DirectoryEvent::DirectoryChanged { revision });
        Outcome::Skipped(())
    }

    /// Acts on the current text, as the search button does.
    pub async fn submit(&self) -> Outcome {
        let text = self.text().await;
        self.apply(&text).await
    }

    /// Sets the text and submits it in one go.
    pub async fn filter(&self, text: impl Into<String>) -> Outcome {
        let text = text.into();
        self.ctx.lock().await.filter_text = text.clone();
        self.apply(&text).await
    }

    async fn apply(&self, text: &str) -> Outcome {
        let query = text.trim();
        if query.is_empty() {
            let revision = show_everything(&mut *self.ctx.lock().await);
            self.ctx.emit(DirectoryEvent::DirectoryChanged { revision });
            return Outcome::Skipped(());
        }

        let ticket = self.ctx.begin(OperationKind::Filter).await;
        let reply = self.service.filter(query).await;

        let mut state = self.ctx.lock().await;
        if !state.sequencer.is_latest(&ticket) {
            state.finish(&ticket, Resolution::Discarded);
            debug!(query, seq = ticket.seq, "directory: discarding superseded filter response");
            return Outcome::Discarded;
        }

        let Some(records) = reply.into_option() else {
            state.finish(&ticket, Resolution::Failed);
            drop(state);
            warn!(query, "directory: filter failed; keeping current view");
            self.ctx.notify(Notice::error(FILTER_FAILED));
            return Outcome::Failed;
        };

        let records = state.store.without_removed_since(ticket.revision, records);
        let matched = records.len();
        state.store.set_visible(records);
        state.shown_filter = Some(ticket.seq);
        state.finish(&ticket, Resolution::Succeeded);
        let revision = state.store.revision();
        drop(state);

        info!(query, matched, "directory: filter applied");
        self.ctx.emit(DirectoryEvent::DirectoryChanged { revision });
        Outcome::Applied(())
    }
}

/// Local pass-through: `visible = all`, and any filter still in flight loses.
fn show_everything(state: &mut DirectoryState) -> u64 {
    state.sequencer.supersede(OperationKind::Filter);
    state.store.show_all();
    state.shown_filter = None;
    state.store.revision()
}
