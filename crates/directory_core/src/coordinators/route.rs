use std::sync::Arc;

use shared::domain::Client;
use tracing::{debug, info, warn};

use super::Outcome;
use crate::{
    context::DirectoryHandle,
    events::{DirectoryEvent, Notice, ROUTE_FAILED},
    sequence::{OperationKind, Resolution},
    service::RouteService,
};

/// Asks the external optimizer for a visiting order and keeps it as a
/// read-only view next to, not inside, the directory projection.
#[derive(Clone)]
pub struct RouteCoordinator {
    ctx: DirectoryHandle,
    service: Arc<dyn RouteService>,
}

impl RouteCoordinator {
    pub fn new(ctx: DirectoryHandle, service: Arc<dyn RouteService>) -> Self {
        Self { ctx, service }
    }

    /// Returns the cached route when the directory has not changed since it
    /// was computed, and asks the optimizer otherwise.
    pub async fn request(&self) -> Outcome<Vec<Client>> {
        {
            let state = self.ctx.lock().await;
            if state.route.computed_at == Some(state.store.revision()) {
                debug!(revision = state.store.revision(), "directory: reusing cached route");
                return Outcome::Skipped(state.route.clients.clone());
            }
        }
        self.refresh().await
    }

    /// Always asks the optimizer.
    pub async fn refresh(&self) -> Outcome<Vec<Client>> {
        let (ticket, clients) = {
            let mut state = self.ctx.lock().await;
            let clients = state.store.all().to_vec();
            (state.begin(OperationKind::Route), clients)
        };

        let reply = self.service.ordered_route(&clients).await;

        let mut state = self.ctx.lock().await;
        if !state.sequencer.is_latest(&ticket) {
            state.finish(&ticket, Resolution::Discarded);
            debug!(seq = ticket.seq, "directory: discarding superseded route response");
            return Outcome::Discarded;
        }

        let Some(ordered) = reply.into_option() else {
            state.route.clients.clear();
            state.route.computed_at = None;
            state.finish(&ticket, Resolution::Failed);
            drop(state);
            warn!("directory: route request failed");
            self.ctx.emit(DirectoryEvent::RouteUpdated { len: 0 });
            self.ctx.notify(Notice::error(ROUTE_FAILED));
            return Outcome::Failed;
        };

        state.route.clients = ordered.clone();
        state.route.computed_at = Some(ticket.revision);
        state.finish(&ticket, Resolution::Succeeded);
        drop(state);

        info!(stops = ordered.len(), "directory: route updated");
        self.ctx.emit(DirectoryEvent::RouteUpdated { len: ordered.len() });
        Outcome::Applied(ordered)
    }
}
