use std::sync::Arc;

use shared::domain::ClientId;
use tracing::{info, warn};

use super::Outcome;
use crate::{
    context::DirectoryHandle,
    events::{Dialog, DirectoryEvent, Notice, DELETE_FAILED, DELETE_SUCCEEDED},
    sequence::{OperationKind, Resolution},
    service::ClientService,
};

/// Deletes one client. Callers must have collected an explicit confirmation
/// before calling; this type never asks.
#[derive(Clone)]
pub struct DeleteCoordinator {
    ctx: DirectoryHandle,
    service: Arc<dyn ClientService>,
}

impl DeleteCoordinator {
    pub fn new(ctx: DirectoryHandle, service: Arc<dyn ClientService>) -> Self {
        Self { ctx, service }
    }

    pub async fn delete(&self, id: ClientId) -> Outcome {
        let ticket = self.ctx.begin(OperationKind::Delete).await;
        let reply = self.service.delete(&id).await;

        let mut state = self.ctx.lock().await;
        if !reply.success {
            state.finish(&ticket, Resolution::Failed);
            drop(state);
            warn!(client_id = %id, "directory: delete failed");
            self.ctx.notify(Notice::error(DELETE_FAILED));
            return Outcome::Failed;
        }

        let removed = state.store.remove(&id);
        state.finish(&ticket, Resolution::Succeeded);
        let revision = state.store.revision();
        drop(state);

        info!(client_id = %id, removed, "directory: client deleted");
        self.ctx.emit(DirectoryEvent::DirectoryChanged { revision });
        self.ctx.emit(DirectoryEvent::DialogClosed(Dialog::Delete(id)));
        self.ctx.notify(Notice::success(DELETE_SUCCEEDED));
        Outcome::Applied(())
    }
}
