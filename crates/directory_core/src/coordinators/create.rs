use std::sync::Arc;

use shared::domain::{Client, NewClient};
use tracing::{info, warn};

use super::Outcome;
use crate::{
    context::DirectoryHandle,
    events::{Dialog, DirectoryEvent, Notice, CREATE_FAILED, CREATE_SUCCEEDED},
    sequence::{OperationKind, Resolution},
    service::ClientService,
};

#[derive(Clone)]
pub struct CreateCoordinator {
    ctx: DirectoryHandle,
    service: Arc<dyn ClientService>,
}

impl CreateCoordinator {
    pub fn new(ctx: DirectoryHandle, service: Arc<dyn ClientService>) -> Self {
        Self { ctx, service }
    }

    /// Persists `record` remotely and, once the registry confirms it with an
    /// id, adds it to the directory and closes the creation dialog. On any
    /// failure the directory is untouched and the dialog stays open.
    pub async fn create(&self, record: NewClient) -> Outcome<Client> {
        let ticket = self.ctx.begin(OperationKind::Create).await;
        let reply = self.service.create(&record).await;

        let created = reply.into_option().filter(|client| client.id.is_some());

        let mut state = self.ctx.lock().await;
        let Some(client) = created else {
            state.finish(&ticket, Resolution::Failed);
            drop(state);
            warn!(name = %record.name, "directory: create failed or returned no id");
            self.ctx.notify(Notice::error(CREATE_FAILED));
            return Outcome::Failed;
        };

        state.store.insert(client.clone());
        state.finish(&ticket, Resolution::Succeeded);
        let revision = state.store.revision();
        drop(state);

        info!(client_id = ?client.id, "directory: client created");
        self.ctx.emit(DirectoryEvent::DirectoryChanged { revision });
        self.ctx.emit(DirectoryEvent::DialogClosed(Dialog::Create));
        self.ctx.notify(Notice::success(CREATE_SUCCEEDED));
        Outcome::Applied(client)
    }
}
