use std::sync::Arc;

use shared::domain::{Client, ClientId, NewClient};
use tokio::sync::broadcast;

use crate::{
    context::{DirectoryContext, DirectoryHandle, DirectorySnapshot, RouteView},
    coordinators::{
        CreateCoordinator, DeleteCoordinator, FilterController, LoadCoordinator, Outcome,
        RouteCoordinator,
    },
    events::DirectoryEvent,
    http::HttpClientService,
    sequence::{CoordinatorState, OperationKind, Resolution},
    service::{ClientService, RouteService},
};

/// Everything a front-end needs: one shared state handle and the
/// coordinators wired to it.
#[derive(Clone)]
pub struct Directory {
    ctx: DirectoryHandle,
    loader: LoadCoordinator,
    filter: FilterController,
    creator: CreateCoordinator,
    deleter: DeleteCoordinator,
    router: RouteCoordinator,
}

impl Directory {
    pub fn new(clients: Arc<dyn ClientService>, routes: Arc<dyn RouteService>) -> Self {
        Self::with_context(Arc::new(DirectoryContext::new()), clients, routes)
    }

    pub fn with_context(
        ctx: DirectoryHandle,
        clients: Arc<dyn ClientService>,
        routes: Arc<dyn RouteService>,
    ) -> Self {
        Self {
            loader: LoadCoordinator::new(Arc::clone(&ctx), Arc::clone(&clients)),
            filter: FilterController::new(Arc::clone(&ctx), Arc::clone(&clients)),
            creator: CreateCoordinator::new(Arc::clone(&ctx), Arc::clone(&clients)),
            deleter: DeleteCoordinator::new(Arc::clone(&ctx), clients),
            router: RouteCoordinator::new(Arc::clone(&ctx), routes),
            ctx,
        }
    }

    /// Wires both the client endpoints and the route endpoint to one registry.
    pub fn over_http(service: HttpClientService) -> Self {
        let service = Arc::new(service);
        Self::new(service.clone(), service)
    }

    pub fn context(&self) -> &DirectoryHandle {
        &self.ctx
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.ctx.subscribe()
    }

    pub async fn snapshot(&self) -> DirectorySnapshot {
        self.ctx.snapshot().await
    }

    pub async fn route_view(&self) -> RouteView {
        self.ctx.route_view().await
    }

    pub async fn state(&self, kind: OperationKind) -> CoordinatorState {
        self.ctx.state(kind).await
    }

    pub async fn last_resolution(&self, kind: OperationKind) -> Option<Resolution> {
        self.ctx.last_resolution(kind).await
    }

    pub fn filter_controller(&self) -> &FilterController {
        &self.filter
    }

    pub async fn load(&self) -> Outcome {
        self.loader.load().await
    }

    pub async fn set_filter_text(&self, text: impl Into<String>) -> Outcome {
        self.filter.set_text(text).await
    }

    pub async fn submit_filter(&self) -> Outcome {
        self.filter.submit().await
    }

    pub async fn filter(&self, text: impl Into<String>) -> Outcome {
        self.filter.filter(text).await
    }

    pub async fn create(&self, record: NewClient) -> Outcome<Client> {
        self.creator.create(record).await
    }

    pub async fn delete(&self, id: ClientId) -> Outcome {
        self.deleter.delete(id).await
    }

    pub async fn request_route(&self) -> Outcome<Vec<Client>> {
        self.router.request().await
    }

    pub async fn refresh_route(&self) -> Outcome<Vec<Client>> {
        self.router.refresh().await
    }
}

#[cfg(test)]
#[path = "tests/directory_tests.rs"]
mod tests;
