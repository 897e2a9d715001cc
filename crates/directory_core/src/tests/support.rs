//! In-memory registry used by the coordinator tests.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use shared::domain::{Client, ClientId, NewClient};
use tokio::sync::{broadcast, oneshot, Mutex};

use crate::{
    directory::Directory,
    events::DirectoryEvent,
    service::{ClientService, RouteService, ServiceResponse},
};

pub fn client(id: &str, name: &str) -> Client {
    client_at(id, name, 0.0, 0.0)
}

pub fn client_at(id: &str, name: &str, x: f64, y: f64) -> Client {
    Client {
        id: Some(ClientId::from(id)),
        name: name.to_string(),
        email: format!("{}@x.com", name.to_lowercase()),
        phone: "11999999999".to_string(),
        coordinate_x: x,
        coordinate_y: y,
    }
}

pub fn new_client(name: &str) -> NewClient {
    NewClient::new(name, format!("{}@x.com", name.to_lowercase()), "11999999999", 10.0, 20.0)
}

pub fn drain(rx: &mut broadcast::Receiver<DirectoryEvent>) -> Vec<DirectoryEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Holds the next call of an operation until released.
pub struct GateHandle {
    /// Fires once the call has reached the registry.
    pub entered: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

struct Gate {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
struct RegistryState {
    clients: Vec<Client>,
    next_id: u32,
    failing: HashSet<&'static str>,
    create_without_id: bool,
    calls: Vec<&'static str>,
    gates: HashMap<&'static str, VecDeque<Gate>>,
}

pub struct FakeRegistry {
    state: Mutex<RegistryState>,
}

impl FakeRegistry {
    pub fn new(clients: Vec<Client>) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(RegistryState {
                clients,
                ..RegistryState::default()
            }),
        })
    }

    pub fn directory(self: &Arc<Self>) -> Directory {
        Directory::new(self.clone(), self.clone())
    }

    pub async fn fail(&self, operation: &'static str) {
        self.state.lock().await.failing.insert(operation);
    }

    pub async fn recover(&self, operation: &'static str) {
        self.state.lock().await.failing.remove(operation);
    }

    pub async fn create_without_id(&self) {
        self.state.lock().await.create_without_id = true;
    }

    pub async fn gate(&self, operation: &'static str) -> GateHandle {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        self.state
            .lock()
            .await
            .gates
            .entry(operation)
            .or_default()
            .push_back(Gate {
                entered: entered_tx,
                release: release_rx,
            });
        GateHandle {
            entered: entered_rx,
            release: release_tx,
        }
    }

    pub async fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| **call == operation)
            .count()
    }

    /// Records the call, waits on a pending gate, and reports whether the
    /// operation is configured to fail.
    async fn enter(&self, operation: &'static str) -> bool {
        let (gate, failing) = {
            let mut state = self.state.lock().await;
            state.calls.push(operation);
            let gate = state
                .gates
                .get_mut(operation)
                .and_then(|queue| queue.pop_front());
            (gate, state.failing.contains(operation))
        };
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.await;
        }
        failing
    }
}

#[async_trait]
impl ClientService for FakeRegistry {
    async fn list(&self) -> ServiceResponse<Vec<Client>> {
        let snapshot = self.state.lock().await.clients.clone();
        if self.enter("list").await {
            return ServiceResponse::failed();
        }
        ServiceResponse::ok(snapshot)
    }

    async fn filter(&self, query: &str) -> ServiceResponse<Vec<Client>> {
        let needle = query.to_lowercase();
        let matched = self
            .state
            .lock()
            .await
            .clients
            .iter()
            .filter(|client| client.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        if self.enter("filter").await {
            return ServiceResponse::failed();
        }
        ServiceResponse::ok(matched)
    }

    async fn create(&self, record: &NewClient) -> ServiceResponse<Client> {
        if self.enter("create").await {
            return ServiceResponse::failed();
        }
        let mut state = self.state.lock().await;
        if state.create_without_id {
            return ServiceResponse::ok(Client {
                id: None,
                name: record.name.clone(),
                email: record.email.clone(),
                phone: record.phone.clone(),
                coordinate_x: record.coordinate_x,
                coordinate_y: record.coordinate_y,
            });
        }
        state.next_id += 1;
        let created = record
            .clone()
            .with_id(ClientId::new(format!("c{}", state.next_id)));
        state.clients.push(created.clone());
        ServiceResponse::ok(created)
    }

    async fn delete(&self, id: &ClientId) -> ServiceResponse<()> {
        if self.enter("delete").await {
            return ServiceResponse::failed();
        }
        self.state
            .lock()
            .await
            .clients
            .retain(|client| !client.has_id(id));
        ServiceResponse::done()
    }
}

#[async_trait]
impl RouteService for FakeRegistry {
    /// Orders stops west to east, then south to north.
    async fn ordered_route(&self, clients: &[Client]) -> ServiceResponse<Vec<Client>> {
        if self.enter("route").await {
            return ServiceResponse::failed();
        }
        let mut ordered = clients.to_vec();
        ordered.sort_by(|a, b| {
            a.coordinate_x
                .total_cmp(&b.coordinate_x)
                .then(a.coordinate_y.total_cmp(&b.coordinate_y))
        });
        ServiceResponse::ok(ordered)
    }
}
