//! Client directory core: keeps the authoritative client collection and its
//! displayed projection coherent across remote list, filter, create, delete
//! and route operations.

pub mod context;
pub mod coordinators;
pub mod directory;
pub mod events;
pub mod http;
pub mod sequence;
pub mod service;
pub mod store;

pub use context::{DirectoryContext, DirectoryHandle, DirectorySnapshot, RouteView};
pub use coordinators::{
    CreateCoordinator, DeleteCoordinator, FilterController, LoadCoordinator, Outcome,
    RouteCoordinator,
};
pub use directory::Directory;
pub use events::{Dialog, DirectoryEvent, Notice, NoticeLevel};
pub use http::{HttpClientService, RequestError};
pub use sequence::{CoordinatorState, OperationKind, Resolution};
pub use service::{ClientService, RouteService, ServiceResponse};
pub use store::{DirectoryStore, StoreError};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
