//! Contract between the directory and the remote registry.
//!
//! Every remote operation resolves to a [`ServiceResponse`]: a success flag and,
//! for operations that return data, the decoded payload. Transport errors,
//! rejected statuses and malformed bodies all arrive as `success == false`;
//! nothing upstream of the adapter distinguishes them.

use async_trait::async_trait;
use shared::domain::{Client, ClientId, NewClient};

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse<T> {
    pub success: bool,
    pub response: Option<T>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(response: T) -> Self {
        Self {
            success: true,
            response: Some(response),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            response: None,
        }
    }

    /// Payload of a successful call; `None` for failures and for successes
    /// that carried no payload.
    pub fn into_option(self) -> Option<T> {
        if self.success {
            self.response
        } else {
            None
        }
    }
}

impl ServiceResponse<()> {
    pub fn done() -> Self {
        Self::ok(())
    }
}

#[async_trait]
pub trait ClientService: Send + Sync {
    async fn list(&self) -> ServiceResponse<Vec<Client>>;
    async fn filter(&self, query: &str) -> ServiceResponse<Vec<Client>>;
    async fn create(&self, record: &NewClient) -> ServiceResponse<Client>;
    async fn delete(&self, id: &ClientId) -> ServiceResponse<()>;
}

/// External route optimizer. It receives the current authoritative client set
/// and answers with the same clients in visiting order; how that order is
/// computed is entirely its business.
#[async_trait]
pub trait RouteService: Send + Sync {
    async fn ordered_route(&self, clients: &[Client]) -> ServiceResponse<Vec<Client>>;
}
