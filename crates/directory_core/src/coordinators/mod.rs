//! One coordinator per user-triggered operation: dispatch the remote call,
//! await it, then either apply the resulting state transition or surface the
//! failure.

mod create;
mod delete;
mod filter;
mod load;
mod route;

pub use create::CreateCoordinator;
pub use delete::DeleteCoordinator;
pub use filter::FilterController;
pub use load::LoadCoordinator;
pub use route::RouteCoordinator;

/// How a coordinator call ended from the caller's point of view.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T = ()> {
    /// The remote call succeeded and its transition was applied.
    Applied(T),
    /// The remote call failed; state is unchanged.
    Failed,
    /// A newer request of the same kind made this response irrelevant.
    Discarded,
    /// No remote call was needed.
    Skipped(T),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    pub fn value(self) -> Option<T> {
        match self {
            Self::Applied(value) | Self::Skipped(value) => Some(value),
            Self::Failed | Self::Discarded => None,
        }
    }
}
