//! Request bookkeeping shared by all coordinators.
//!
//! Each operation kind runs on its own lane. A lane hands out monotonically
//! increasing tickets, remembers which ones are still in flight and records
//! how the last one resolved. A response is current only while its ticket is
//! the newest one issued on its lane.

use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OperationKind {
    List,
    Filter,
    Create,
    Delete,
    Route,
}

impl OperationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Filter => "filter",
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Route => "route",
        }
    }
}

/// Observable coordinator phase. Terminal results are applied in the same
/// step that leaves `Pending`, so observers go straight back to `Idle` and
/// read the result from [`Sequencer::last_resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatorState {
    #[default]
    Idle,
    Pending,
}

impl CoordinatorState {
    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Succeeded,
    Failed,
    /// Superseded by a newer request of the same kind before it resolved.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: OperationKind,
    pub seq: u64,
    /// Store revision at dispatch time.
    pub revision: u64,
}

#[derive(Debug, Default)]
struct Lane {
    latest: u64,
    in_flight: BTreeMap<u64, u64>,
    last: Option<Resolution>,
}

#[derive(Debug, Default)]
pub struct Sequencer {
    lanes: HashMap<OperationKind, Lane>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, kind: OperationKind, revision: u64) -> Ticket {
        let lane = self.lanes.entry(kind).or_default();
        lane.latest += 1;
        lane.in_flight.insert(lane.latest, revision);
        Ticket {
            kind,
            seq: lane.latest,
            revision,
        }
    }

    /// Invalidates every in-flight ticket of `kind` without starting a
    /// request, e.g. when the filter is cleared locally.
    pub fn supersede(&mut self, kind: OperationKind) {
        self.lanes.entry(kind).or_default().latest += 1;
    }

    /// Newest seq issued or superseded on `kind`; 0 before any request.
    pub fn latest(&self, kind: OperationKind) -> u64 {
        self.lanes.get(&kind).map_or(0, |lane| lane.latest)
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.lanes
            .get(&ticket.kind)
            .is_some_and(|lane| lane.latest == ticket.seq)
    }

    pub fn finish(&mut self, ticket: &Ticket, resolution: Resolution) {
        let lane = self.lanes.entry(ticket.kind).or_default();
        lane.in_flight.remove(&ticket.seq);
        lane.last = Some(resolution);
    }

    pub fn state(&self, kind: OperationKind) -> CoordinatorState {
        match self.lanes.get(&kind) {
            Some(lane) if !lane.in_flight.is_empty() => CoordinatorState::Pending,
            _ => CoordinatorState::Idle,
        }
    }

    pub fn last_resolution(&self, kind: OperationKind) -> Option<Resolution> {
        self.lanes.get(&kind).and_then(|lane| lane.last)
    }

    /// Lowest dispatch revision across every in-flight ticket.
    pub fn oldest_in_flight_revision(&self) -> Option<u64> {
        self.lanes
            .values()
            .flat_map(|lane| lane.in_flight.values().copied())
            .min()
    }
}

#[cfg(test)]
#[path = "tests/sequence_tests.rs"]
mod tests;
