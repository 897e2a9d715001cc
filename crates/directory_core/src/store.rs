//! In-memory directory state: the authoritative `all` collection and the
//! `visible` projection shown to the operator.
//!
//! Nothing here performs I/O. Every transition is synchronous, so callers
//! holding the store observe either the state before or after a transition.

use shared::domain::{Client, ClientId};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("client record has no id; only persisted records can be stored")]
    MissingId,
}

/// A confirmed change to `all` made after a remote create or delete.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Inserted(Client),
    Removed(ClientId),
}

#[derive(Debug, Clone, PartialEq)]
struct JournalEntry {
    revision: u64,
    mutation: Mutation,
}

#[derive(Debug, Default, Clone)]
pub struct DirectoryStore {
    all: Vec<Client>,
    visible: Vec<Client>,
    revision: u64,
    journal: Vec<JournalEntry>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[Client] {
        &self.all
    }

    pub fn visible(&self) -> &[Client] {
        &self.visible
    }

    pub fn get(&self, id: &ClientId) -> Option<&Client> {
        self.all.iter().find(|client| client.has_id(id))
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Incremented on every change to `all`.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Sets both collections to `records`. Repeated ids keep their first
    /// occurrence.
    pub fn replace_all(&mut self, records: Vec<Client>) {
        let records = dedupe(records);
        self.visible = records.clone();
        self.all = records;
        self.revision += 1;
    }

    /// Replaces `all` while keeping the current projection: visible records
    /// that survived are refreshed from `records`, vanished ones are dropped.
    pub fn refresh_all(&mut self, records: Vec<Client>) {
        self.all = dedupe(records);
        let all = &self.all;
        self.visible = self
            .visible
            .iter()
            .filter_map(|shown| match &shown.id {
                Some(id) => all.iter().find(|client| client.has_id(id)).cloned(),
                None => Some(shown.clone()),
            })
            .collect();
        self.revision += 1;
    }

    /// Replaces only the projection; `all` is untouched.
    pub fn set_visible(&mut self, records: Vec<Client>) {
        self.visible = records;
    }

    /// Shows the whole authoritative collection again.
    pub fn show_all(&mut self) {
        self.visible = self.all.clone();
    }

    /// Appends a persisted record to both collections.
    ///
    /// Passing a record without an id is a caller bug: it trips a debug
    /// assertion and is refused in release builds. Use [`Self::try_insert`]
    /// when the record comes from an untrusted source.
    pub fn insert(&mut self, record: Client) {
        debug_assert!(record.id.is_some(), "inserted client records must carry an id");
        if let Err(err) = self.try_insert(record) {
            error!(%err, "store: refused insert");
        }
    }

    pub fn try_insert(&mut self, record: Client) -> Result<(), StoreError> {
        let id = record.id.clone().ok_or(StoreError::MissingId)?;
        upsert(&mut self.all, &id, record.clone());
        upsert(&mut self.visible, &id, record.clone());
        self.record(Mutation::Inserted(record));
        Ok(())
    }

    /// Removes the record with `id` from both collections. Absent ids are a
    /// no-op and leave the revision unchanged. Returns whether anything was
    /// removed.
    pub fn remove(&mut self, id: &ClientId) -> bool {
        let before = (self.all.len(), self.visible.len());
        self.all.retain(|client| !client.has_id(id));
        self.visible.retain(|client| !client.has_id(id));
        if before == (self.all.len(), self.visible.len()) {
            return false;
        }
        self.record(Mutation::Removed(id.clone()));
        true
    }

    /// Replays confirmed mutations newer than `since` over a list fetched at
    /// revision `since`, so a late list cannot undo them.
    pub fn reconcile(&self, since: u64, mut records: Vec<Client>) -> Vec<Client> {
        for entry in self.entries_after(since) {
            match &entry.mutation {
                Mutation::Inserted(client) => {
                    if let Some(id) = &client.id {
                        if !records.iter().any(|existing| existing.has_id(id)) {
                            records.push(client.clone());
                        }
                    }
                }
                Mutation::Removed(id) => records.retain(|existing| !existing.has_id(id)),
            }
        }
        records
    }

    /// Drops records deleted after revision `since` from a filtered result.
    /// Inserts are not replayed: whether they match the filter is the
    /// server's call.
    pub fn without_removed_since(&self, since: u64, mut records: Vec<Client>) -> Vec<Client> {
        for entry in self.entries_after(since) {
            if let Mutation::Removed(id) = &entry.mutation {
                records.retain(|existing| !existing.has_id(id));
            }
        }
        records
    }

    /// Forgets journal entries no outstanding fetch can still need.
    /// `oldest_pending` is the lowest revision any in-flight fetch was
    /// dispatched at.
    pub fn prune_journal(&mut self, oldest_pending: Option<u64>) {
        match oldest_pending {
            Some(revision) => self.journal.retain(|entry| entry.revision > revision),
            None => self.journal.clear(),
        }
    }

    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    fn record(&mut self, mutation: Mutation) {
        self.revision += 1;
        self.journal.push(JournalEntry {
            revision: self.revision,
            mutation,
        });
    }

    fn entries_after(&self, since: u64) -> impl Iterator<Item = &JournalEntry> {
        self.journal.iter().filter(move |entry| entry.revision > since)
    }
}

fn upsert(records: &mut Vec<Client>, id: &ClientId, record: Client) {
    match records.iter_mut().find(|client| client.has_id(id)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

fn dedupe(records: Vec<Client>) -> Vec<Client> {
    let mut unique: Vec<Client> = Vec::with_capacity(records.len());
    for record in records {
        let duplicate = record
            .id
            .as_ref()
            .is_some_and(|id| unique.iter().any(|kept| kept.has_id(id)));
        if !duplicate {
            unique.push(record);
        }
    }
    unique
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
