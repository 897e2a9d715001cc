use super::*;
use crate::test_support::client;

fn seeded(records: Vec<Client>) -> DirectoryStore {
    let mut store = DirectoryStore::new();
    store.replace_all(records);
    store
}

#[test]
fn removing_an_absent_id_changes_nothing() {
    let mut store = seeded(vec![client("a", "Ana"), client("b", "Beto")]);
    let revision = store.revision();

    assert!(!store.remove(&ClientId::from("zzz")));

    assert_eq!(store.all(), &[client("a", "Ana"), client("b", "Beto")]);
    assert_eq!(store.visible(), store.all());
    assert_eq!(store.revision(), revision);
    assert_eq!(store.journal_len(), 0);
}

#[test]
fn insert_then_remove_restores_both_collections() {
    let mut store = seeded(vec![client("a", "Ana")]);
    store.set_visible(vec![client("a", "Ana")]);
    let (all, visible) = (store.all().to_vec(), store.visible().to_vec());

    let record = client("c1", "Carla");
    store.insert(record.clone());
    assert_eq!(store.get(&ClientId::from("c1")), Some(&record));
    assert!(store.visible().contains(&record));

    assert!(store.remove(&ClientId::from("c1")));
    assert_eq!(store.all(), all.as_slice());
    assert_eq!(store.visible(), visible.as_slice());
}

#[test]
fn replace_all_discards_prior_state_and_duplicates() {
    let mut store = seeded(vec![client("old", "Velho")]);
    store.replace_all(vec![
        client("a", "Ana"),
        client("b", "Beto"),
        client("a", "Ana Duplicada"),
    ]);

    assert_eq!(store.all(), &[client("a", "Ana"), client("b", "Beto")]);
    assert_eq!(store.visible(), store.all());
    assert!(store.get(&ClientId::from("old")).is_none());
}

#[test]
fn set_visible_leaves_the_authoritative_collection_alone() {
    let mut store = seeded(vec![client("a", "Ana"), client("b", "Beto")]);
    let revision = store.revision();

    store.set_visible(vec![client("b", "Beto")]);

    assert_eq!(store.visible(), &[client("b", "Beto")]);
    assert_eq!(store.len(), 2);
    assert_eq!(store.revision(), revision);

    store.show_all();
    assert_eq!(store.visible(), store.all());
}

#[test]
fn try_insert_rejects_records_without_id() {
    let mut store = DirectoryStore::new();
    let mut unsaved = client("x", "Xavier");
    unsaved.id = None;

    assert_eq!(store.try_insert(unsaved), Err(StoreError::MissingId));
    assert!(store.is_empty());
    assert_eq!(store.revision(), 0);
}

#[test]
fn inserting_a_known_id_updates_in_place() {
    let mut store = seeded(vec![client("a", "Ana"), client("b", "Beto")]);
    let mut renamed = client("a", "Ana");
    renamed.phone = "1133334444".into();

    store.insert(renamed.clone());

    assert_eq!(store.len(), 2);
    assert_eq!(store.all()[0], renamed);
    assert_eq!(store.visible()[0], renamed);
}

#[test]
fn refresh_all_keeps_the_projection_but_drops_vanished_records() {
    let mut store = seeded(vec![client("a", "Ana"), client("b", "Beto"), client("c", "Caio")]);
    store.set_visible(vec![client("a", "Ana"), client("c", "Caio")]);

    let mut updated = client("a", "Ana");
    updated.email = "ana@novo.com".into();
    store.refresh_all(vec![updated.clone(), client("b", "Beto")]);

    assert_eq!(store.len(), 2);
    assert_eq!(store.visible(), &[updated]);
}

#[test]
fn reconcile_replays_mutations_after_the_fetch_revision() {
    let mut store = seeded(vec![client("a", "Ana"), client("b", "Beto")]);
    let fetched_at = store.revision();

    store.insert(client("c1", "Carla"));
    store.remove(&ClientId::from("a"));

    let stale = vec![client("a", "Ana"), client("b", "Beto")];
    let reconciled = store.reconcile(fetched_at, stale);

    assert_eq!(reconciled, vec![client("b", "Beto"), client("c1", "Carla")]);
}

#[test]
fn reconcile_ignores_mutations_the_fetch_already_saw() {
    let mut store = DirectoryStore::new();
    store.insert(client("c1", "Carla"));
    let fetched_at = store.revision();

    let reconciled = store.reconcile(fetched_at, vec![client("b", "Beto")]);
    assert_eq!(reconciled, vec![client("b", "Beto")]);
}

#[test]
fn filtered_results_lose_records_deleted_after_dispatch() {
    let mut store = seeded(vec![client("a", "Ana"), client("m", "Mariana")]);
    let fetched_at = store.revision();
    store.remove(&ClientId::from("m"));
    store.insert(client("c1", "Ananias"));

    let result = store.without_removed_since(
        fetched_at,
        vec![client("a", "Ana"), client("m", "Mariana")],
    );
    assert_eq!(result, vec![client("a", "Ana")]);
}

#[test]
fn prune_keeps_only_entries_newer_than_the_oldest_pending_fetch() {
    let mut store = DirectoryStore::new();
    store.insert(client("a", "Ana"));
    let pending_at = store.revision();
    store.insert(client("b", "Beto"));
    store.insert(client("c", "Caio"));

    store.prune_journal(Some(pending_at));
    assert_eq!(store.journal_len(), 2);

    store.prune_journal(None);
    assert_eq!(store.journal_len(), 0);
}
