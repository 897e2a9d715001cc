use super::*;

#[test]
fn newest_ticket_is_the_only_current_one() {
    let mut sequencer = Sequencer::new();
    let first = sequencer.begin(OperationKind::Filter, 0);
    let second = sequencer.begin(OperationKind::Filter, 0);

    assert!(!sequencer.is_latest(&first));
    assert!(sequencer.is_latest(&second));
}

#[test]
fn lanes_do_not_supersede_each_other() {
    let mut sequencer = Sequencer::new();
    let list = sequencer.begin(OperationKind::List, 3);
    let _filter = sequencer.begin(OperationKind::Filter, 3);

    assert!(sequencer.is_latest(&list));
    assert_eq!(list.revision, 3);
}

#[test]
fn supersede_invalidates_in_flight_tickets() {
    let mut sequencer = Sequencer::new();
    let ticket = sequencer.begin(OperationKind::Filter, 0);

    sequencer.supersede(OperationKind::Filter);

    assert!(!sequencer.is_latest(&ticket));
    assert_eq!(sequencer.state(OperationKind::Filter), CoordinatorState::Pending);
}

#[test]
fn state_is_pending_until_every_request_resolves() {
    let mut sequencer = Sequencer::new();
    assert_eq!(sequencer.state(OperationKind::Create), CoordinatorState::Idle);
    assert_eq!(sequencer.last_resolution(OperationKind::Create), None);

    let first = sequencer.begin(OperationKind::Create, 0);
    let second = sequencer.begin(OperationKind::Create, 0);
    sequencer.finish(&first, Resolution::Failed);
    assert!(sequencer.state(OperationKind::Create).is_pending());

    sequencer.finish(&second, Resolution::Succeeded);
    assert_eq!(sequencer.state(OperationKind::Create), CoordinatorState::Idle);
    assert_eq!(
        sequencer.last_resolution(OperationKind::Create),
        Some(Resolution::Succeeded)
    );
}

#[test]
fn oldest_in_flight_revision_spans_all_lanes() {
    let mut sequencer = Sequencer::new();
    assert_eq!(sequencer.oldest_in_flight_revision(), None);

    let list = sequencer.begin(OperationKind::List, 2);
    let _route = sequencer.begin(OperationKind::Route, 5);
    assert_eq!(sequencer.oldest_in_flight_revision(), Some(2));

    sequencer.finish(&list, Resolution::Succeeded);
    assert_eq!(sequencer.oldest_in_flight_revision(), Some(5));
}
