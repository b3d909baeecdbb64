mod common;

use combat_core::{EntityId, PeerId, Rejection};
use combat_runtime::{DiagnosticEvent, Event, Session, Topic};
use common::*;

const GUEST: PeerId = PeerId(2);
const STRANGER: PeerId = PeerId(3);

#[tokio::test]
async fn non_owner_proposal_is_dropped_before_resolution() {
    init_logs();
    let mut session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(1, 30.0))
        .combatant(GUEST, fighter(2, 10.0))
        .build()
        .await
        .expect("session should build");
    let handle = session.handle();
    place(&handle, 1, 0.0);
    place(&handle, 2, 1.0);
    let mut diagnostics = handle.subscribe(Topic::Diagnostic);

    handle
        .propose(attack(STRANGER, 1, 2))
        .await
        .expect("proposal should route");
    session.step().await.expect("step should succeed");

    let events = drain(&mut diagnostics);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Diagnostic(DiagnosticEvent::ProposalRejected {
            reason: Rejection::NotAuthorized { peer: STRANGER, entity: EntityId(1) },
            ..
        })
    )));
    assert_eq!(health(&handle, 2).await, 100);

    session.shutdown().await.expect("shutdown should succeed");
}

#[tokio::test]
async fn controller_may_propose_for_an_owned_entity() {
    let mut session = Session::builder()
        .config(exact_config())
        .controlled(PeerId::HOST, GUEST, fighter(1, 30.0))
        .combatant(PeerId::HOST, fighter(2, 10.0))
        .build()
        .await
        .expect("session should build");
    let handle = session.handle();
    place(&handle, 1, 0.0);
    place(&handle, 2, 2.0);

    let owner = handle
        .propose(attack(GUEST, 1, 2))
        .await
        .expect("proposal should route");
    assert_eq!(owner, PeerId::HOST);

    session.step().await.expect("step should succeed");
    assert_eq!(health(&handle, 2).await, 70);

    session.shutdown().await.expect("shutdown should succeed");
}

#[tokio::test]
async fn failed_preconditions_become_diagnostics() {
    init_logs();
    let mut session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(1, 30.0))
        .combatant(PeerId::HOST, fighter(2, 10.0))
        .combatant(PeerId::HOST, fighter(3, 10.0))
        .build()
        .await
        .expect("session should build");
    let handle = session.handle();
    place(&handle, 1, 0.0);
    place(&handle, 2, 1.0);
    place(&handle, 3, 40.0);
    let mut diagnostics = handle.subscribe(Topic::Diagnostic);

    // Arrival order: the first attack starts the cooldown the second hits.
    handle.propose(attack(PeerId::HOST, 1, 2)).await.unwrap();
    handle.propose(attack(PeerId::HOST, 1, 2)).await.unwrap();
    session.step().await.unwrap();

    // Entity 4 is not positioned and not registered.
    session.run_for(10).await.unwrap();
    handle.propose(attack(PeerId::HOST, 1, 3)).await.unwrap();
    handle.propose(attack(PeerId::HOST, 1, 4)).await.unwrap();
    session.step().await.unwrap();

    let codes = rejection_codes(&drain(&mut diagnostics));
    assert_eq!(codes, vec!["on_cooldown", "out_of_range", "unknown_entity"]);
    assert_eq!(health(&handle, 2).await, 70);
    assert_eq!(health(&handle, 3).await, 100);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_entities_fail_at_the_router() {
    let session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(1, 30.0))
        .build()
        .await
        .unwrap();
    let handle = session.handle();

    let err = handle.propose(attack(PeerId::HOST, 9, 1)).await.unwrap_err();
    assert!(matches!(
        err,
        combat_runtime::RuntimeError::UnknownEntity { entity: EntityId(9) }
    ));

    let duplicate = handle
        .spawn(PeerId::HOST, None, fighter(1, 5.0))
        .await
        .unwrap_err();
    assert!(matches!(
        duplicate,
        combat_runtime::RuntimeError::DuplicateEntity { .. }
    ));

    session.shutdown().await.unwrap();
}
