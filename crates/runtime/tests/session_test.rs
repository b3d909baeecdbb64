mod common;

use combat_core::{
    ActionKind, AuraKind, AuraSpec, DamageCategory, EntityId, EquipSlot, PeerId, SkillEffect,
    SkillSpec, StatBundle, StatKind, StatusKind, StatusSpec, Wallet,
};
use combat_runtime::protocol::decode_frame;
use combat_runtime::{
    DeltaSink, Event, Frame, FrameSink, LifecycleEvent, ObserverView, Proposal, Session, Topic,
};
use common::*;
use tokio::sync::mpsc;

#[tokio::test]
async fn poison_ticks_on_the_owner_clock_until_it_expires() {
    init_logs();
    let venom = SkillSpec::new("venom", DamageCategory::Poison)
        .with_range(5.0)
        .with_effect(SkillEffect::ApplyStatus(StatusSpec::periodic(
            StatusKind::Poison,
            5.0,
            2.0,
            0.5,
        )));
    let mut session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(1, 10.0).with_skill(venom))
        .combatant(PeerId(2), fighter(2, 10.0))
        .build()
        .await
        .unwrap();
    let handle = session.handle();
    place(&handle, 1, 0.0);
    place(&handle, 2, 4.0);

    let cast = ActionKind::Skill {
        slot: 0,
        target: Some(EntityId(2)),
    };
    handle
        .propose(Proposal::new(PeerId::HOST, EntityId(1), cast))
        .await
        .unwrap();
    session.step().await.unwrap();
    assert_eq!(health(&handle, 2).await, 100);

    session.run_for(25).await.unwrap();
    let victim = handle.query(EntityId(2)).await.unwrap();
    assert_eq!(victim.health.current(), 80);
    assert!(!victim.statuses.has(StatusKind::Poison));

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn protection_aura_covers_allies_of_another_owner() {
    let ward = SkillSpec::new("ward", DamageCategory::Normal)
        .with_cooldown(10.0)
        .with_effect(SkillEffect::CastAura(AuraSpec {
            kind: AuraKind::DamageReduction,
            magnitude: 0.5,
            radius: 5.0,
            duration: 5.0,
        }));
    let mut session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(3, 10.0).with_skill(ward))
        .combatant(PeerId(2), fighter(1, 30.0))
        .combatant(PeerId::HOST, fighter(2, 10.0))
        .build()
        .await
        .unwrap();
    let handle = session.handle();
    place(&handle, 1, 0.0);
    place(&handle, 2, 1.0);
    place(&handle, 3, 3.0);
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    let cast = ActionKind::Skill { slot: 0, target: None };
    handle
        .propose(Proposal::new(PeerId::HOST, EntityId(3), cast))
        .await
        .unwrap();
    session.step().await.unwrap();
    assert_eq!(handle.aura_count(), 1);

    handle.propose(attack(PeerId(2), 1, 2)).await.unwrap();
    session.step().await.unwrap();
    assert_eq!(health(&handle, 2).await, 85);

    session.run_for(50).await.unwrap();
    assert_eq!(handle.aura_count(), 0);
    let expired = drain(&mut lifecycle)
        .into_iter()
        .filter(|event| matches!(event, Event::Lifecycle(LifecycleEvent::AuraExpired { .. })))
        .count();
    assert_eq!(expired, 1);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn respawn_is_idempotent() {
    let mut session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(1, 500.0))
        .combatant(PeerId::HOST, fighter(2, 10.0))
        .build()
        .await
        .unwrap();
    let handle = session.handle();
    place(&handle, 1, 0.0);
    place(&handle, 2, 1.0);
    let mut lifecycle = handle.subscribe(Topic::Lifecycle);

    handle.propose(attack(PeerId::HOST, 1, 2)).await.unwrap();
    session.step().await.unwrap();
    assert_eq!(health(&handle, 2).await, 0);

    let respawn = Proposal::new(PeerId::HOST, EntityId(2), ActionKind::Respawn);
    handle.propose(respawn.clone()).await.unwrap();
    handle.propose(respawn).await.unwrap();
    session.step().await.unwrap();

    let events = drain(&mut lifecycle);
    let respawns = events
        .iter()
        .filter(|event| matches!(event, Event::Lifecycle(LifecycleEvent::Respawned { .. })))
        .count();
    assert_eq!(deaths(&events), 1);
    assert_eq!(respawns, 1);
    assert_eq!(health(&handle, 2).await, 100);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn equipment_and_resource_sync_go_through_the_owner() {
    init_logs();
    let mut session = Session::builder()
        .config(exact_config())
        .controlled(PeerId::HOST, PeerId(2), fighter(1, 10.0))
        .build()
        .await
        .unwrap();
    let handle = session.handle();
    let mut diagnostics = handle.subscribe(Topic::Diagnostic);
    let propose = |action| Proposal::new(PeerId(2), EntityId(1), action);

    let ring = StatBundle::named("ring of vigor").with(StatKind::MaxHealth, 50.0);
    handle
        .propose(propose(ActionKind::Equip {
            slot: EquipSlot::Accessory,
            bundle: ring,
        }))
        .await
        .unwrap();
    handle
        .propose(propose(ActionKind::SyncResource { value: 45 }))
        .await
        .unwrap();
    handle
        .propose(propose(ActionKind::SyncResource { value: 5 }))
        .await
        .unwrap();
    session.step().await.unwrap();

    let combatant = handle.query(EntityId(1)).await.unwrap();
    assert_eq!(combatant.health.maximum(), 150);
    assert_eq!(combatant.resource.current(), 45);
    assert_eq!(rejection_codes(&drain(&mut diagnostics)), vec!["implausible_sync"]);

    handle
        .propose(propose(ActionKind::Unequip {
            slot: EquipSlot::Accessory,
        }))
        .await
        .unwrap();
    session.step().await.unwrap();

    let combatant = handle.query(EntityId(1)).await.unwrap();
    assert_eq!(combatant.health.maximum(), 100);
    assert_eq!(combatant.health.current(), 100);
    assert_eq!(combatant.effective().max_health, 100.0);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn currency_overdraft_is_rejected_by_the_owner() {
    let mut session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(1, 10.0).with_wallet(Wallet::new(30)))
        .build()
        .await
        .unwrap();
    let handle = session.handle();
    let mut diagnostics = handle.subscribe(Topic::Diagnostic);
    let spend = |amount| {
        Proposal::new(
            PeerId::HOST,
            EntityId(1),
            ActionKind::SpendCurrency { amount },
        )
    };

    handle.propose(spend(20)).await.unwrap();
    handle.propose(spend(20)).await.unwrap();
    session.step().await.unwrap();

    assert_eq!(rejection_codes(&drain(&mut diagnostics)), vec!["insufficient_funds"]);
    let combatant = handle.query(EntityId(1)).await.unwrap();
    assert_eq!(combatant.wallet.balance(), 10);

    session.shutdown().await.unwrap();
}

#[tokio::test]
async fn observers_follow_authoritative_deltas() {
    let mut session = Session::builder()
        .config(exact_config())
        .combatant(PeerId::HOST, fighter(1, 30.0))
        .combatant(PeerId(2), fighter(2, 10.0))
        .build()
        .await
        .unwrap();
    let handle = session.handle();
    place(&handle, 1, 0.0);
    place(&handle, 2, 1.0);
    let mut deltas = handle.subscribe(Topic::Delta);
    let mut view = ObserverView::new(PeerId(2));

    session.step().await.unwrap();
    for event in drain(&mut deltas) {
        if let Event::Delta(delta) = event {
            view.deliver(delta).await.unwrap();
        }
    }
    view.predict(EntityId(2), Some(40), None);
    assert!(view.view(EntityId(2)).unwrap().predicted);

    handle.propose(attack(PeerId::HOST, 1, 2)).await.unwrap();
    session.step().await.unwrap();
    let (tx, mut frames) = mpsc::channel(8);
    let mut wire = FrameSink::new(tx);
    for event in drain(&mut deltas) {
        if let Event::Delta(delta) = event {
            view.deliver(delta).await.unwrap();
            wire.deliver(delta).await.unwrap();
        }
    }

    let shown = view.view(EntityId(2)).unwrap();
    assert!(!shown.predicted);
    assert_eq!(shown.health, 70);

    let bytes = frames.try_recv().expect("one delta frame");
    let (frame, _) = decode_frame(&bytes).unwrap();
    assert!(matches!(frame, Frame::Delta(delta) if delta.entity == EntityId(2) && delta.health == 70));

    session.shutdown().await.unwrap();
}
