use super::{Death, apply_damage};
use crate::combat::{DamageEvent, DamageReport, resolve};
use crate::config::CombatConfig;
use crate::env::RollSource;
use crate::state::Combatant;
use crate::status::TimerAction;

/// Everything produced by advancing one combatant by one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub reports: Vec<DamageReport>,
    pub death: Option<Death>,
    pub expired_timers: Vec<TimerAction>,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty() && self.death.is_none() && self.expired_timers.is_empty()
    }
}

/// Advances statuses, timers and cooldowns of `combatant` by `dt` seconds.
///
/// Periodic damage resolves as environmental damage (no attacker), but the
/// status source is credited if it kills. Dead combatants do not advance.
pub fn advance(
    combatant: &mut Combatant,
    dt: f32,
    config: &CombatConfig,
    rolls: &mut impl RollSource,
) -> TickReport {
    let mut report = TickReport::default();
    if !combatant.is_alive() {
        return report;
    }

    for tick in combatant.statuses.advance(dt) {
        let event = DamageEvent::environmental(combatant.id, tick.amount, tick.category);
        let outcome = resolve(&event, &combatant.defender_profile(), config, rolls);
        let applied = apply_damage(combatant, outcome.amount, tick.source);
        report.reports.push(outcome.report(combatant.id));
        if applied.death.is_some() {
            report.death = applied.death;
            return report;
        }
    }

    report.expired_timers = combatant.timers.advance(dt);
    for action in &report.expired_timers {
        tracing::trace!(target: "combat::status", entity = %combatant.id, %action, "Timer expired");
    }
    combatant.cooldowns.advance(dt);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StackingRules;
    use crate::env::ScriptedRolls;
    use crate::state::{ActionSlot, EntityId, Role};
    use crate::stats::BaseStats;
    use crate::status::{StatusKind, StatusSpec};

    fn victim(health: f64) -> Combatant {
        Combatant::new(
            EntityId(5),
            Role::Ai,
            BaseStats {
                max_health: health,
                ..BaseStats::default()
            },
        )
        .with_bounty(40)
    }

    fn run(combatant: &mut Combatant, steps: usize) -> Vec<TickReport> {
        let config = CombatConfig::new();
        let mut rolls = ScriptedRolls::constant(0.0);
        (0..steps)
            .map(|_| advance(combatant, config.tick_seconds, &config, &mut rolls))
            .collect()
    }

    #[test]
    fn poison_ticks_once_per_second() {
        let mut combatant = victim(100.0);
        combatant.statuses.apply(
            StatusSpec::periodic(StatusKind::Poison, 6.0, 3.0, 1.0),
            Some(EntityId(1)),
            &StackingRules::default(),
        );

        let reports: Vec<_> = run(&mut combatant, 35)
            .into_iter()
            .flat_map(|tick| tick.reports)
            .collect();

        assert_eq!(reports.len(), 3);
        assert!(reports.iter().all(|r| r.amount == 6 && !r.critical));
        assert_eq!(combatant.health.current(), 82);
    }

    #[test]
    fn lethal_periodic_damage_credits_the_source() {
        let mut combatant = victim(10.0);
        combatant.statuses.apply(
            StatusSpec::periodic(StatusKind::Burn, 25.0, 5.0, 0.5),
            Some(EntityId(9)),
            &StackingRules::default(),
        );

        let deaths: Vec<Death> = run(&mut combatant, 20)
            .into_iter()
            .filter_map(|tick| tick.death)
            .collect();

        assert_eq!(
            deaths,
            vec![Death {
                victim: EntityId(5),
                killer: Some(EntityId(9)),
                bounty: 40
            }]
        );
    }

    #[test]
    fn timers_and_cooldowns_advance_together() {
        let mut combatant = victim(100.0);
        combatant.timers.schedule(TimerAction::EndDash, 0.2);
        combatant.cooldowns.start(ActionSlot::Basic, 0.2);

        let ticks = run(&mut combatant, 2);

        assert!(ticks[0].expired_timers.is_empty());
        assert_eq!(ticks[1].expired_timers, vec![TimerAction::EndDash]);
        assert!(combatant.cooldowns.is_ready(ActionSlot::Basic));
        assert!(!combatant.is_dashing());
    }
}
