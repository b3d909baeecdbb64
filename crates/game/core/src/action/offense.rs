//! Attacks and skills, split into validation and commit.
//!
//! ## Validation
//!
//! - actor alive and not stunned or frozen
//! - skill exists, cooldown elapsed on the owner's clock
//! - resource sufficient
//! - target named when required, alive, and within range
//!
//! ## Commit
//!
//! Spends the resource, starts the cooldown, applies self effects, and
//! yields the [`Strike`] to resolve against the target.

use super::kind::ActionKind;
use crate::aura::AuraSpec;
use crate::combat::{DamageCategory, resolve_heal};
use crate::config::CombatConfig;
use crate::error::Rejection;
use crate::lifecycle::{Strike, apply_heal};
use crate::state::{ActionSlot, Combatant, EntityId, SkillEffect};
use crate::status::{StatusSpec, TimerAction};

/// A validated attack or skill, not yet committed.
#[derive(Clone, Debug, PartialEq)]
pub struct OffensePlan {
    pub slot: ActionSlot,
    pub cost: u32,
    /// Cooldown in seconds, after cooldown reduction.
    pub cooldown: f32,
    pub range: f32,
    pub target: Option<EntityId>,
    pub raw_physical: f64,
    pub raw_magic: f64,
    pub category: DamageCategory,
    pub effects: Vec<SkillEffect>,
}

/// Result of committing a plan on the actor.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Committed {
    /// Strike to resolve against the target, if the plan has one.
    pub strike: Option<Strike>,
    /// Auras to register, anchored to the actor.
    pub auras: Vec<AuraSpec>,
    /// Health restored on the actor by self heals.
    pub healed: u32,
}

/// Validates actor-side preconditions of an attack or skill.
pub fn plan_offense(
    actor: &Combatant,
    action: &ActionKind,
    config: &CombatConfig,
) -> Result<OffensePlan, Rejection> {
    if !actor.is_alive() {
        return Err(Rejection::ActorDead { entity: actor.id });
    }
    if !actor.can_act() {
        return Err(Rejection::Incapacitated { entity: actor.id });
    }

    let stats = actor.effective();
    let plan = match action {
        ActionKind::Attack { target } => OffensePlan {
            slot: ActionSlot::Basic,
            cost: 0,
            cooldown: config.basic_attack_cooldown(stats.attack_speed),
            range: config.basic_attack_range,
            target: Some(*target),
            raw_physical: stats.attack,
            raw_magic: 0.0,
            category: DamageCategory::Normal,
            effects: Vec::new(),
        },
        ActionKind::Skill { slot, target } => {
            let skill = actor
                .skills
                .get(*slot)
                .ok_or(Rejection::UnknownSkill { slot: *slot })?;
            if skill.requires_target() && target.is_none() {
                return Err(Rejection::MissingTarget);
            }
            let (raw_physical, raw_magic) = skill.raw_damage(&stats);
            OffensePlan {
                slot: ActionSlot::Skill(*slot),
                cost: skill.cost,
                cooldown: config.reduced_cooldown(skill.cooldown, stats.cooldown_reduction),
                range: skill.range,
                target: target.filter(|_| skill.requires_target()),
                raw_physical,
                raw_magic,
                category: skill.category,
                effects: skill.effects.clone(),
            }
        }
        _ => return Err(Rejection::NotOffensive),
    };

    let remaining = actor.cooldowns.remaining(plan.slot);
    if remaining > 0.0 {
        return Err(Rejection::OnCooldown {
            slot: plan.slot,
            remaining,
        });
    }

    let available = actor.resource.current();
    if plan.cost > available {
        return Err(Rejection::InsufficientResource {
            needed: plan.cost,
            available,
        });
    }

    Ok(plan)
}

/// Checks the target side of a plan against what the actor's owner can see.
///
/// `target_alive` is `None` when the target is owned elsewhere; its owner
/// re-checks liveness when the strike arrives. `distance` is `None` when
/// either entity is not positioned.
pub fn check_target(
    plan: &OffensePlan,
    target_alive: Option<bool>,
    distance: Option<f32>,
) -> Result<(), Rejection> {
    let Some(target) = plan.target else {
        return Ok(());
    };
    if target_alive == Some(false) {
        return Err(Rejection::TargetDead { target });
    }
    let distance = distance.unwrap_or(f32::INFINITY);
    if distance > plan.range {
        return Err(Rejection::OutOfRange {
            distance,
            range: plan.range,
        });
    }
    Ok(())
}

/// Commits a validated plan on the actor.
pub fn commit(actor: &mut Combatant, plan: OffensePlan) -> Committed {
    actor.resource.drain(plan.cost);
    actor.cooldowns.start(plan.slot, plan.cooldown);

    let mut committed = Committed::default();
    let mut on_hit: Vec<StatusSpec> = Vec::new();
    for effect in &plan.effects {
        match *effect {
            SkillEffect::ApplyStatus(spec) => on_hit.push(spec),
            SkillEffect::CastAura(spec) => committed.auras.push(spec),
            SkillEffect::Heal(amount) => {
                committed.healed += apply_heal(actor, resolve_heal(amount));
            }
            SkillEffect::Stealth { duration } => {
                actor.timers.schedule(TimerAction::EndStealth, duration);
            }
            SkillEffect::Dash { duration } => {
                actor.timers.schedule(TimerAction::EndDash, duration);
            }
        }
    }

    committed.strike = plan.target.map(|target| Strike {
        attacker: actor.attacker_profile(),
        target,
        raw_physical: plan.raw_physical,
        raw_magic: plan.raw_magic,
        category: plan.category,
        on_hit,
    });

    tracing::debug!(
        target: "combat::action",
        actor = %actor.id,
        slot = %plan.slot,
        cost = plan.cost,
        cooldown = plan.cooldown,
        "Offense committed"
    );
    committed
}
