//! Actions that mutate only the acting entity.

use super::kind::ActionKind;
use crate::config::CombatConfig;
use crate::error::Rejection;
use crate::lifecycle::{apply_heal, respawn};
use crate::state::Combatant;

/// What a direct action changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectOutcome {
    Healed(u32),
    StatsChanged,
    ResourceChanged,
    /// Currency left the wallet.
    Spent(u64),
    Respawned,
    /// Accepted but nothing changed (e.g. duplicate respawn).
    Unchanged,
}

/// Applies a non-offensive action to its actor.
pub fn apply_direct(
    actor: &mut Combatant,
    action: ActionKind,
    config: &CombatConfig,
) -> Result<DirectOutcome, Rejection> {
    let outcome = match action {
        ActionKind::Heal { amount } => {
            if !actor.is_alive() {
                return Err(Rejection::ActorDead { entity: actor.id });
            }
            DirectOutcome::Healed(apply_heal(actor, amount))
        }
        ActionKind::Equip { slot, bundle } => {
            actor.equip(slot, bundle);
            DirectOutcome::StatsChanged
        }
        ActionKind::Unequip { slot } => match actor.unequip(slot) {
            Some(_) => DirectOutcome::StatsChanged,
            None => DirectOutcome::Unchanged,
        },
        ActionKind::ApplyRune { id, bundle } => {
            actor.apply_rune(id, bundle);
            DirectOutcome::StatsChanged
        }
        ActionKind::RemoveRune { id } => match actor.remove_rune(id) {
            Some(_) => DirectOutcome::StatsChanged,
            None => DirectOutcome::Unchanged,
        },
        ActionKind::SpendResource { amount } => {
            let available = actor.resource.current();
            if amount > available {
                return Err(Rejection::InsufficientResource {
                    needed: amount,
                    available,
                });
            }
            actor.resource.drain(amount);
            DirectOutcome::ResourceChanged
        }
        ActionKind::SpendCurrency { amount } => {
            actor.wallet.spend(amount)?;
            DirectOutcome::Spent(amount)
        }
        ActionKind::SyncResource { value } => {
            check_sync(actor, value, config)?;
            actor.resource.set_current(value);
            DirectOutcome::ResourceChanged
        }
        ActionKind::Respawn => {
            if respawn(actor) {
                DirectOutcome::Respawned
            } else {
                DirectOutcome::Unchanged
            }
        }
        ActionKind::Attack { .. } | ActionKind::Skill { .. } => {
            return Err(Rejection::NotOffensive);
        }
    };
    Ok(outcome)
}

/// A synced value must lie in `[0, max]` and within `sync_tolerance × max`
/// of the canonical value.
fn check_sync(actor: &Combatant, value: u32, config: &CombatConfig) -> Result<(), Rejection> {
    let canonical = actor.resource.current();
    let maximum = actor.resource.maximum();
    let tolerance = config.sync_tolerance.max(0.0) * f64::from(maximum);
    let drift = f64::from(value.abs_diff(canonical));

    if value > maximum || drift > tolerance {
        return Err(Rejection::ImplausibleSync {
            value,
            canonical,
            maximum,
        });
    }
    Ok(())
}
