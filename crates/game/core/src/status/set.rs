use arrayvec::ArrayVec;

use super::effect::{PeriodicTick, StatusEffect, StatusKind, StatusSpec};
use crate::config::{CombatConfig, StackingPolicy, StackingRules};
use crate::state::EntityId;

/// Tolerance for interval boundaries reached through repeated float steps.
const TIME_EPSILON: f32 = 1e-4;

/// Result of applying a status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Added,
    Refreshed,
    Stacked(u8),
    /// A stronger effect of the same kind is already active.
    Ignored,
    /// No free slot.
    Full,
}

/// Active status effects on a combatant, at most one entry per kind.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSet {
    effects: ArrayVec<StatusEffect, { CombatConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `spec` following the stacking policy configured for its kind.
    pub fn apply(
        &mut self,
        spec: StatusSpec,
        source: Option<EntityId>,
        rules: &StackingRules,
    ) -> ApplyOutcome {
        let incoming = StatusEffect::from_spec(spec, source);

        let Some(existing) = self.effects.iter_mut().find(|e| e.kind == spec.kind) else {
            if self.effects.try_push(incoming).is_err() {
                tracing::debug!(
                    target: "combat::status",
                    kind = %spec.kind,
                    "Status set full, effect dropped"
                );
                return ApplyOutcome::Full;
            }
            return ApplyOutcome::Added;
        };

        match rules.policy(spec.kind) {
            StackingPolicy::Refresh => {
                *existing = StatusEffect {
                    elapsed: existing.elapsed,
                    ..incoming
                };
                ApplyOutcome::Refreshed
            }
            StackingPolicy::Stack { max } => {
                existing.stacks = existing.stacks.saturating_add(1).min(max.max(1));
                existing.magnitude = incoming.magnitude;
                existing.remaining = incoming.remaining;
                existing.source = incoming.source;
                ApplyOutcome::Stacked(existing.stacks)
            }
            StackingPolicy::KeepStrongest => {
                if incoming.magnitude > existing.magnitude {
                    *existing = incoming;
                    ApplyOutcome::Refreshed
                } else if incoming.magnitude == existing.magnitude {
                    existing.remaining = existing.remaining.max(incoming.remaining);
                    ApplyOutcome::Refreshed
                } else {
                    ApplyOutcome::Ignored
                }
            }
        }
    }

    /// Advances every effect by `dt` seconds.
    ///
    /// Periodic effects fire once per interval boundary crossed while they are
    /// still active; expired effects are removed afterwards.
    pub fn advance(&mut self, dt: f32) -> Vec<PeriodicTick> {
        let mut ticks = Vec::new();

        for effect in &mut self.effects {
            let active = dt.min(effect.remaining.max(0.0));
            if let (Some(interval), Some(category)) =
                (effect.interval, effect.kind.periodic_category())
            {
                effect.elapsed += active;
                while effect.elapsed + TIME_EPSILON >= interval {
                    effect.elapsed = (effect.elapsed - interval).max(0.0);
                    ticks.push(PeriodicTick {
                        kind: effect.kind,
                        category,
                        amount: effect.strength(),
                        source: effect.source,
                    });
                }
            }
            effect.remaining -= dt;
        }

        self.effects.retain(|effect| effect.remaining > TIME_EPSILON);
        ticks
    }

    /// Removes a single kind.
    pub fn cleanse(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_stunned(&self) -> bool {
        self.has(StatusKind::Stun)
    }

    pub fn is_frozen(&self) -> bool {
        self.has(StatusKind::Freeze)
    }

    pub fn is_incapacitated(&self) -> bool {
        self.effects.iter().any(|e| e.kind.is_incapacitating())
    }

    pub fn blind_fraction(&self) -> f64 {
        self.fraction(StatusKind::Blind)
    }

    pub fn weakness_fraction(&self) -> f64 {
        self.fraction(StatusKind::Weakness)
    }

    pub fn armor_break_fraction(&self) -> f64 {
        self.fraction(StatusKind::ArmorBreak)
    }

    pub fn slow_fraction(&self) -> f64 {
        self.fraction(StatusKind::Slow)
    }

    fn fraction(&self, kind: StatusKind) -> f64 {
        self.get(kind)
            .map(|effect| effect.strength().clamp(0.0, 1.0))
            .unwrap_or(0.0)
    }
}
