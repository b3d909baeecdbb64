//! Hit and critical chance calculations.

use crate::config::CombatConfig;
use crate::env::RollSource;

/// Calculate the final hit chance.
///
/// # Formula
///
/// ```text
/// hit_chance = hit_rate × (1 − blind) − evasion
/// clamped to [hit_floor, hit_ceiling]
/// ```
///
/// # Arguments
///
/// * `hit_rate` - Attacker's effective hit rate (auras included)
/// * `blind` - Attacker's blind fraction
/// * `evasion` - Defender's effective evasion rate
///
/// # Returns
///
/// Hit chance as percentage
pub fn hit_chance(hit_rate: f64, blind: f64, evasion: f64, config: &CombatConfig) -> f64 {
    let chance = hit_rate * (1.0 - blind.clamp(0.0, 1.0)) - evasion;
    let (floor, ceiling) = config.hit_bounds();
    chance.max(floor).min(ceiling)
}

/// Calculate the final critical chance.
///
/// # Formula
///
/// ```text
/// crit_chance = crit_rate × (1 − blind), clamped to [0, 100]
/// ```
pub fn crit_chance(crit_rate: f64, blind: f64) -> f64 {
    (crit_rate * (1.0 - blind.clamp(0.0, 1.0))).clamp(0.0, 100.0)
}

/// Draws once and returns `true` when the draw falls below `chance`.
pub fn roll_below(chance: f64, rolls: &mut impl RollSource) -> bool {
    rolls.roll_percent() < chance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRolls, ScriptedRolls};

    #[test]
    fn hit_chance_is_clamped_at_both_ends() {
        let config = CombatConfig::new();
        assert_eq!(hit_chance(95.0, 0.0, 0.0, &config), 95.0);
        assert_eq!(hit_chance(300.0, 0.0, 0.0, &config), 95.0);
        assert_eq!(hit_chance(10.0, 0.0, 80.0, &config), 5.0);
        assert_eq!(hit_chance(90.0, 1.0, 0.0, &config), 5.0);
    }

    #[test]
    fn inverted_config_bounds_do_not_panic() {
        let mut config = CombatConfig::new();
        config.hit_floor = 95.0;
        config.hit_ceiling = 5.0;
        assert_eq!(hit_chance(50.0, 0.0, 0.0, &config), 50.0);
        assert_eq!(hit_chance(300.0, 0.0, 0.0, &config), 95.0);
    }

    #[test]
    fn blind_scales_hit_rate_before_evasion() {
        let config = CombatConfig::new();
        assert_eq!(hit_chance(80.0, 0.5, 10.0, &config), 30.0);
    }

    #[test]
    fn hit_chance_stays_in_bounds_for_any_input() {
        let config = CombatConfig::new();
        let mut rolls = PcgRolls::new(3);
        for _ in 0..500 {
            let hit = rolls.roll_percent() * 3.0 - 50.0;
            let evasion = rolls.roll_percent() * 2.0 - 50.0;
            let blind = rolls.roll_percent() / 50.0 - 0.5;
            let chance = hit_chance(hit, blind, evasion, &config);
            assert!((5.0..=95.0).contains(&chance));
        }
    }

    #[test]
    fn crit_chance_applies_blind() {
        assert_eq!(crit_chance(40.0, 0.25), 30.0);
        assert_eq!(crit_chance(-5.0, 0.0), 0.0);
    }

    #[test]
    fn roll_below_is_strict() {
        let mut rolls = ScriptedRolls::new(vec![94.9, 95.0]);
        assert!(roll_below(95.0, &mut rolls));
        assert!(!roll_below(95.0, &mut rolls));
    }
}
