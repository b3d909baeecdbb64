use arrayvec::ArrayVec;

use crate::config::CombatConfig;

/// Action executed when a timer runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TimerAction {
    /// Stealth window closes.
    EndStealth,
    /// Dash window closes.
    EndDash,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timer {
    pub remaining: f32,
    pub on_expire: TimerAction,
}

/// Pending timers of a combatant, at most one per action.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerList {
    timers: ArrayVec<Timer, { CombatConfig::MAX_TIMERS }>,
}

impl TimerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` after `seconds`. Re-scheduling a pending action
    /// restarts it.
    pub fn schedule(&mut self, action: TimerAction, seconds: f32) {
        if let Some(timer) = self.timers.iter_mut().find(|t| t.on_expire == action) {
            timer.remaining = seconds;
            return;
        }
        if self
            .timers
            .try_push(Timer {
                remaining: seconds,
                on_expire: action,
            })
            .is_err()
        {
            tracing::debug!(target: "combat::status", %action, "Timer list full, timer dropped");
        }
    }

    /// Advances every timer and returns the actions that ran out, in
    /// scheduling order.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerAction> {
        let mut fired = Vec::new();
        self.timers.retain(|timer| {
            timer.remaining -= dt;
            if timer.remaining <= 1e-4 {
                fired.push(timer.on_expire);
                false
            } else {
                true
            }
        });
        fired
    }

    pub fn cancel(&mut self, action: TimerAction) -> bool {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.on_expire != action);
        before != self.timers.len()
    }

    pub fn is_pending(&self, action: TimerAction) -> bool {
        self.timers.iter().any(|timer| timer.on_expire == action)
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
