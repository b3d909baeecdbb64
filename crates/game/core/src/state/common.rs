use std::fmt;

/// Unique identifier for any combatant tracked by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a networked peer (host or client).
///
/// A peer may own entities (state authority) and/or control them
/// (input authority).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerId(pub u16);

impl PeerId {
    /// Conventional identifier for the hosting peer.
    pub const HOST: Self = Self(0);
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Fixed simulation step counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the following tick.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Planar world position in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn within(&self, other: &Position, radius: f32) -> bool {
        self.distance(other) <= radius
    }
}

/// Integer resource meter (health, mana) with `current <= maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: u32,
    maximum: u32,
}

impl ResourceMeter {
    /// Creates a meter, clamping `current` into `[0, maximum]`.
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self::new(maximum, maximum)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn maximum(&self) -> u32 {
        self.maximum
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }

    pub fn missing(&self) -> u32 {
        self.maximum - self.current
    }

    /// Adds up to `amount`, returning what was actually restored.
    pub fn restore(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.missing());
        self.current += applied;
        applied
    }

    /// Removes up to `amount`, returning what was actually drained.
    pub fn drain(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    /// Overwrites the current value, clamped to the maximum.
    pub fn set_current(&mut self, value: u32) {
        self.current = value.min(self.maximum);
    }

    /// Changes the maximum and re-clamps the current value.
    ///
    /// Returns `true` when the current value had to be lowered.
    pub fn set_maximum(&mut self, maximum: u32) -> bool {
        self.maximum = maximum;
        if self.current > maximum {
            self.current = maximum;
            true
        } else {
            false
        }
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meter_never_exceeds_maximum() {
        let mut meter = ResourceMeter::new(150, 100);
        assert_eq!(meter.current(), 100);

        meter.drain(30);
        assert_eq!(meter.restore(50), 30);
        assert_eq!(meter.current(), 100);

        assert!(meter.set_maximum(60));
        assert_eq!(meter.current(), 60);
        assert!(!meter.set_maximum(200));
        assert_eq!(meter.current(), 60);
    }

    #[test]
    fn drain_saturates_at_zero() {
        let mut meter = ResourceMeter::full(10);
        assert_eq!(meter.drain(25), 10);
        assert!(meter.is_empty());
    }
}
