//! Roll sources for hit and critical checks.
//!
//! The pipeline never touches a global RNG: every draw goes through a
//! [`RollSource`] owned by the peer that runs the pipeline. Given the same
//! seed, [`PcgRolls`] produces the same sequence of draws, which keeps owner
//! decisions replayable from the proposal log.

/// Source of uniform percentage draws.
pub trait RollSource {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform draw in `[0, 100)`.
    fn roll_percent(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0) * 100.0
    }
}

impl<R: RollSource + ?Sized> RollSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }

    fn roll_percent(&mut self) -> f64 {
        (**self).roll_percent()
    }
}

/// PCG-XSH-RR stream: 64-bit state, 32-bit output.
///
/// Reference: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug)]
pub struct PcgRolls {
    state: u64,
}

impl PcgRolls {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RollSource for PcgRolls {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::step(self.state);
        Self::output(self.state)
    }
}

/// Replays a fixed list of percentage draws, cycling when exhausted.
///
/// Used by scenario tests and by tools that replay recorded owner decisions.
#[derive(Clone, Debug)]
pub struct ScriptedRolls {
    rolls: Vec<f64>,
    cursor: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: impl Into<Vec<f64>>) -> Self {
        Self {
            rolls: rolls.into(),
            cursor: 0,
        }
    }

    /// Every draw returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RollSource for ScriptedRolls {
    fn next_u32(&mut self) -> u32 {
        let percent = self.roll_percent();
        (percent / 100.0 * f64::from(u32::MAX)) as u32
    }

    fn roll_percent(&mut self) -> f64 {
        if self.rolls.is_empty() {
            return 0.0;
        }
        let value = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        value
    }
}

/// Derive an independent stream seed for a peer.
///
/// Mixes the session seed with the peer id and a stream index using
/// SplitMix64-style avalanche steps.
pub fn compute_seed(session_seed: u64, peer: u16, stream: u32) -> u64 {
    let mut hash = session_seed;
    hash ^= u64::from(peer).wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= u64::from(stream).wrapping_mul(0x517cc1b727220a95);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
