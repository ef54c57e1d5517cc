//! Injectable randomness for particle generation.

use std::f32::consts::TAU;

use rand::Rng;
use rand::rngs::StdRng;

/// Source of uniform random numbers.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform value in `[lo, hi)`.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_unit() * (hi - lo)
    }

    /// Uniform angle in `[0, 2π)`.
    fn angle(&mut self) -> f32 {
        self.next_unit() * TAU
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f32 {
        self.gen_range(0.0..1.0)
    }
}

/// Replays a fixed sequence of values, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Values are clamped into `[0, 1)`.
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        let below_one = 1.0 - f32::EPSILON;
        Self {
            values: values
                .into_iter()
                .map(|v| v.clamp(0.0, below_one))
                .collect(),
            cursor: 0,
        }
    }

    /// A source that always yields `value`.
    pub fn constant(value: f32) -> Self {
        Self::new([value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_scripted_cycles() {
        let mut rng = ScriptedRandom::new([0.1, 0.5]);
        assert_eq!(rng.next_unit(), 0.1);
        assert_eq!(rng.next_unit(), 0.5);
        assert_eq!(rng.next_unit(), 0.1);
    }

    #[test]
    fn test_scripted_clamps_and_handles_empty() {
        let mut rng = ScriptedRandom::new([2.0, -1.0]);
        assert!(rng.next_unit() < 1.0);
        assert_eq!(rng.next_unit(), 0.0);

        let mut empty = ScriptedRandom::new(Vec::new());
        assert_eq!(empty.next_unit(), 0.0);
    }

    #[test]
    fn test_range_and_angle() {
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(rng.range(2.0, 4.0), 3.0);
        assert!((rng.angle() - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_std_rng_stays_in_unit_interval() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let value = rng.next_unit();
            assert!((0.0..1.0).contains(&value));
        }
    }
}
