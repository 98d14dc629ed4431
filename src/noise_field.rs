//! Deterministic multi-octave gradient noise.
//!
//! Values are renormalized to an integer grayscale in [0, 255] so callers can
//! band them (biomes) or turn them into percentages (tile lottery).

use noise::{NoiseFn, Perlin};

/// Base sampling frequency for per-tile terrain noise
pub const TERRAIN_FREQUENCY: f64 = 1.0 / 24.0;
/// Sampling frequency for per-chunk biome noise
pub const BIOME_FREQUENCY: f64 = 0.29;

/// Seeded gradient noise field over the plane
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
    frequency: f64,
}

impl NoiseField {
    /// Create a field from a 64-bit seed and a base frequency
    pub fn new(seed: u64, frequency: f64) -> Self {
        // Fold the high half in so seeds differing only above bit 32 differ
        let folded = (seed ^ (seed >> 32)) as u32;
        Self {
            perlin: Perlin::new(folded),
            frequency,
        }
    }

    /// Sample `octaves` octaves at (x, y), as grayscale in [0, 255].
    ///
    /// Each octave doubles the frequency and halves the amplitude.
    pub fn sample(&self, x: i64, y: i64, octaves: u32) -> u8 {
        let x = x as f64 * self.frequency;
        let y = y as f64 * self.frequency;
        to_grayscale(fbm(&self.perlin, x, y, octaves.max(1)))
    }

    /// Sample as a percentage in [0, 100]
    pub fn sample_percent(&self, x: i64, y: i64, octaves: u32) -> u32 {
        percent(self.sample(x, y, octaves))
    }
}

/// Fractional Brownian motion, normalized back into [-1, 1]
fn fbm(noise: &Perlin, x: f64, y: f64, octaves: u32) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    total / max_value
}

fn to_grayscale(value: f64) -> u8 {
    ((value + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Convert grayscale to a percentage in [0, 100]
pub fn percent(gray: u8) -> u32 {
    (gray as u32 * 100 + 127) / 255
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_determinism() {
        let a = NoiseField::new(42, TERRAIN_FREQUENCY);
        let b = NoiseField::new(42, TERRAIN_FREQUENCY);
        for (x, y) in [(0, 0), (13, -7), (-400, 1200), (79, 23)] {
            assert_eq!(a.sample(x, y, 6), b.sample(x, y, 6));
        }
    }

    #[test]
    fn test_noise_varies_over_space() {
        let field = NoiseField::new(42, TERRAIN_FREQUENCY);
        let mut values = std::collections::HashSet::new();
        for x in 0..80 {
            values.insert(field.sample(x, 11, 6));
        }
        assert!(values.len() > 5, "noise should not be flat: {:?}", values);
    }

    #[test]
    fn test_seed_changes_field() {
        let a = NoiseField::new(1, TERRAIN_FREQUENCY);
        let b = NoiseField::new(2, TERRAIN_FREQUENCY);
        let differs = (0..64).any(|x| a.sample(x, 3, 4) != b.sample(x, 3, 4));
        assert!(differs);
    }

    #[test]
    fn test_percent_range() {
        assert_eq!(percent(0), 0);
        assert_eq!(percent(255), 100);
        assert_eq!(percent(128), 50);
    }
}
