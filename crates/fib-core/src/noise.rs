use ::noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Largest value below 1.0 representable as f32.
const JUST_BELOW_ONE: f32 = 1.0 - f32::EPSILON;

/// A deterministic, continuous scalar field over three coordinates.
///
/// Implementations must return values in `[0, 1)`, the same value for the same
/// input, and small output changes for small input changes.
pub trait NoiseField: Send + Sync {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32;
}

/// Seeded fractal Perlin noise remapped into `[0, 1)`.
///
/// Four octaves at half amplitude each, which gives the same soft, slightly
/// lumpy texture a sketching environment's default noise has.
pub struct PerlinField {
    fbm: Fbm<Perlin>,
    seed: u32,
}

impl PerlinField {
    pub const OCTAVES: usize = 4;
    pub const PERSISTENCE: f64 = 0.5;

    pub fn new(seed: u32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(Self::OCTAVES)
            .set_persistence(Self::PERSISTENCE);
        Self { fbm, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for PerlinField {
    fn default() -> Self {
        Self::new(0)
    }
}

impl NoiseField for PerlinField {
    fn sample(&self, x: f32, y: f32, z: f32) -> f32 {
        let v = self.fbm.get([x as f64, y as f64, z as f64]) as f32;
        (v * 0.5 + 0.5).clamp(0.0, JUST_BELOW_ONE)
    }
}

/// A field that returns the same value everywhere. Handy for isolating the
/// non-noise part of a generator.
#[derive(Debug, Clone, Copy)]
pub struct ConstantField(pub f32);

impl NoiseField for ConstantField {
    fn sample(&self, _x: f32, _y: f32, _z: f32) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perlin_in_unit_interval() {
        let field = PerlinField::new(7);
        for i in 0..2000 {
            let t = i as f32 * 0.137;
            let v = field.sample(t.sin() * 40.0, t * 0.3, -t * 0.05);
            assert!((0.0..1.0).contains(&v), "sample {v} out of [0, 1)");
        }
    }

    #[test]
    fn test_perlin_deterministic_per_seed() {
        let a = PerlinField::new(3);
        let b = PerlinField::new(3);
        for i in 0..100 {
            let x = i as f32 * 0.31;
            assert_eq!(a.sample(x, 1.5, 0.25), b.sample(x, 1.5, 0.25));
        }
    }

    #[test]
    fn test_perlin_is_continuous() {
        let field = PerlinField::new(11);
        let eps = 1e-4;
        for i in 0..200 {
            let x = i as f32 * 0.173 + 0.05;
            let v0 = field.sample(x, 0.4, 0.9);
            let v1 = field.sample(x + eps, 0.4, 0.9);
            assert!((v0 - v1).abs() < 0.01, "jump of {} at x={x}", (v0 - v1).abs());
        }
    }

    #[test]
    fn test_constant_field() {
        let field = ConstantField(0.25);
        assert_eq!(field.sample(1.0, 2.0, 3.0), 0.25);
    }
}
