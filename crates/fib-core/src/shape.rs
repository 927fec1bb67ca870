use glam::{Mat3, Vec3};
use std::f64::consts::{PI, TAU};

use crate::noise::NoiseField;
use crate::parameter::{Mode, ParameterSnapshot};

/// Radius of the undisturbed Fibonacci sphere.
pub const SPHERE_RADIUS: f64 = 200.0;
/// Number of rings in the organic shape.
pub const ORGANIC_LOOPS: usize = 5;
/// Vertices per organic ring.
pub const ORGANIC_LOOP_POINTS: usize = 100;
/// Mean ring radius and breathing amplitude of the organic shape.
pub const ORGANIC_BASE_RADIUS: f64 = 100.0;
pub const ORGANIC_RADIUS_SWING: f64 = 50.0;

/// One frame's geometry, in object space.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Disconnected points, drawn in order with no implied edges.
    PointCloud(Vec<Vec3>),
    /// Closed loops; the last point of each connects back to its first.
    LineLoops(Vec<Vec<Vec3>>),
}

impl Geometry {
    /// Total vertex count across the whole frame.
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::PointCloud(points) => points.len(),
            Geometry::LineLoops(loops) => loops.iter().map(Vec::len).sum(),
        }
    }

    /// Iterate over every vertex regardless of variant.
    pub fn vertices(&self) -> Box<dyn Iterator<Item = &Vec3> + '_> {
        match self {
            Geometry::PointCloud(points) => Box::new(points.iter()),
            Geometry::LineLoops(loops) => Box::new(loops.iter().flatten()),
        }
    }
}

impl Mode {
    /// Build this frame's geometry for the selected shape family.
    pub fn generate(
        &self,
        snapshot: &ParameterSnapshot,
        virtual_time: f64,
        interval_offset: f64,
        noise: &dyn NoiseField,
    ) -> Geometry {
        match self {
            Mode::Sphere => Geometry::PointCloud(generate_sphere(snapshot, virtual_time, noise)),
            Mode::Organic => Geometry::LineLoops(generate_organic(
                snapshot,
                virtual_time,
                interval_offset,
                noise,
            )),
        }
    }
}

/// Golden angle in radians: `2π (φ − 1)`.
pub fn golden_angle() -> f64 {
    let phi = (5.0f64.sqrt() + 1.0) / 2.0;
    (phi - 1.0) * TAU
}

/// Fibonacci-lattice sphere with a noise-perturbed radius.
///
/// Emits exactly `snapshot.point_count` points in index order. With zero
/// wobble every point sits at [`SPHERE_RADIUS`] from the origin.
pub fn generate_sphere(
    snapshot: &ParameterSnapshot,
    virtual_time: f64,
    noise: &dyn NoiseField,
) -> Vec<Vec3> {
    let count = snapshot.point_count as usize;
    let ga = golden_angle();
    let wobble = snapshot.wobble as f64;
    let drift = virtual_time * 0.0002;

    (0..count)
        .map(|i| {
            let lon = ga * i as f64;
            let lat = (-1.0 + 2.0 * i as f64 / count as f64).asin();

            let n = noise.sample(
                (lat.cos() + drift) as f32,
                lon.sin() as f32,
                (wobble * 0.01) as f32,
            ) as f64;
            let r = SPHERE_RADIUS + (n - 0.5) * wobble * 2.0;

            Vec3::new(
                (r * lat.cos() * lon.cos()) as f32,
                (r * lat.cos() * lon.sin()) as f32,
                (r * lat.sin()) as f32,
            )
        })
        .collect()
}

/// Third noise coordinate for the organic rings.
///
/// Pinned to zero while wobble is zero, so the sampled field does not drift
/// when its amplitude is invisible. Note this makes the noise *input* jump at
/// the `wobble == 0` boundary; the visible output stays flat there because the
/// amplitude is zero.
pub fn organic_noise_phase(virtual_time: f64, wobble: f32) -> f64 {
    let gate = if wobble > 0.0 { 1.0 } else { 0.0 };
    virtual_time * 0.0005 * gate
}

/// Five closed rings of 100 points each, breathing with virtual time and
/// displaced along their local z by noise.
///
/// Ring `j` is turned about x by `j·π/2.5`; the whole set is then spun about z
/// by `virtual_time·0.001`. Both are applied to the emitted coordinates.
pub fn generate_organic(
    snapshot: &ParameterSnapshot,
    virtual_time: f64,
    interval_offset: f64,
    noise: &dyn NoiseField,
) -> Vec<Vec<Vec3>> {
    let wobble = snapshot.wobble;
    let phase = organic_noise_phase(virtual_time, wobble) as f32;
    let spin = Mat3::from_rotation_z((virtual_time * 0.001) as f32);

    (0..ORGANIC_LOOPS)
        .map(|j| {
            let ring = spin * Mat3::from_rotation_x((j as f64 * (PI / 2.5)) as f32);

            (0..ORGANIC_LOOP_POINTS)
                .map(|k| {
                    let angle = k as f64 / ORGANIC_LOOP_POINTS as f64 * TAU;
                    let r = ORGANIC_BASE_RADIUS
                        + ORGANIC_RADIUS_SWING
                            * (angle * 3.0 + virtual_time * 0.002 + interval_offset).sin();
                    let x = r * angle.cos();
                    let y = r * angle.sin();

                    let n = noise.sample((x * 0.01) as f32, (y * 0.01) as f32, phase);
                    let z = (n - 0.5) * wobble;

                    ring * Vec3::new(x as f32, y as f32, z)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{ConstantField, PerlinField};

    fn snapshot(mode: Mode, point_count: u32, wobble: f32) -> ParameterSnapshot {
        ParameterSnapshot {
            mode,
            point_count,
            wobble,
            ..ParameterSnapshot::default()
        }
    }

    #[test]
    fn test_golden_angle() {
        assert!((golden_angle() - 3.883_222_077_450_933).abs() < 1e-12);
    }

    #[test]
    fn test_sphere_first_point_is_south_pole() {
        let pts = generate_sphere(&snapshot(Mode::Sphere, 100, 0.0), 0.0, &ConstantField(0.5));
        let p = pts[0];
        assert!(p.x.abs() < 1e-3 && p.y.abs() < 1e-3);
        assert!((p.z + 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_sphere_wobble_scales_displacement() {
        let s = snapshot(Mode::Sphere, 50, 40.0);
        // noise fixed at 0.75 -> radius 200 + 0.25 * 40 * 2 = 220
        let pts = generate_sphere(&s, 0.0, &ConstantField(0.75));
        for p in pts {
            assert!((p.length() - 220.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_organic_rings_shape() {
        let s = snapshot(Mode::Organic, 1000, 30.0);
        let loops = generate_organic(&s, 1234.0, 17.0, &PerlinField::new(1));
        assert_eq!(loops.len(), ORGANIC_LOOPS);
        assert!(loops.iter().all(|l| l.len() == ORGANIC_LOOP_POINTS));
    }

    #[test]
    fn test_organic_flat_ring_radius_band() {
        // Zero wobble keeps every ring planar, radius within 100 ± 50.
        let s = snapshot(Mode::Organic, 10, 0.0);
        let loops = generate_organic(&s, 5000.0, 3.0, &PerlinField::new(2));
        for l in &loops {
            for p in l {
                let r = p.length();
                assert!((50.0 - 1e-3..=150.0 + 1e-3).contains(&r), "radius {r}");
            }
        }
    }

    #[test]
    fn test_organic_first_ring_unrotated_at_time_zero() {
        let s = snapshot(Mode::Organic, 10, 0.0);
        let loops = generate_organic(&s, 0.0, 0.0, &ConstantField(0.5));
        let p = loops[0][0];
        // angle 0, r = 100 + 50 sin(0)
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!(p.y.abs() < 1e-3 && p.z.abs() < 1e-3);
    }

    #[test]
    fn test_organic_noise_phase_gate() {
        assert_eq!(organic_noise_phase(10_000.0, 0.0), 0.0);
        assert!((organic_noise_phase(10_000.0, 0.1) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_mode_dispatch() {
        let noise = PerlinField::new(0);
        let s = snapshot(Mode::Sphere, 30, 10.0);
        assert!(matches!(Mode::Sphere.generate(&s, 0.0, 0.0, &noise), Geometry::PointCloud(p) if p.len() == 30));
        let g = Mode::Organic.generate(&s, 0.0, 0.0, &noise);
        assert!(matches!(g, Geometry::LineLoops(_)));
        assert_eq!(g.vertex_count(), ORGANIC_LOOPS * ORGANIC_LOOP_POINTS);
        assert_eq!(g.vertices().count(), g.vertex_count());
    }
}
