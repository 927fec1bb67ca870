use fib_core::clock::{SimulationClock, RESEED_INTERVAL_MS};
use fib_core::noise::{NoiseField, PerlinField};
use fib_core::shape::{generate_organic, generate_sphere, organic_noise_phase, ORGANIC_LOOPS, ORGANIC_LOOP_POINTS};
use fib_core::{composite, DrawCommand, Geometry, LiveParameters, Mode, ParameterSnapshot, Sketch, TrailAction};
use glam::Vec3;
use std::sync::Arc;

// ── Helpers ──────────────────────────────────────────────────────

const NOISE_SEED: u32 = 1234;
const CLOCK_SEED: u64 = 99;

fn seeded_sketch() -> Sketch {
    Sketch::with_parts(
        SimulationClock::with_seed(CLOCK_SEED),
        Box::new(PerlinField::new(NOISE_SEED)),
    )
}

fn snapshot(mode: Mode) -> ParameterSnapshot {
    ParameterSnapshot { mode, ..ParameterSnapshot::default() }
}

/// Apply each shape command's model matrix to its points.
fn world_points(commands: &[DrawCommand]) -> Vec<Vec3> {
    commands
        .iter()
        .flat_map(|c| match c {
            DrawCommand::Points { model, points } | DrawCommand::LineLoop { model, points } => {
                points.iter().map(|p| model.transform_point3(*p)).collect::<Vec<_>>()
            }
            _ => Vec::new(),
        })
        .collect()
}

fn max_distance(a: &[Vec3], b: &[Vec3]) -> f32 {
    assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(p, q)| p.distance(*q)).fold(0.0, f32::max)
}

// ── 1. Sphere geometry ───────────────────────────────────────────

#[test]
fn sphere_without_wobble_lies_on_scaled_sphere() {
    for &size in &[0.1f32, 1.0, 2.25, 3.0] {
        for &count in &[10u32, 11, 500, 1999, 2000] {
            let mut sk = seeded_sketch();
            let snap = ParameterSnapshot {
                mode: Mode::Sphere,
                point_count: count,
                wobble: 0.0,
                size,
                ..ParameterSnapshot::default()
            };
            // a few frames so the rotation is non-trivial
            let mut commands = Vec::new();
            for _ in 0..7 {
                commands = sk.frame(&snap, 16.6, 0.0);
            }
            let pts = world_points(&commands);
            assert_eq!(pts.len(), count as usize);
            let expected = 200.0 * size;
            for p in pts {
                assert!(
                    (p.length() - expected).abs() < expected * 1e-4,
                    "size {size}, count {count}: |p| = {}",
                    p.length()
                );
            }
        }
    }
}

#[test]
fn sphere_point_count_matches_parameter() {
    let noise = PerlinField::new(NOISE_SEED);
    for count in (10..=2000).step_by(10) {
        let snap = ParameterSnapshot { point_count: count, wobble: 80.0, ..snapshot(Mode::Sphere) };
        assert_eq!(generate_sphere(&snap, 1000.0, &noise).len(), count as usize);
    }
}

#[test]
fn sphere_wobble_bounds_radius() {
    let noise = PerlinField::new(NOISE_SEED);
    let snap = ParameterSnapshot { wobble: 100.0, ..snapshot(Mode::Sphere) };
    for p in generate_sphere(&snap, 5000.0, &noise) {
        // radius = 200 + (n - 0.5) * 200 with n in [0, 1)
        let r = p.length();
        assert!((100.0 - 1e-2..=300.0 + 1e-2).contains(&r), "radius {r}");
    }
}

// ── 2. Organic geometry ──────────────────────────────────────────

#[test]
fn organic_always_five_loops_of_hundred() {
    let noise = PerlinField::new(NOISE_SEED);
    for &wobble in &[0.0f32, 0.05, 50.0, 100.0] {
        for &count in &[10u32, 2000] {
            for &t in &[0.0f64, 1.0, 123_456.0] {
                let snap = ParameterSnapshot { wobble, point_count: count, ..snapshot(Mode::Organic) };
                let loops = generate_organic(&snap, t, 42.0, &noise);
                assert_eq!(loops.len(), ORGANIC_LOOPS);
                for l in &loops {
                    assert_eq!(l.len(), ORGANIC_LOOP_POINTS);
                    assert!(l.iter().all(|p| p.is_finite()));
                }
            }
        }
    }
}

#[test]
fn organic_frame_emits_five_closed_loops() {
    let mut sk = seeded_sketch();
    let cmds = sk.frame(&snapshot(Mode::Organic), 16.6, 2500.0);
    let loops: Vec<_> = cmds
        .iter()
        .filter(|c| matches!(c, DrawCommand::LineLoop { points, .. } if points.len() == ORGANIC_LOOP_POINTS))
        .collect();
    assert_eq!(loops.len(), ORGANIC_LOOPS);
    assert!(!cmds.iter().any(|c| matches!(c, DrawCommand::Points { .. })));
}

// Known boundary: the third noise coordinate switches from a time-varying term
// to exactly 0 when wobble reaches 0. The input to the field jumps there; the
// displacement does not, because the amplitude is zero at that point.
#[test]
fn organic_wobble_zero_input_discontinuity_is_invisible() {
    let t = 400_000.0;
    assert_eq!(organic_noise_phase(t, 0.0), 0.0);
    assert!((organic_noise_phase(t, f32::MIN_POSITIVE) - 200.0).abs() < 1e-9);

    let noise = PerlinField::new(NOISE_SEED);
    let flat = generate_organic(&ParameterSnapshot { wobble: 0.0, ..snapshot(Mode::Organic) }, t, 3.0, &noise);
    let tiny = generate_organic(&ParameterSnapshot { wobble: 1e-4, ..snapshot(Mode::Organic) }, t, 3.0, &noise);
    for (a, b) in flat.iter().zip(&tiny) {
        assert!(max_distance(a, b) < 1e-3);
    }
}

// ── 3. Continuity and freezing ───────────────────────────────────

#[test]
fn motion_depends_on_virtual_time_not_step_size() {
    for mode in Mode::ALL {
        let snap = ParameterSnapshot { speed: 3.0, wobble: 60.0, ..snapshot(mode) };

        let mut fine = seeded_sketch();
        for _ in 0..600 {
            fine.frame(&snap, 1.0, 0.0);
        }

        let mut coarse = seeded_sketch();
        for _ in 0..6 {
            coarse.frame(&snap, 100.0, 0.0);
        }

        assert!((fine.clock().virtual_time() - coarse.clock().virtual_time()).abs() < 1e-6);

        let a: Vec<Vec3> = fine.geometry(&snap).vertices().copied().collect();
        let b: Vec<Vec3> = coarse.geometry(&snap).vertices().copied().collect();
        assert!(max_distance(&a, &b) < 1e-2, "{mode:?} drifted by {}", max_distance(&a, &b));
    }
}

#[test]
fn changing_speed_does_not_jump_phase() {
    let noise = PerlinField::new(NOISE_SEED);
    let mut clock = SimulationClock::with_seed(CLOCK_SEED);
    let snap = ParameterSnapshot { wobble: 40.0, ..snapshot(Mode::Sphere) };

    clock.advance(16.6, 1.0);
    let before = generate_sphere(&snap, clock.virtual_time(), &noise);
    // speed changes from 1 to 10 between frames; the next frame only moves by
    // one frame's worth of the new rate
    clock.advance(0.01, 10.0);
    let after = generate_sphere(&snap, clock.virtual_time(), &noise);
    assert!(max_distance(&before, &after) < 0.5);
}

#[test]
fn zero_speed_freezes_geometry() {
    for mode in Mode::ALL {
        let mut sk = seeded_sketch();
        let moving = ParameterSnapshot { speed: 2.0, ..snapshot(mode) };
        for _ in 0..10 {
            sk.frame(&moving, 16.6, 100.0);
        }

        let frozen = ParameterSnapshot { speed: 0.0, ..moving };
        let first = sk.frame(&frozen, 16.6, 200.0);
        let (t, r) = (sk.clock().virtual_time(), sk.clock().rotation_angle());
        for _ in 0..50 {
            let next = sk.frame(&frozen, 16.6, 300.0);
            assert_eq!(next, first);
        }
        assert_eq!(sk.clock().virtual_time(), t);
        assert_eq!(sk.clock().rotation_angle(), r);
    }
}

#[test]
fn parameter_changes_never_reset_clock() {
    let live = Arc::new(LiveParameters::default());
    let mut sk = seeded_sketch();

    for i in 0..20 {
        let snap = live.load();
        sk.frame(&snap, 16.0, i as f64 * 16.0);
    }
    let t = sk.clock().virtual_time();
    assert!(t > 0.0);

    live.set_mode(Mode::Organic);
    live.set_size(2.0);
    live.set_point_count(10);
    sk.frame(&live.load(), 16.0, 400.0);
    assert!(sk.clock().virtual_time() > t);
}

// ── 4. Compositor ────────────────────────────────────────────────

#[test]
fn compositor_threshold_and_extremes() {
    assert_eq!(composite(0.0), TrailAction::FullClear);
    assert_eq!(composite(4.0), TrailAction::FullClear);

    match composite(5.0) {
        TrailAction::FadeOverlay { opacity } => {
            let expected = 255.0 - 5.0 * 250.0 / 255.0;
            assert!((opacity - expected).abs() < 1e-3);
        }
        other => panic!("expected fade at trails=5, got {other:?}"),
    }
    match composite(255.0) {
        TrailAction::FadeOverlay { opacity } => assert!((opacity - 5.0).abs() < 1e-4),
        other => panic!("expected fade at trails=255, got {other:?}"),
    }
}

#[test]
fn every_frame_clears_depth_before_shapes() {
    let mut sk = seeded_sketch();
    for trails in [0.0f32, 4.0, 5.0, 128.0, 255.0] {
        for mode in Mode::ALL {
            let cmds = sk.frame(&ParameterSnapshot { trails, ..snapshot(mode) }, 16.6, 0.0);
            let depth_idx = cmds
                .iter()
                .position(|c| *c == DrawCommand::ClearDepth)
                .expect("depth clear present");
            assert_eq!(cmds.iter().filter(|c| **c == DrawCommand::ClearDepth).count(), 1);
            assert_eq!(depth_idx, 1);
            assert!(cmds[..depth_idx].iter().all(|c| !c.is_shape()));
            assert!(cmds[depth_idx + 1..].iter().all(DrawCommand::is_shape));
        }
    }
}

// ── 5. Re-seed timer ─────────────────────────────────────────────

#[test]
fn reseed_fires_only_after_interval() {
    let mut clock = SimulationClock::with_seed(CLOCK_SEED);
    let fired = (
        clock.maybe_reseed(0.0, RESEED_INTERVAL_MS),
        clock.maybe_reseed(1999.0, RESEED_INTERVAL_MS),
    );
    assert_eq!(fired, (false, false));
    assert!(clock.maybe_reseed(2001.0, RESEED_INTERVAL_MS));
    assert_eq!(clock.last_interval_wall_time(), 2001.0);
    assert!(!clock.maybe_reseed(2001.0, RESEED_INTERVAL_MS));
}

#[test]
fn organic_reseed_changes_shape_discretely() {
    let mut sk = seeded_sketch();
    let snap = ParameterSnapshot { speed: 0.0, ..snapshot(Mode::Organic) };
    let before = match sk.geometry(&snap) {
        Geometry::LineLoops(l) => l,
        _ => unreachable!(),
    };
    sk.frame(&snap, 16.6, 2500.0);
    let after = match sk.geometry(&snap) {
        Geometry::LineLoops(l) => l,
        _ => unreachable!(),
    };
    assert_ne!(sk.clock().interval_offset(), 0.0);
    assert!(max_distance(&before[0], &after[0]) > 1e-3);
}

// ── 6. Noise contract ────────────────────────────────────────────

#[test]
fn noise_field_contract_holds_over_generator_inputs() {
    let noise = PerlinField::new(NOISE_SEED);
    for i in 0..1000 {
        let f = i as f32;
        let v = noise.sample(f.cos() + f * 0.2, f.sin(), (i % 101) as f32 * 0.01);
        assert!((0.0..1.0).contains(&v));
        assert_eq!(v, noise.sample(f.cos() + f * 0.2, f.sin(), (i % 101) as f32 * 0.01));
    }
}
