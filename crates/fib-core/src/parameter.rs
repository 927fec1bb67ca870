use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

pub const POINT_COUNT_RANGE: RangeInclusive<u32> = 10..=2000;
pub const SPEED_RANGE: RangeInclusive<f32> = 0.0..=10.0;
pub const WOBBLE_RANGE: RangeInclusive<f32> = 0.0..=100.0;
pub const SIZE_RANGE: RangeInclusive<f32> = 0.1..=3.0;
pub const TRAILS_RANGE: RangeInclusive<f32> = 0.0..=255.0;

/// Slider increments used by the control panel.
pub const POINT_COUNT_STEP: u32 = 10;
pub const SPEED_STEP: f64 = 0.01;
pub const WOBBLE_STEP: f64 = 0.1;
pub const SIZE_STEP: f64 = 0.01;
pub const TRAILS_STEP: f64 = 1.0;

/// Which shape family the generator builds each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    /// Fibonacci-lattice point cloud.
    #[default]
    Sphere = 0,
    /// Five closed, noise-displaced rings.
    Organic = 1,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Sphere, Mode::Organic];

    pub fn from_u8(val: u8) -> Self {
        match val {
            1 => Mode::Organic,
            _ => Mode::Sphere,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Sphere => "SHAPE 1",
            Mode::Organic => "SHAPE 2",
        }
    }
}

/// One frame's read of the externally owned controls.
///
/// Values are expected to arrive already inside their declared ranges; the
/// generator does not re-check them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSnapshot {
    pub mode: Mode,
    pub point_count: u32,
    pub speed: f32,
    pub wobble: f32,
    pub size: f32,
    pub trails: f32,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            mode: Mode::Sphere,
            point_count: 1000,
            speed: 1.0,
            wobble: 10.0,
            size: 1.0,
            trails: 50.0,
        }
    }
}

impl ParameterSnapshot {
    /// Copy of this snapshot with every field pulled into its declared range.
    ///
    /// Non-finite floats fall back to the default for that field.
    pub fn clamped(&self) -> Self {
        let defaults = Self::default();
        let clamp = |v: f32, range: &RangeInclusive<f32>, fallback: f32| {
            if v.is_finite() {
                v.clamp(*range.start(), *range.end())
            } else {
                fallback
            }
        };

        Self {
            mode: self.mode,
            point_count: self
                .point_count
                .clamp(*POINT_COUNT_RANGE.start(), *POINT_COUNT_RANGE.end()),
            speed: clamp(self.speed, &SPEED_RANGE, defaults.speed),
            wobble: clamp(self.wobble, &WOBBLE_RANGE, defaults.wobble),
            size: clamp(self.size, &SIZE_RANGE, defaults.size),
            trails: clamp(self.trails, &TRAILS_RANGE, defaults.trails),
        }
    }
}

/// Atomic f32 wrapper for lock-free cross-callback access.
#[derive(Debug)]
pub struct AtomicF32(AtomicU32);

impl AtomicF32 {
    pub fn new(val: f32) -> Self {
        Self(AtomicU32::new(val.to_bits()))
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn store(&self, val: f32) {
        self.0.store(val.to_bits(), Ordering::Relaxed);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clone for AtomicF32 {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

/// The live parameter cell shared between the control panel and the render loop.
///
/// The UI writes fields as controls change; the frame callback calls
/// [`LiveParameters::load`] once per frame. Each field is its own atomic, so a
/// read racing a write may mix old and new fields. That is acceptable: every
/// field is meaningful on its own.
#[derive(Debug)]
pub struct LiveParameters {
    mode: AtomicU8,
    point_count: AtomicU32,
    speed: AtomicF32,
    wobble: AtomicF32,
    size: AtomicF32,
    trails: AtomicF32,
}

impl LiveParameters {
    pub fn new(snapshot: ParameterSnapshot) -> Self {
        Self {
            mode: AtomicU8::new(snapshot.mode as u8),
            point_count: AtomicU32::new(snapshot.point_count),
            speed: AtomicF32::new(snapshot.speed),
            wobble: AtomicF32::new(snapshot.wobble),
            size: AtomicF32::new(snapshot.size),
            trails: AtomicF32::new(snapshot.trails),
        }
    }

    pub fn load(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            mode: Mode::from_u8(self.mode.load(Ordering::Relaxed)),
            point_count: self.point_count.load(Ordering::Relaxed),
            speed: self.speed.load(),
            wobble: self.wobble.load(),
            size: self.size.load(),
            trails: self.trails.load(),
        }
    }

    /// Replace every field with the values from `snapshot`.
    pub fn store(&self, snapshot: ParameterSnapshot) {
        self.set_mode(snapshot.mode);
        self.set_point_count(snapshot.point_count);
        self.set_speed(snapshot.speed);
        self.set_wobble(snapshot.wobble);
        self.set_size(snapshot.size);
        self.set_trails(snapshot.trails);
    }

    pub fn set_mode(&self, mode: Mode) {
        self.mode.store(mode as u8, Ordering::Relaxed);
    }

    pub fn set_point_count(&self, point_count: u32) {
        self.point_count.store(point_count, Ordering::Relaxed);
    }

    pub fn set_speed(&self, speed: f32) {
        self.speed.store(speed);
    }

    pub fn set_wobble(&self, wobble: f32) {
        self.wobble.store(wobble);
    }

    pub fn set_size(&self, size: f32) {
        self.size.store(size);
    }

    pub fn set_trails(&self, trails: f32) {
        self.trails.store(trails);
    }
}

impl Default for LiveParameters {
    fn default() -> Self {
        Self::new(ParameterSnapshot::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_mode_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_u8(mode as u8), mode);
        }
        assert_eq!(Mode::from_u8(200), Mode::Sphere);
    }

    #[test]
    fn test_defaults_in_range() {
        let s = ParameterSnapshot::default();
        assert_eq!(s.clamped(), s);
        assert!(POINT_COUNT_RANGE.contains(&s.point_count));
        assert!(TRAILS_RANGE.contains(&s.trails));
    }

    #[test]
    fn test_clamped_pulls_fields_into_range() {
        let s = ParameterSnapshot {
            mode: Mode::Organic,
            point_count: 5,
            speed: 42.0,
            wobble: -1.0,
            size: f32::NAN,
            trails: 300.0,
        }
        .clamped();
        assert_eq!(s.mode, Mode::Organic);
        assert_eq!(s.point_count, 10);
        assert_eq!(s.speed, 10.0);
        assert_eq!(s.wobble, 0.0);
        assert_eq!(s.size, 1.0);
        assert_eq!(s.trails, 255.0);
    }

    #[test]
    fn test_atomic_f32() {
        let a = AtomicF32::new(0.25);
        assert_eq!(a.load(), 0.25);
        a.store(-7.5);
        assert_eq!(a.load(), -7.5);
    }

    #[test]
    fn test_live_parameters_field_writes_visible_to_reader() {
        let live = Arc::new(LiveParameters::default());
        let writer = live.clone();

        writer.set_mode(Mode::Organic);
        writer.set_wobble(0.0);
        writer.set_point_count(20);

        let snap = live.load();
        assert_eq!(snap.mode, Mode::Organic);
        assert_eq!(snap.wobble, 0.0);
        assert_eq!(snap.point_count, 20);
        assert_eq!(snap.speed, ParameterSnapshot::default().speed);
    }

    #[test]
    fn test_live_parameters_store_replaces_all() {
        let live = LiveParameters::default();
        let next = ParameterSnapshot {
            mode: Mode::Organic,
            point_count: 640,
            speed: 0.0,
            wobble: 55.5,
            size: 2.5,
            trails: 4.0,
        };
        live.store(next);
        assert_eq!(live.load(), next);
    }
}
