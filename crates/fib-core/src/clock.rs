//! Simulation clock: speed-scaled virtual time plus a wall-clock re-seed timer.
//!
//! All continuous motion (noise phase, ring breathing, spin) reads
//! [`SimulationClock::virtual_time`], which only ever grows by
//! `frame_delta * speed`. Changing `speed` therefore changes how fast the phase
//! moves, never where it is. The re-seed timer is the single exception: it runs
//! on real elapsed time so its cadence does not follow the speed slider.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rotation advanced per frame per unit of speed (radians).
pub const ROTATION_RATE: f64 = 0.005;
/// Wall-clock period between interval offset redraws.
pub const RESEED_INTERVAL_MS: f64 = 2000.0;
/// Upper bound (exclusive) of a freshly drawn interval offset.
pub const INTERVAL_OFFSET_MAX: f64 = 100.0;
/// Delta used when the host reports none, e.g. on the very first frame.
pub const DEFAULT_FRAME_DELTA_MS: f64 = 16.6;

/// Animation state owned by one render surface for its whole lifetime.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    rotation_angle: f64,
    virtual_time: f64,
    last_interval_wall_time: f64,
    interval_offset: f64,
    rng: StdRng,
}

impl SimulationClock {
    /// New clock whose re-seed draws come from OS entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// New clock with a reproducible sequence of interval offsets.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            rotation_angle: 0.0,
            virtual_time: 0.0,
            last_interval_wall_time: 0.0,
            interval_offset: 0.0,
            rng,
        }
    }

    /// Host frame delta with the first-frame fallback applied.
    pub fn effective_delta(frame_delta_ms: f64) -> f64 {
        if frame_delta_ms.is_finite() && frame_delta_ms > 0.0 {
            frame_delta_ms
        } else {
            DEFAULT_FRAME_DELTA_MS
        }
    }

    /// Step the clock by one rendered frame.
    ///
    /// `speed == 0` leaves both the rotation and the virtual time untouched.
    pub fn advance(&mut self, frame_delta_ms: f64, speed: f64) {
        self.rotation_angle += speed * ROTATION_RATE;
        self.virtual_time += frame_delta_ms * speed;
    }

    /// Redraw the interval offset if more than `interval_ms` of wall time has
    /// passed since the last redraw. Returns whether it fired.
    pub fn maybe_reseed(&mut self, wall_time_ms: f64, interval_ms: f64) -> bool {
        if wall_time_ms - self.last_interval_wall_time > interval_ms {
            self.last_interval_wall_time = wall_time_ms;
            self.interval_offset = self.rng.gen_range(0.0..INTERVAL_OFFSET_MAX);
            log::trace!(
                "interval offset reseeded to {:.3} at {wall_time_ms:.0} ms",
                self.interval_offset
            );
            true
        } else {
            false
        }
    }

    pub fn rotation_angle(&self) -> f64 {
        self.rotation_angle
    }

    pub fn virtual_time(&self) -> f64 {
        self.virtual_time
    }

    pub fn last_interval_wall_time(&self) -> f64 {
        self.last_interval_wall_time
    }

    pub fn interval_offset(&self) -> f64 {
        self.interval_offset
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}
