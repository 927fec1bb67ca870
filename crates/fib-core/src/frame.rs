use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::clock::{SimulationClock, RESEED_INTERVAL_MS};
use crate::noise::{NoiseField, PerlinField};
use crate::parameter::{Mode, ParameterSnapshot};
use crate::shape::Geometry;
use crate::trails::{composite, TrailAction};

/// Stroke used for every shape draw. Shapes are never filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeStyle {
    pub color: [u8; 3],
    pub weight: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: [30, 30, 30],
            weight: 2.0,
        }
    }
}

impl StrokeStyle {
    pub fn color_f32(&self) -> [f32; 3] {
        self.color.map(|c| c as f32 / 255.0)
    }
}

/// One instruction for the rendering backend, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Erase the canvas colour and depth.
    ClearColor,
    /// Full-viewport translucent plane just behind the scene. `opacity` is on a
    /// 0..255 scale.
    FadePlane { opacity: f32 },
    /// Reset depth so the new frame is never hidden behind the last one.
    ClearDepth,
    /// Disconnected points.
    Points { model: Mat4, points: Vec<Vec3> },
    /// Closed stroked path (last point joins the first).
    LineLoop { model: Mat4, points: Vec<Vec3> },
}

impl DrawCommand {
    pub fn is_shape(&self) -> bool {
        matches!(self, DrawCommand::Points { .. } | DrawCommand::LineLoop { .. })
    }
}

/// Scene transform: uniform scale, then spin about y and half as fast about x.
pub fn model_matrix(size: f32, rotation_angle: f64) -> Mat4 {
    let angle = rotation_angle as f32;
    Mat4::from_scale(Vec3::splat(size))
        * Mat4::from_rotation_y(angle)
        * Mat4::from_rotation_x(angle * 0.5)
}

/// Render context for one mounted surface: the clock and the noise field.
///
/// Created once when the surface comes up and kept until it is torn down.
/// Parameter changes flow in through [`Sketch::frame`] and never reset it.
pub struct Sketch {
    clock: SimulationClock,
    noise: Box<dyn NoiseField>,
    reseed_interval_ms: f64,
}

impl Sketch {
    pub fn new(noise_seed: u32) -> Self {
        Self::with_parts(SimulationClock::new(), Box::new(PerlinField::new(noise_seed)))
    }

    pub fn with_parts(clock: SimulationClock, noise: Box<dyn NoiseField>) -> Self {
        Self {
            clock,
            noise,
            reseed_interval_ms: RESEED_INTERVAL_MS,
        }
    }

    pub fn with_reseed_interval(mut self, interval_ms: f64) -> Self {
        self.reseed_interval_ms = interval_ms;
        self
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn noise(&self) -> &dyn NoiseField {
        self.noise.as_ref()
    }

    /// Produce the ordered draw list for one frame and advance the clock.
    ///
    /// `frame_delta_ms` is the host's time since the previous frame (zero on
    /// the first frame); `wall_time_ms` is real time since the surface was
    /// created and only drives the organic re-seed.
    pub fn frame(
        &mut self,
        snapshot: &ParameterSnapshot,
        frame_delta_ms: f64,
        wall_time_ms: f64,
    ) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(2 + crate::shape::ORGANIC_LOOPS);

        match composite(snapshot.trails) {
            TrailAction::FullClear => commands.push(DrawCommand::ClearColor),
            TrailAction::FadeOverlay { opacity } => {
                commands.push(DrawCommand::FadePlane { opacity })
            }
        }
        commands.push(DrawCommand::ClearDepth);

        let delta = SimulationClock::effective_delta(frame_delta_ms);
        self.clock.advance(delta, snapshot.speed as f64);

        if snapshot.mode == Mode::Organic {
            self.clock.maybe_reseed(wall_time_ms, self.reseed_interval_ms);
        }

        let model = self.model_matrix(snapshot);
        match self.geometry(snapshot) {
            Geometry::PointCloud(points) => commands.push(DrawCommand::Points { model, points }),
            Geometry::LineLoops(loops) => commands.extend(
                loops
                    .into_iter()
                    .map(|points| DrawCommand::LineLoop { model, points }),
            ),
        }

        commands
    }

    /// Geometry for the current clock state, without advancing it.
    pub fn geometry(&self, snapshot: &ParameterSnapshot) -> Geometry {
        snapshot.mode.generate(
            snapshot,
            self.clock.virtual_time(),
            self.clock.interval_offset(),
            self.noise.as_ref(),
        )
    }

    /// Scene transform for the current clock state.
    pub fn model_matrix(&self, snapshot: &ParameterSnapshot) -> Mat4 {
        model_matrix(snapshot.size, self.clock.rotation_angle())
    }
}
