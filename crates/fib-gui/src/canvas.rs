use crate::state::SketchShared;
use egui::Vec2;
use fib_core::{DrawCommand, LiveParameters, PerlinField, SimulationClock, Sketch, SketchConfig};
use fib_visualizer::{RenderSettings, SketchRenderer};
use std::sync::Arc;
use std::time::Instant;

/// Wall-clock bookkeeping for one surface.
#[derive(Debug, Clone, Copy)]
pub struct FrameTimer {
    started: Instant,
    last: Option<Instant>,
}

impl FrameTimer {
    pub fn new(started: Instant) -> Self {
        Self { started, last: None }
    }

    /// Returns `(frame_delta_ms, wall_time_ms)` for a frame painted at `now`.
    /// The first tick reports a zero delta.
    pub fn tick(&mut self, now: Instant) -> (f64, f64) {
        let delta = self
            .last
            .map(|last| now.saturating_duration_since(last).as_secs_f64() * 1000.0)
            .unwrap_or(0.0);
        self.last = Some(now);
        let wall = now.saturating_duration_since(self.started).as_secs_f64() * 1000.0;
        (delta, wall)
    }
}

/// Everything one mounted canvas owns: the sketch (and with it the clock),
/// the GPU renderer and frame timing.
///
/// A surface lives until [`SketchSurface::teardown`]; after that it only
/// refuses work. Mounting again means building a new surface.
pub struct SketchSurface {
    sketch: Sketch,
    settings: RenderSettings,
    renderer: Option<SketchRenderer>,
    timer: FrameTimer,
    init_failed: bool,
    torn_down: bool,
}

impl SketchSurface {
    pub fn new(config: &SketchConfig) -> Self {
        let clock = config
            .offset_seed
            .map_or_else(SimulationClock::new, SimulationClock::with_seed);
        let sketch = Sketch::with_parts(clock, Box::new(PerlinField::new(config.noise_seed)))
            .with_reseed_interval(config.reseed_interval_ms);

        Self {
            sketch,
            settings: RenderSettings::from(config),
            renderer: None,
            timer: FrameTimer::new(Instant::now()),
            init_failed: false,
            torn_down: false,
        }
    }

    pub fn sketch(&self) -> &Sketch {
        &self.sketch
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Read the controls once and build the draw list for a frame at `now`.
    /// Returns `None` once the surface has been torn down.
    pub fn next_frame(&mut self, params: &LiveParameters, now: Instant) -> Option<Vec<DrawCommand>> {
        if self.torn_down {
            return None;
        }
        let snapshot = params.load();
        let (delta, wall) = self.timer.tick(now);
        Some(self.sketch.frame(&snapshot, delta, wall))
    }

    /// Paint callback body: lazily brings up the renderer, then advances and
    /// draws one frame into `viewport` ([x, y, w, h] in physical pixels).
    pub fn paint(&mut self, gl: &glow::Context, params: &LiveParameters, viewport: [i32; 4]) {
        if self.torn_down {
            log::warn!("paint requested on a torn down sketch surface");
            return;
        }
        if self.init_failed {
            return;
        }

        // Lazy-initialize the renderer on first use
        if self.renderer.is_none() {
            match SketchRenderer::new(gl, self.settings.clone()) {
                Ok(renderer) => self.renderer = Some(renderer),
                Err(err) => {
                    log::error!("failed to create sketch renderer: {err}");
                    self.init_failed = true;
                    return;
                }
            }
        }

        let Some(commands) = self.next_frame(params, Instant::now()) else {
            return;
        };
        if let Some(renderer) = &mut self.renderer {
            renderer.render(gl, &commands, viewport);
        }
    }

    /// Release the GPU side and stop animating. Safe to call repeatedly.
    pub fn teardown(&mut self, gl: &glow::Context) {
        if let Some(mut renderer) = self.retire() {
            renderer.destroy(gl);
        }
    }

    pub(crate) fn retire(&mut self) -> Option<SketchRenderer> {
        if !self.torn_down {
            self.torn_down = true;
            log::info!("sketch surface torn down");
        }
        self.renderer.take()
    }
}

/// Canvas size in UI points: the configured size, shrunk to fit `available`
/// with its aspect ratio kept.
pub fn fit_canvas(canvas_size: [u32; 2], available: Vec2) -> Vec2 {
    let size = Vec2::new(canvas_size[0].max(1) as f32, canvas_size[1].max(1) as f32);
    let scale = (available.x / size.x).min(available.y / size.y).clamp(0.0, 1.0);
    size * scale
}

/// Draw the sketch using `egui::PaintCallback` and keep it animating.
pub fn draw_sketch_canvas(ui: &mut egui::Ui, shared: &SketchShared) {
    let desired_size = fit_canvas(shared.config().canvas_size, ui.available_size());
    let (rect, _response) = ui.allocate_exact_size(desired_size, egui::Sense::hover());

    let params = shared.params.clone();
    let surface = shared.surface.clone();

    let cb = egui_glow::CallbackFn::new(move |info, painter| {
        let vp = info.viewport_in_pixels();
        let viewport = [vp.left_px, vp.from_bottom_px, vp.width_px, vp.height_px];

        if let Ok(mut surface) = surface.lock() {
            surface.paint(painter.gl(), &params, viewport);
        }
    });

    ui.painter().add(egui::PaintCallback {
        rect,
        callback: Arc::new(cb),
    });

    ui.ctx().request_repaint();
}
