use fib_core::{SketchConfig, StrokeStyle};

/// Visual parameters for the sketch renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Colour and width of every shape stroke.
    pub stroke: StrokeStyle,
    /// Fade plane colour [r, g, b]. Range: 0.0..1.0 each
    pub fade_color: [f32; 3],
    /// Logical canvas size in pixels; the camera is framed for it.
    pub canvas_size: [u32; 2],
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            stroke: StrokeStyle::default(),
            fade_color: [1.0, 1.0, 1.0],
            canvas_size: [600, 600],
        }
    }
}

impl From<&SketchConfig> for RenderSettings {
    fn from(config: &SketchConfig) -> Self {
        Self {
            stroke: config.stroke,
            fade_color: config.fade_color.map(|c| c as f32 / 255.0),
            canvas_size: config.canvas_size,
        }
    }
}
