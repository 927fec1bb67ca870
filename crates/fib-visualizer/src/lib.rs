//! OpenGL backend for the sketch: executes `fib_core::DrawCommand` lists on a
//! persistent offscreen canvas so trails survive host redraws.

pub mod camera;
pub mod fbo;
pub mod persistence;
pub mod quad;
pub mod renderer;
pub mod settings;
pub mod shaders;
pub mod stroke_renderer;

pub use camera::Camera;
pub use renderer::SketchRenderer;
pub use settings::RenderSettings;
