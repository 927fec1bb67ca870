//! egui front end for the sketch: control panel, GPU canvas and theme.

pub mod canvas;
pub mod controls;
pub mod state;
pub mod theme;

pub use canvas::{draw_sketch_canvas, SketchSurface};
pub use controls::draw_control_panel;
pub use state::SketchShared;
