pub mod clock;
pub mod config;
pub mod frame;
pub mod noise;
pub mod parameter;
pub mod shape;
pub mod trails;

pub use clock::SimulationClock;
pub use config::{load_config, save_config, SketchConfig};
pub use frame::{model_matrix, DrawCommand, Sketch, StrokeStyle};
pub use crate::noise::{NoiseField, PerlinField};
pub use parameter::{LiveParameters, Mode, ParameterSnapshot};
pub use shape::{generate_organic, generate_sphere, Geometry};
pub use trails::{composite, TrailAction};
