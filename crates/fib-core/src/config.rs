use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::clock::RESEED_INTERVAL_MS;
use crate::frame::StrokeStyle;
use crate::parameter::ParameterSnapshot;

/// Start-up configuration for a sketch surface.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Canvas width and height in logical pixels.
    pub canvas_size: [u32; 2],
    /// Seed of the noise field.
    pub noise_seed: u32,
    /// Seed for interval offsets. `None` draws from OS entropy.
    pub offset_seed: Option<u64>,
    /// Controls as they appear when the window opens.
    pub initial: ParameterSnapshot,
    pub stroke: StrokeStyle,
    /// RGB of the trail fade plane.
    pub fade_color: [u8; 3],
    /// Wall-clock period of the organic re-seed.
    pub reseed_interval_ms: f64,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            canvas_size: [600, 600],
            noise_seed: 0,
            offset_seed: None,
            initial: ParameterSnapshot::default(),
            stroke: StrokeStyle::default(),
            fade_color: [255, 255, 255],
            reseed_interval_ms: RESEED_INTERVAL_MS,
        }
    }
}

impl SketchConfig {
    /// Parse a config from JSON, clamping the initial controls into range.
    pub fn from_json(json: &str) -> io::Result<Self> {
        let mut config: SketchConfig =
            serde_json::from_str(json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        config.initial = config.initial.clamped();
        if config.canvas_size.iter().any(|&d| d == 0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("canvas size must be non-zero, got {:?}", config.canvas_size),
            ));
        }
        if !(config.reseed_interval_ms.is_finite() && config.reseed_interval_ms >= 0.0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("invalid reseed interval {}", config.reseed_interval_ms),
            ));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> io::Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Load a config file from disk.
pub fn load_config(path: &Path) -> io::Result<SketchConfig> {
    let json = std::fs::read_to_string(path)?;
    SketchConfig::from_json(&json)
}

/// Write a config file to disk as pretty JSON.
pub fn save_config(path: &Path, config: &SketchConfig) -> io::Result<()> {
    std::fs::write(path, config.to_json()?)
}
