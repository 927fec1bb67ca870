use crate::canvas::SketchSurface;
use fib_core::{LiveParameters, SketchConfig};
use std::sync::{Arc, Mutex};

/// Data shared between the control panel, the canvas paint callback and the
/// host application.
///
/// The controls only ever write `params`; the surface is rebuilt solely by
/// [`SketchShared::remount`] after a teardown.
pub struct SketchShared {
    pub params: Arc<LiveParameters>,
    pub surface: Arc<Mutex<SketchSurface>>,
    config: SketchConfig,
}

impl SketchShared {
    pub fn new(config: SketchConfig) -> Self {
        Self {
            params: Arc::new(LiveParameters::new(config.initial.clamped())),
            surface: Arc::new(Mutex::new(SketchSurface::new(&config))),
            config,
        }
    }

    pub fn config(&self) -> &SketchConfig {
        &self.config
    }

    /// Replace a torn down surface with a fresh one (new clock, renderer
    /// created on the next paint). Control values are kept. Returns whether a
    /// new surface was mounted.
    pub fn remount(&self) -> bool {
        let Ok(mut surface) = self.surface.lock() else {
            log::error!("sketch surface lock poisoned, cannot remount");
            return false;
        };
        if !surface.is_torn_down() {
            return false;
        }
        *surface = SketchSurface::new(&self.config);
        log::info!("sketch surface remounted");
        true
    }

    /// Tear the current surface down. Safe to call repeatedly.
    pub fn teardown(&self, gl: &glow::Context) {
        if let Ok(mut surface) = self.surface.lock() {
            surface.teardown(gl);
        }
    }
}

impl Default for SketchShared {
    fn default() -> Self {
        Self::new(SketchConfig::default())
    }
}
