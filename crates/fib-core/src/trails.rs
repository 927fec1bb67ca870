/// Trails below this value clear the canvas instead of fading it.
pub const TRAIL_THRESHOLD: f32 = 5.0;
/// Fade-plane opacity at `trails == 0` and at `trails == 255`, on a 0..255 scale.
pub const OPACITY_AT_MIN_TRAILS: f32 = 255.0;
pub const OPACITY_AT_MAX_TRAILS: f32 = 5.0;

/// What to do with the previous frame before drawing the new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrailAction {
    /// Erase the previous frame entirely.
    FullClear,
    /// Cover the previous frame with a translucent plane. `opacity` is on a
    /// 0..255 scale; lower opacity leaves longer ghosts.
    FadeOverlay { opacity: f32 },
}

impl TrailAction {
    /// Plane alpha in `[0, 1]`, or `None` for a full clear.
    pub fn opacity_alpha(&self) -> Option<f32> {
        match self {
            TrailAction::FullClear => None,
            TrailAction::FadeOverlay { opacity } => Some((opacity / 255.0).clamp(0.0, 1.0)),
        }
    }
}

/// Linear remap of `value` from `[start1, stop1]` onto `[start2, stop2]`.
pub fn map_range(value: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    start2 + (value - start1) / (stop1 - start1) * (stop2 - start2)
}

/// Decide how the previous frame is carried into this one.
pub fn composite(trails: f32) -> TrailAction {
    if trails < TRAIL_THRESHOLD {
        TrailAction::FullClear
    } else {
        TrailAction::FadeOverlay {
            opacity: map_range(trails, 0.0, 255.0, OPACITY_AT_MIN_TRAILS, OPACITY_AT_MAX_TRAILS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opacity(action: TrailAction) -> f32 {
        match action {
            TrailAction::FadeOverlay { opacity } => opacity,
            TrailAction::FullClear => panic!("expected a fade overlay"),
        }
    }

    #[test]
    fn test_below_threshold_clears() {
        assert_eq!(composite(0.0), TrailAction::FullClear);
        assert_eq!(composite(4.0), TrailAction::FullClear);
        assert_eq!(composite(4.999), TrailAction::FullClear);
    }

    #[test]
    fn test_threshold_fades() {
        // 255 - 5 * 250 / 255
        assert!((opacity(composite(5.0)) - 250.098).abs() < 1e-2);
    }

    #[test]
    fn test_max_trails_is_faintest() {
        assert!((opacity(composite(255.0)) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_opacity_decreases_with_trails() {
        let mut prev = f32::MAX;
        for t in 5..=255 {
            let o = opacity(composite(t as f32));
            assert!(o < prev);
            prev = o;
        }
    }

    #[test]
    fn test_opacity_alpha() {
        assert_eq!(TrailAction::FullClear.opacity_alpha(), None);
        let a = composite(255.0).opacity_alpha().unwrap();
        assert!((a - 5.0 / 255.0).abs() < 1e-6);
    }
}
