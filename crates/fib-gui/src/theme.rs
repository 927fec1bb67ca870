use egui::{Color32, Stroke};

// Light "frosted glass" palette
const PANEL: Color32 = Color32::from_rgba_premultiplied(242, 242, 245, 235);
const WINDOW: Color32 = Color32::from_rgb(248, 248, 250);
const FAINT: Color32 = Color32::from_rgb(232, 232, 236);
const TRACK: Color32 = Color32::from_rgb(214, 214, 220);
const INK: Color32 = Color32::from_rgb(30, 30, 30);
const MUTED: Color32 = Color32::from_rgb(120, 120, 128);
const ACCENT: Color32 = Color32::from_rgb(60, 60, 66);
const HOVER: Color32 = Color32::from_rgb(200, 200, 208);

static INIT: std::sync::Once = std::sync::Once::new();

/// Apply the light control-panel theme to the egui context.
///
/// Visuals are set once (guarded by `std::sync::Once`).
pub fn apply(ctx: &egui::Context) {
    INIT.call_once(|| {
        let mut visuals = egui::Visuals::light();

        visuals.panel_fill = PANEL;
        visuals.window_fill = WINDOW;
        visuals.faint_bg_color = FAINT;
        visuals.extreme_bg_color = Color32::WHITE;
        visuals.override_text_color = Some(INK);

        visuals.selection.bg_fill = ACCENT;
        visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);

        visuals.widgets.inactive.bg_fill = TRACK;
        visuals.widgets.inactive.weak_bg_fill = FAINT;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, MUTED);
        visuals.widgets.inactive.bg_stroke = Stroke::NONE;

        visuals.widgets.hovered.bg_fill = HOVER;
        visuals.widgets.hovered.weak_bg_fill = HOVER;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.5, INK);
        visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, MUTED);

        visuals.widgets.active.bg_fill = ACCENT;
        visuals.widgets.active.weak_bg_fill = ACCENT;
        visuals.widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);
        visuals.widgets.active.bg_stroke = Stroke::new(1.0, INK);

        visuals.widgets.noninteractive.bg_fill = PANEL;
        visuals.widgets.noninteractive.weak_bg_fill = PANEL;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, INK);
        visuals.widgets.noninteractive.bg_stroke = Stroke::new(0.0, FAINT);

        visuals.window_stroke = Stroke::new(1.0, TRACK);

        ctx.set_visuals(visuals);
    });
}
