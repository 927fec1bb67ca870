//! Fibsphere - standalone window with the control panel beside the canvas.

use eframe::egui;
use fib_core::{load_config, SketchConfig};
use fib_gui::SketchShared;
use std::path::PathBuf;

/// Environment variable naming an optional JSON config file.
const CONFIG_ENV: &str = "FIBSPHERE_CONFIG";
const PANEL_WIDTH: f32 = 220.0;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = startup_config();
    let [canvas_w, canvas_h] = config.canvas_size;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([PANEL_WIDTH + canvas_w as f32 + 32.0, canvas_h as f32 + 32.0])
            .with_title("Fibsphere"),
        // The canvas paints through glow callbacks
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native(
        "Fibsphere",
        options,
        Box::new(move |_cc| Ok(Box::new(FibsphereApp::new(config)))),
    )
}

fn startup_config() -> SketchConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) else {
        return SketchConfig::default();
    };
    match load_config(&path) {
        Ok(config) => {
            log::info!("loaded config from {}", path.display());
            config
        }
        Err(err) => {
            log::error!("failed to load config {}: {err}; using defaults", path.display());
            SketchConfig::default()
        }
    }
}

struct FibsphereApp {
    shared: SketchShared,
}

impl FibsphereApp {
    fn new(config: SketchConfig) -> Self {
        Self {
            shared: SketchShared::new(config),
        }
    }
}

impl eframe::App for FibsphereApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        fib_gui::theme::apply(ctx);

        egui::SidePanel::left("controls")
            .resizable(false)
            .exact_width(PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                fib_gui::draw_control_panel(ui, &self.shared.params);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(egui::Color32::WHITE))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    fib_gui::draw_sketch_canvas(ui, &self.shared);
                });
            });
    }

    fn on_exit(&mut self, gl: Option<&eframe::glow::Context>) {
        if let Some(gl) = gl {
            self.shared.teardown(gl);
        }
    }
}
