use egui::Ui;
use fib_core::parameter::{
    LiveParameters, Mode, POINT_COUNT_RANGE, POINT_COUNT_STEP, SIZE_RANGE, SIZE_STEP, SPEED_RANGE,
    SPEED_STEP, TRAILS_RANGE, TRAILS_STEP, WOBBLE_RANGE, WOBBLE_STEP,
};

/// Draw the mode switch and the five sliders.
///
/// Every change goes straight into `params`; the render loop picks it up on
/// its next frame.
pub fn draw_control_panel(ui: &mut Ui, params: &LiveParameters) {
    let mut snapshot = params.load();

    ui.horizontal(|ui| {
        for mode in Mode::ALL {
            if ui
                .selectable_label(snapshot.mode == mode, mode.name())
                .clicked()
                && snapshot.mode != mode
            {
                snapshot.mode = mode;
                params.set_mode(mode);
            }
        }
    });

    ui.add_space(8.0);

    let points = egui::Slider::new(&mut snapshot.point_count, POINT_COUNT_RANGE)
        .text("POINTS")
        .step_by(POINT_COUNT_STEP as f64);
    if ui.add(points).changed() {
        params.set_point_count(snapshot.point_count);
    }

    let speed = egui::Slider::new(&mut snapshot.speed, SPEED_RANGE)
        .text("SPEED")
        .step_by(SPEED_STEP);
    if ui.add(speed).changed() {
        params.set_speed(snapshot.speed);
    }

    let wobble = egui::Slider::new(&mut snapshot.wobble, WOBBLE_RANGE)
        .text("WOBBLE")
        .step_by(WOBBLE_STEP);
    if ui.add(wobble).changed() {
        params.set_wobble(snapshot.wobble);
    }

    let size = egui::Slider::new(&mut snapshot.size, SIZE_RANGE)
        .text("SIZE")
        .step_by(SIZE_STEP);
    if ui.add(size).changed() {
        params.set_size(snapshot.size);
    }

    let trails = egui::Slider::new(&mut snapshot.trails, TRAILS_RANGE)
        .text("TRAILS")
        .step_by(TRAILS_STEP);
    if ui.add(trails).changed() {
        params.set_trails(snapshot.trails);
    }
}
