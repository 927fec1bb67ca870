use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::camera::Camera;
use crate::quad::UnitPlane;
use crate::shaders;

/// Distance of the fade plane behind the scene origin, in world units.
pub const FADE_PLANE_OFFSET: f32 = 1.0;

/// Trail compositing: either wipes the canvas or lays a translucent plane over
/// the previous frame, then resets depth for the frame about to be drawn.
pub struct FadePass {
    program: glow::Program,
    plane: UnitPlane,
    loc_mvp: glow::UniformLocation,
    loc_color: glow::UniformLocation,
    loc_point_size: glow::UniformLocation,
    loc_round: glow::UniformLocation,
}

impl FadePass {
    pub fn new(gl: &glow::Context) -> Result<Self, String> {
        let program = shaders::compile_program(gl, shaders::SOLID_VERTEX, shaders::SOLID_FRAGMENT)?;

        Ok(Self {
            loc_mvp: shaders::uniform(gl, program, "u_mvp")?,
            loc_color: shaders::uniform(gl, program, "u_color")?,
            loc_point_size: shaders::uniform(gl, program, "u_point_size")?,
            loc_round: shaders::uniform(gl, program, "u_round_points")?,
            plane: UnitPlane::new(gl)?,
            program,
        })
    }

    /// Erase colour and depth of the bound canvas.
    pub fn clear(&self, gl: &glow::Context) {
        unsafe {
            gl.clear_color(0.0, 0.0, 0.0, 0.0);
            gl.clear_depth_f32(1.0);
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    /// Blend a `2w × 2h` plane of `color` just behind the origin over the
    /// previous frame. `opacity` is on a 0..255 scale.
    ///
    /// The plane ignores the previous frame's depth, otherwise old geometry
    /// would sit in front of it and never fade.
    pub fn fade(&self, gl: &glow::Context, camera: &Camera, color: [f32; 3], opacity: f32) {
        let alpha = (opacity / 255.0).clamp(0.0, 1.0);
        let mvp = camera.view_projection() * fade_plane_model(camera);

        unsafe {
            gl.use_program(Some(self.program));
            gl.uniform_matrix_4_f32_slice(Some(&self.loc_mvp), false, &mvp.to_cols_array());
            gl.uniform_4_f32(Some(&self.loc_color), color[0], color[1], color[2], alpha);
            gl.uniform_1_f32(Some(&self.loc_point_size), 1.0);
            gl.uniform_1_i32(Some(&self.loc_round), 0);

            gl.disable(glow::DEPTH_TEST);
            self.plane.draw(gl);
            gl.enable(glow::DEPTH_TEST);

            gl.use_program(None);
        }
    }

    /// Reset depth so nothing in the new frame is hidden by the last one.
    pub fn clear_depth(&self, gl: &glow::Context) {
        unsafe {
            gl.clear_depth_f32(1.0);
            gl.clear(glow::DEPTH_BUFFER_BIT);
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe { gl.delete_program(self.program); }
        self.plane.destroy(gl);
    }
}

/// Placement of the unit plane: twice the canvas in each direction, pushed
/// slightly behind the origin.
pub fn fade_plane_model(camera: &Camera) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.0, -FADE_PLANE_OFFSET))
        * Mat4::from_scale(Vec3::new(camera.width * 2.0, camera.height * 2.0, 1.0))
}
