use glam::{Mat4, Vec3, Vec4Swizzles};
use std::f32::consts::PI;

/// Fixed sketch camera.
///
/// Sits on the +z axis at the distance where a 60 degree vertical field of
/// view exactly spans the canvas height at z = 0, so one world unit is one
/// pixel on the z = 0 plane. Screen y grows downward, as in canvas space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
}

impl Camera {
    pub const FOV_Y: f32 = PI / 3.0;

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn eye_distance(&self) -> f32 {
        (self.height / 2.0) / (PI / 6.0).tan()
    }

    pub fn near(&self) -> f32 {
        self.eye_distance() / 10.0
    }

    pub fn far(&self) -> f32 {
        self.eye_distance() * 10.0
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.eye_distance()), Vec3::ZERO, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        let flip_y = Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0));
        flip_y
            * Mat4::perspective_rh_gl(Self::FOV_Y, self.width / self.height, self.near(), self.far())
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Project a world point to normalized device coordinates.
    pub fn project(&self, world: Vec3) -> Vec3 {
        let clip = self.view_projection() * world.extend(1.0);
        clip.xyz() / clip.w
    }

    /// Pixel position (origin top-left) of a world point.
    pub fn to_screen(&self, world: Vec3) -> [f32; 2] {
        let ndc = self.project(world);
        [
            (ndc.x * 0.5 + 0.5) * self.width,
            (-ndc.y * 0.5 + 0.5) * self.height,
        ]
    }
}
