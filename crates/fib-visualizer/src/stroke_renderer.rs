use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::shaders::{self, cast_slice_f32};

/// Floats per stroke vertex: pos(3) + other(3) + perp(1) + along(1).
const STROKE_FLOATS: usize = 8;

/// Draws the shape primitives: round points, and closed loops as screen-space
/// quads of constant pixel width.
pub struct StrokeRenderer {
    point_program: glow::Program,
    loc_point_mvp: glow::UniformLocation,
    loc_point_size: glow::UniformLocation,
    loc_point_color: glow::UniformLocation,
    loc_point_round: glow::UniformLocation,
    point_vao: glow::VertexArray,
    point_vbo: glow::Buffer,
    max_points: usize,

    loop_program: glow::Program,
    loc_loop_mvp: glow::UniformLocation,
    loc_loop_viewport: glow::UniformLocation,
    loc_loop_weight: glow::UniformLocation,
    loc_loop_color: glow::UniformLocation,
    loc_loop_round: glow::UniformLocation,
    loop_vao: glow::VertexArray,
    loop_vbo: glow::Buffer,
    loop_ibo: glow::Buffer,
    max_segments: usize,
}

impl StrokeRenderer {
    pub fn new(gl: &glow::Context, max_points: usize, max_segments: usize) -> Result<Self, String> {
        let point_program = shaders::compile_program(gl, shaders::SOLID_VERTEX, shaders::SOLID_FRAGMENT)?;
        let loop_program = shaders::compile_program(gl, shaders::STROKE_VERTEX, shaders::SOLID_FRAGMENT)?;

        let loc_point_mvp = shaders::uniform(gl, point_program, "u_mvp")?;
        let loc_point_size = shaders::uniform(gl, point_program, "u_point_size")?;
        let loc_point_color = shaders::uniform(gl, point_program, "u_color")?;
        let loc_point_round = shaders::uniform(gl, point_program, "u_round_points")?;

        let loc_loop_mvp = shaders::uniform(gl, loop_program, "u_mvp")?;
        let loc_loop_viewport = shaders::uniform(gl, loop_program, "u_viewport")?;
        let loc_loop_weight = shaders::uniform(gl, loop_program, "u_weight")?;
        let loc_loop_color = shaders::uniform(gl, loop_program, "u_color")?;
        let loc_loop_round = shaders::uniform(gl, loop_program, "u_round_points")?;

        let f32_size = std::mem::size_of::<f32>();

        unsafe {
            // Points: one vec3 per vertex
            let point_vao = gl.create_vertex_array()?;
            let point_vbo = gl.create_buffer()?;
            gl.bind_vertex_array(Some(point_vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(point_vbo));
            gl.buffer_data_size(glow::ARRAY_BUFFER, (max_points * 3 * f32_size) as i32, glow::DYNAMIC_DRAW);
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, 3 * f32_size as i32, 0);

            // Loops: 4 vertices and 6 indices per segment
            let loop_vao = gl.create_vertex_array()?;
            let loop_vbo = gl.create_buffer()?;
            let loop_ibo = gl.create_buffer()?;
            gl.bind_vertex_array(Some(loop_vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(loop_vbo));
            gl.buffer_data_size(
                glow::ARRAY_BUFFER,
                (max_segments * 4 * STROKE_FLOATS * f32_size) as i32,
                glow::DYNAMIC_DRAW,
            );

            let stride = (STROKE_FLOATS * f32_size) as i32;
            // a_pos: location 0
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);
            // a_other: location 1
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 3, glow::FLOAT, false, stride, 12);
            // a_perp: location 2
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 1, glow::FLOAT, false, stride, 24);
            // a_along: location 3
            gl.enable_vertex_attrib_array(3);
            gl.vertex_attrib_pointer_f32(3, 1, glow::FLOAT, false, stride, 28);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(loop_ibo));
            gl.buffer_data_size(
                glow::ELEMENT_ARRAY_BUFFER,
                (max_segments * 6 * std::mem::size_of::<u32>()) as i32,
                glow::DYNAMIC_DRAW,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                point_program,
                loc_point_mvp,
                loc_point_size,
                loc_point_color,
                loc_point_round,
                point_vao,
                point_vbo,
                max_points,
                loop_program,
                loc_loop_mvp,
                loc_loop_viewport,
                loc_loop_weight,
                loc_loop_color,
                loc_loop_round,
                loop_vao,
                loop_vbo,
                loop_ibo,
                max_segments,
            })
        }
    }

    /// Draw disconnected round points of diameter `weight` pixels.
    pub fn draw_points(&self, gl: &glow::Context, mvp: &Mat4, points: &[Vec3], color: [f32; 3], weight: f32) {
        if points.is_empty() {
            return;
        }
        let n = points.len().min(self.max_points);
        if n < points.len() {
            log::warn!("point cloud truncated from {} to {} vertices", points.len(), n);
        }
        let data = flatten_points(&points[..n]);

        unsafe {
            gl.use_program(Some(self.point_program));
            gl.uniform_matrix_4_f32_slice(Some(&self.loc_point_mvp), false, &mvp.to_cols_array());
            gl.uniform_1_f32(Some(&self.loc_point_size), weight);
            gl.uniform_4_f32(Some(&self.loc_point_color), color[0], color[1], color[2], 1.0);
            gl.uniform_1_i32(Some(&self.loc_point_round), 1);

            gl.bind_vertex_array(Some(self.point_vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.point_vbo));
            gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, cast_slice_f32(&data));

            gl.draw_arrays(glow::POINTS, 0, n as i32);

            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    /// Draw a closed loop through `points` with a `weight`-pixel stroke.
    pub fn draw_loop(
        &self,
        gl: &glow::Context,
        mvp: &Mat4,
        points: &[Vec3],
        color: [f32; 3],
        weight: f32,
        viewport: [f32; 2],
    ) {
        let (vertices, indices) = build_loop_vertices(points, self.max_segments);
        if indices.is_empty() {
            return;
        }

        unsafe {
            gl.use_program(Some(self.loop_program));
            gl.uniform_matrix_4_f32_slice(Some(&self.loc_loop_mvp), false, &mvp.to_cols_array());
            gl.uniform_2_f32(Some(&self.loc_loop_viewport), viewport[0], viewport[1]);
            gl.uniform_1_f32(Some(&self.loc_loop_weight), weight);
            gl.uniform_4_f32(Some(&self.loc_loop_color), color[0], color[1], color[2], 1.0);
            gl.uniform_1_i32(Some(&self.loc_loop_round), 0);

            gl.bind_vertex_array(Some(self.loop_vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.loop_vbo));
            gl.buffer_sub_data_u8_slice(glow::ARRAY_BUFFER, 0, cast_slice_f32(&vertices));

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.loop_ibo));
            gl.buffer_sub_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, 0, cast_slice_u32(&indices));

            gl.draw_elements(glow::TRIANGLES, indices.len() as i32, glow::UNSIGNED_INT, 0);

            gl.bind_vertex_array(None);
            gl.use_program(None);
        }
    }

    pub fn destroy(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_program(self.point_program);
            gl.delete_vertex_array(self.point_vao);
            gl.delete_buffer(self.point_vbo);
            gl.delete_program(self.loop_program);
            gl.delete_vertex_array(self.loop_vao);
            gl.delete_buffer(self.loop_vbo);
            gl.delete_buffer(self.loop_ibo);
        }
    }
}

/// Pack points as tightly laid out xyz floats.
pub fn flatten_points(points: &[Vec3]) -> Vec<f32> {
    points.iter().flat_map(|p| p.to_array()).collect()
}

/// Build quad-per-segment vertex and index data for a closed loop.
///
/// A loop of `n >= 2` points has `n` segments, the last joining `points[n-1]`
/// back to `points[0]`. Fewer than two points produce nothing.
pub fn build_loop_vertices(points: &[Vec3], max_segments: usize) -> (Vec<f32>, Vec<u32>) {
    let n = points.len();
    if n < 2 {
        return (Vec::new(), Vec::new());
    }

    let num_segments = n.min(max_segments);
    let mut vertices = Vec::with_capacity(num_segments * 4 * STROKE_FLOATS);
    let mut indices = Vec::with_capacity(num_segments * 6);

    for i in 0..num_segments {
        let a = points[i];
        let b = points[(i + 1) % n];
        let base = (i * 4) as u32;

        // (perp, along) corners: start -1, start +1, end +1, end -1
        for (perp, along) in [(-1.0, 0.0), (1.0, 0.0), (1.0, 1.0), (-1.0, 1.0)] {
            vertices.extend_from_slice(&[a.x, a.y, a.z, b.x, b.y, b.z, perp, along]);
        }

        // Two triangles
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    (vertices, indices)
}

fn cast_slice_u32(data: &[u32]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data)) }
}
