use glow::HasContext;

// ── Solid shaders (points + fade plane) ─────────────────────────────

pub const SOLID_VERTEX: &str = r#"#version 330 core

layout(location = 0) in vec3 a_pos;

uniform mat4 u_mvp;
uniform float u_point_size;

void main() {
    gl_Position = u_mvp * vec4(a_pos, 1.0);
    gl_PointSize = u_point_size;
}
"#;

pub const SOLID_FRAGMENT: &str = r#"#version 330 core

uniform vec4 u_color;
uniform int u_round_points;

out vec4 frag_color;

void main() {
    if (u_round_points == 1 && length(gl_PointCoord - vec2(0.5)) > 0.5) {
        discard;
    }
    // premultiplied output; the canvas target stores premultiplied colour
    frag_color = vec4(u_color.rgb * u_color.a, u_color.a);
}
"#;

// ── Stroke shader (closed loops, quad per segment) ──────────────────

pub const STROKE_VERTEX: &str = r#"#version 330 core

layout(location = 0) in vec3 a_pos;
layout(location = 1) in vec3 a_other;
layout(location = 2) in float a_perp;  // -1 or +1
layout(location = 3) in float a_along; // 0 or 1

uniform mat4 u_mvp;
uniform vec2 u_viewport;  // canvas size in pixels
uniform float u_weight;   // stroke width in pixels

void main() {
    vec4 clip_a = u_mvp * vec4(a_pos, 1.0);
    vec4 clip_b = u_mvp * vec4(a_other, 1.0);

    vec2 half_vp = u_viewport * 0.5;
    vec2 screen_a = clip_a.xy / clip_a.w * half_vp;
    vec2 screen_b = clip_b.xy / clip_b.w * half_vp;

    vec2 dir = screen_b - screen_a;
    float seg_len = length(dir);
    vec2 tang = seg_len > 0.0001 ? dir / seg_len : vec2(1.0, 0.0);
    vec2 norm = vec2(-tang.y, tang.x);

    // Square caps: extend half a stroke past each end so joints overlap
    vec2 offset = (norm * a_perp + tang * (a_along * 2.0 - 1.0)) * (u_weight * 0.5);

    vec4 clip = mix(clip_a, clip_b, a_along);
    clip.xy += offset / half_vp * clip.w;
    gl_Position = clip;
}
"#;

// ── Fullscreen quad shaders (canvas blit) ───────────────────────────

pub const FULLSCREEN_VERTEX: &str = r#"#version 330 core

layout(location = 0) in vec2 a_pos;
layout(location = 1) in vec2 a_uv;

out vec2 v_uv;

void main() {
    v_uv = a_uv;
    gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

pub const BLIT_FRAGMENT: &str = r#"#version 330 core

in vec2 v_uv;

uniform sampler2D u_canvas;

out vec4 frag_color;

void main() {
    frag_color = texture(u_canvas, v_uv);
}
"#;

/// Compile and link a vertex + fragment program.
pub fn compile_program(
    gl: &glow::Context,
    vert_src: &str,
    frag_src: &str,
) -> Result<glow::Program, String> {
    unsafe {
        let program = gl.create_program()?;

        let vert = gl.create_shader(glow::VERTEX_SHADER)?;
        gl.shader_source(vert, vert_src);
        gl.compile_shader(vert);
        if !gl.get_shader_compile_status(vert) {
            let log = gl.get_shader_info_log(vert);
            gl.delete_shader(vert);
            gl.delete_program(program);
            return Err(format!("Vertex shader compilation failed:\n{}", log));
        }

        let frag = gl.create_shader(glow::FRAGMENT_SHADER)?;
        gl.shader_source(frag, frag_src);
        gl.compile_shader(frag);
        if !gl.get_shader_compile_status(frag) {
            let log = gl.get_shader_info_log(frag);
            gl.delete_shader(vert);
            gl.delete_shader(frag);
            gl.delete_program(program);
            return Err(format!("Fragment shader compilation failed:\n{}", log));
        }

        gl.attach_shader(program, vert);
        gl.attach_shader(program, frag);
        gl.link_program(program);

        gl.delete_shader(vert);
        gl.delete_shader(frag);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(format!("Program linking failed:\n{}", log));
        }

        Ok(program)
    }
}

/// Look up a uniform that the program is known to declare.
pub fn uniform(
    gl: &glow::Context,
    program: glow::Program,
    name: &str,
) -> Result<glow::UniformLocation, String> {
    unsafe { gl.get_uniform_location(program, name) }
        .ok_or_else(|| format!("uniform {name} not found"))
}

/// View a float slice as bytes for buffer uploads.
pub fn cast_slice_f32(data: &[f32]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data))
    }
}
