use fib_core::DrawCommand;
use glow::HasContext;
use std::num::NonZeroU32;

use crate::camera::Camera;
use crate::fbo::RenderTarget;
use crate::persistence::FadePass;
use crate::quad::FullscreenQuad;
use crate::settings::RenderSettings;
use crate::shaders;
use crate::stroke_renderer::StrokeRenderer;

/// Upper bound on one point cloud; matches the largest point count control.
const MAX_POINTS: usize = 2000;
const MAX_LOOP_SEGMENTS: usize = 1024;

/// Saved OpenGL state so we can restore the host's GL context after custom rendering.
struct SavedGlState {
    framebuffer: Option<glow::Framebuffer>,
    viewport: [i32; 4],
    blend_enabled: bool,
    blend_src_rgb: i32,
    blend_dst_rgb: i32,
    blend_src_alpha: i32,
    blend_dst_alpha: i32,
    blend_eq_rgb: i32,
    blend_eq_alpha: i32,
    depth_test_enabled: bool,
    depth_mask: bool,
    program_point_size: bool,
    program: Option<glow::Program>,
    vao: Option<glow::VertexArray>,
    scissor_enabled: bool,
    cull_enabled: bool,
    active_texture: i32,
    bound_texture: Option<glow::Texture>,
}

impl SavedGlState {
    unsafe fn save(gl: &glow::Context) -> Self {
        let id = |pname: u32| NonZeroU32::new(gl.get_parameter_i32(pname) as u32);

        let mut viewport = [0i32; 4];
        gl.get_parameter_i32_slice(glow::VIEWPORT, &mut viewport);

        let active_texture = gl.get_parameter_i32(glow::ACTIVE_TEXTURE);
        gl.active_texture(glow::TEXTURE0);
        let bound_texture = id(glow::TEXTURE_BINDING_2D).map(glow::NativeTexture);
        gl.active_texture(active_texture as u32);

        Self {
            framebuffer: id(glow::FRAMEBUFFER_BINDING).map(glow::NativeFramebuffer),
            viewport,
            blend_enabled: gl.is_enabled(glow::BLEND),
            blend_src_rgb: gl.get_parameter_i32(glow::BLEND_SRC_RGB),
            blend_dst_rgb: gl.get_parameter_i32(glow::BLEND_DST_RGB),
            blend_src_alpha: gl.get_parameter_i32(glow::BLEND_SRC_ALPHA),
            blend_dst_alpha: gl.get_parameter_i32(glow::BLEND_DST_ALPHA),
            blend_eq_rgb: gl.get_parameter_i32(glow::BLEND_EQUATION_RGB),
            blend_eq_alpha: gl.get_parameter_i32(glow::BLEND_EQUATION_ALPHA),
            depth_test_enabled: gl.is_enabled(glow::DEPTH_TEST),
            depth_mask: gl.get_parameter_i32(glow::DEPTH_WRITEMASK) != 0,
            program_point_size: gl.is_enabled(glow::PROGRAM_POINT_SIZE),
            program: id(glow::CURRENT_PROGRAM).map(glow::NativeProgram),
            vao: id(glow::VERTEX_ARRAY_BINDING).map(glow::NativeVertexArray),
            scissor_enabled: gl.is_enabled(glow::SCISSOR_TEST),
            cull_enabled: gl.is_enabled(glow::CULL_FACE),
            active_texture,
            bound_texture,
        }
    }

    unsafe fn restore(&self, gl: &glow::Context) {
        let set = |cap: u32, on: bool| if on { gl.enable(cap) } else { gl.disable(cap) };

        gl.bind_framebuffer(glow::FRAMEBUFFER, self.framebuffer);
        gl.viewport(self.viewport[0], self.viewport[1], self.viewport[2], self.viewport[3]);

        set(glow::BLEND, self.blend_enabled);
        gl.blend_func_separate(
            self.blend_src_rgb as u32,
            self.blend_dst_rgb as u32,
            self.blend_src_alpha as u32,
            self.blend_dst_alpha as u32,
        );
        gl.blend_equation_separate(self.blend_eq_rgb as u32, self.blend_eq_alpha as u32);

        set(glow::DEPTH_TEST, self.depth_test_enabled);
        gl.depth_mask(self.depth_mask);
        set(glow::PROGRAM_POINT_SIZE, self.program_point_size);
        set(glow::SCISSOR_TEST, self.scissor_enabled);
        set(glow::CULL_FACE, self.cull_enabled);

        gl.use_program(self.program);
        gl.bind_vertex_array(self.vao);

        gl.active_texture(glow::TEXTURE0);
        gl.bind_texture(glow::TEXTURE_2D, self.bound_texture);
        gl.active_texture(self.active_texture as u32);
    }
}

/// GPU objects owned by one live renderer.
struct GlResources {
    canvas: RenderTarget,
    fade: FadePass,
    strokes: StrokeRenderer,
    quad: FullscreenQuad,
    blit_program: glow::Program,
    loc_blit_canvas: glow::UniformLocation,
}

impl GlResources {
    fn new(gl: &glow::Context, width: u32, height: u32) -> Result<Self, String> {
        let blit_program = shaders::compile_program(gl, shaders::FULLSCREEN_VERTEX, shaders::BLIT_FRAGMENT)?;
        Ok(Self {
            canvas: RenderTarget::new(gl, width, height)?,
            fade: FadePass::new(gl)?,
            strokes: StrokeRenderer::new(gl, MAX_POINTS, MAX_LOOP_SEGMENTS)?,
            quad: FullscreenQuad::new(gl)?,
            loc_blit_canvas: shaders::uniform(gl, blit_program, "u_canvas")?,
            blit_program,
        })
    }

    fn destroy(&self, gl: &glow::Context) {
        self.canvas.destroy(gl);
        self.fade.destroy(gl);
        self.strokes.destroy(gl);
        self.quad.destroy(gl);
        unsafe { gl.delete_program(self.blit_program); }
    }
}

/// Executes per-frame draw lists on a persistent offscreen canvas and shows
/// the result inside the host's viewport.
pub struct SketchRenderer {
    resources: Option<GlResources>,
    settings: RenderSettings,
}

impl SketchRenderer {
    /// Create a new renderer. Must be called with a valid GL context.
    pub fn new(gl: &glow::Context, settings: RenderSettings) -> Result<Self, String> {
        let [w, h] = settings.canvas_size;
        let resources = unsafe {
            let saved = SavedGlState::save(gl);
            let resources = GlResources::new(gl, w, h);
            saved.restore(gl);
            resources?
        };
        log::info!("sketch renderer initialized ({}x{})", w, h);
        Ok(Self { resources: Some(resources), settings })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn is_destroyed(&self) -> bool {
        self.resources.is_none()
    }

    /// Run one frame's draw list and composite the canvas into `viewport`.
    ///
    /// `viewport` is [x, y, width, height] in physical pixels. The canvas is
    /// resized (and its trails dropped) when the physical size changes.
    pub fn render(&mut self, gl: &glow::Context, commands: &[DrawCommand], viewport: [i32; 4]) {
        let Some(res) = self.resources.as_mut() else {
            log::warn!("render called on a destroyed sketch renderer");
            return;
        };

        let width = viewport[2].max(1) as u32;
        let height = viewport[3].max(1) as u32;

        unsafe {
            // 1. Save host GL state
            let saved = SavedGlState::save(gl);

            if !res.canvas.matches(width, height) {
                match RenderTarget::new(gl, width, height) {
                    Ok(canvas) => {
                        res.canvas.destroy(gl);
                        res.canvas = canvas;
                        log::debug!("sketch canvas resized to {}x{}", width, height);
                    }
                    Err(err) => log::error!("failed to resize sketch canvas: {err}"),
                }
            }

            // 2. Draw into the persistent canvas
            res.canvas.bind(gl);
            gl.disable(glow::SCISSOR_TEST);
            gl.disable(glow::CULL_FACE);
            gl.enable(glow::DEPTH_TEST);
            gl.depth_func(glow::LESS);
            gl.depth_mask(true);
            gl.enable(glow::PROGRAM_POINT_SIZE);
            gl.enable(glow::BLEND);
            gl.blend_equation(glow::FUNC_ADD);
            gl.blend_func(glow::ONE, glow::ONE_MINUS_SRC_ALPHA);

            // The camera is framed for the logical canvas; physical pixels
            // only scale stroke widths.
            let [logical_w, logical_h] = self.settings.canvas_size;
            let camera = Camera::new(logical_w as f32, logical_h as f32);
            let pixel_scale = width as f32 / logical_w.max(1) as f32;
            let view_projection = camera.view_projection();
            let color = self.settings.stroke.color_f32();
            let weight = self.settings.stroke.weight * pixel_scale;

            for command in commands {
                match command {
                    DrawCommand::ClearColor => res.fade.clear(gl),
                    DrawCommand::FadePlane { opacity } => {
                        res.fade.fade(gl, &camera, self.settings.fade_color, *opacity)
                    }
                    DrawCommand::ClearDepth => res.fade.clear_depth(gl),
                    DrawCommand::Points { model, points } => {
                        let mvp = view_projection * *model;
                        res.strokes.draw_points(gl, &mvp, points, color, weight);
                    }
                    DrawCommand::LineLoop { model, points } => {
                        let mvp = view_projection * *model;
                        res.strokes.draw_loop(
                            gl,
                            &mvp,
                            points,
                            color,
                            weight,
                            [width as f32, height as f32],
                        );
                    }
                }
            }

            // 3. Back to the host framebuffer, blit the canvas into our rect
            gl.bind_framebuffer(glow::FRAMEBUFFER, saved.framebuffer);
            gl.viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
            gl.disable(glow::DEPTH_TEST);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::ONE, glow::ONE_MINUS_SRC_ALPHA);

            gl.use_program(Some(res.blit_program));
            gl.active_texture(glow::TEXTURE0);
            gl.bind_texture(glow::TEXTURE_2D, Some(res.canvas.texture));
            gl.uniform_1_i32(Some(&res.loc_blit_canvas), 0);
            res.quad.draw(gl);
            gl.use_program(None);

            // 4. Restore all GL state
            saved.restore(gl);
        }
    }

    /// Release every GPU object. Safe to call more than once.
    pub fn destroy(&mut self, gl: &glow::Context) {
        if let Some(res) = self.resources.take() {
            res.destroy(gl);
            log::info!("sketch renderer destroyed");
        }
    }
}
