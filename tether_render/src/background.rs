// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera passthrough background.

use core::fmt;

use tether_core::uv::TextureCoordinateSet;

use crate::error::RenderError;
use crate::gl::{self, GlApi, consts};
use crate::shaders::{self, names};
use crate::state::RendererState;

const RENDERER: &str = "background";

/// Full-screen triangle strip in clip space.
const QUAD_POSITIONS: [[f32; 3]; 4] = [
    [-1.0, -1.0, 0.0],
    [1.0, -1.0, 0.0],
    [-1.0, 1.0, 0.0],
    [1.0, 1.0, 0.0],
];

/// GPU resources of a ready [`BackgroundRenderer`].
pub struct BackgroundResources<G: GlApi> {
    program: G::Program,
    camera_texture: G::Texture,
    position_buffer: G::Buffer,
    uv_buffer: G::Buffer,
    a_position: u32,
    a_uv: u32,
    u_texture: G::UniformLocation,
}

impl<G: GlApi> fmt::Debug for BackgroundResources<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundResources")
            .field("program", &self.program)
            .field("camera_texture", &self.camera_texture)
            .finish_non_exhaustive()
    }
}

/// Draws the camera image behind everything else.
///
/// Owns the external camera texture the tracking runtime streams into; the
/// texture's GL name is available through
/// [`camera_texture_name`](Self::camera_texture_name) once the renderer is
/// ready.
pub struct BackgroundRenderer<G: GlApi> {
    state: RendererState<BackgroundResources<G>>,
    texture_unit: u32,
}

impl<G: GlApi> fmt::Debug for BackgroundRenderer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundRenderer")
            .field("state", &self.state)
            .field("texture_unit", &self.texture_unit)
            .finish()
    }
}

impl<G: GlApi> BackgroundRenderer<G> {
    /// Creates an uninitialized renderer that will sample the camera texture
    /// on `texture_unit`.
    #[must_use]
    pub const fn new(texture_unit: u32) -> Self {
        Self {
            state: RendererState::Uninitialized,
            texture_unit,
        }
    }

    /// Returns `true` once GPU resources exist.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &RendererState<BackgroundResources<G>> {
        &self.state
    }

    /// GL name of the camera texture, for handing to the tracking runtime.
    #[must_use]
    pub fn camera_texture_name(&self, gl: &G) -> Option<u32> {
        self.state
            .resources()
            .map(|r| gl.texture_name(r.camera_texture))
    }

    /// Links the program, allocates the camera texture and uploads the quad.
    ///
    /// Any existing resources are released first. On error nothing is left
    /// allocated and the renderer stays uninitialized.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if any resource cannot be created.
    pub fn create(&mut self, gl: &G) -> Result<(), RenderError> {
        self.destroy(gl);
        let program = gl::link(
            gl,
            RENDERER,
            shaders::BACKGROUND_VERTEX,
            shaders::BACKGROUND_FRAGMENT,
        )?;
        match Self::create_with_program(gl, program) {
            Ok(resources) => {
                log::info!(target: "tether::render", "background renderer ready");
                self.state = RendererState::Ready(resources);
                Ok(())
            }
            Err(e) => {
                gl.delete_program(program);
                Err(e)
            }
        }
    }

    fn create_with_program(
        gl: &G,
        program: G::Program,
    ) -> Result<BackgroundResources<G>, RenderError> {
        let a_position = gl::attrib(gl, program, RENDERER, names::VERTEX)?;
        let a_uv = gl::attrib(gl, program, RENDERER, names::TEXTURE_COORDS)?;
        let u_texture = gl::uniform(gl, program, RENDERER, names::TEXTURE)?;

        let camera_texture = gl
            .create_texture()
            .map_err(|log| RenderError::Allocation {
                renderer: RENDERER,
                resource: "camera texture",
                log,
            })?;
        gl.bind_texture(consts::TEXTURE_EXTERNAL_OES, Some(camera_texture));
        for (parameter, value) in [
            (consts::TEXTURE_MIN_FILTER, consts::LINEAR),
            (consts::TEXTURE_MAG_FILTER, consts::LINEAR),
            (consts::TEXTURE_WRAP_S, consts::CLAMP_TO_EDGE),
            (consts::TEXTURE_WRAP_T, consts::CLAMP_TO_EDGE),
        ] {
            gl.tex_parameter_i32(
                consts::TEXTURE_EXTERNAL_OES,
                parameter,
                i32::try_from(value).unwrap_or_default(),
            );
        }
        gl.bind_texture(consts::TEXTURE_EXTERNAL_OES, None);

        let position_buffer = match gl::static_buffer(
            gl,
            RENDERER,
            bytemuck::cast_slice(QUAD_POSITIONS.as_flattened()),
        ) {
            Ok(b) => b,
            Err(e) => {
                gl.delete_texture(camera_texture);
                return Err(e);
            }
        };
        let uv_buffer = match gl.create_buffer() {
            Ok(b) => b,
            Err(log) => {
                gl.delete_buffer(position_buffer);
                gl.delete_texture(camera_texture);
                return Err(RenderError::Allocation {
                    renderer: RENDERER,
                    resource: "uv buffer",
                    log,
                });
            }
        };

        Ok(BackgroundResources {
            program,
            camera_texture,
            position_buffer,
            uv_buffer,
            a_position,
            a_uv,
            u_texture,
        })
    }

    /// Releases all GPU resources. A no-op when uninitialized.
    pub fn destroy(&mut self, gl: &G) {
        if let Some(r) = self.state.take() {
            gl.delete_buffer(r.uv_buffer);
            gl.delete_buffer(r.position_buffer);
            gl.delete_texture(r.camera_texture);
            gl.delete_program(r.program);
            log::info!(target: "tether::render", "background renderer released");
        }
    }

    /// Draws the camera image with `uvs`.
    ///
    /// Returns `false` without issuing GL calls when the renderer is not
    /// ready or `uvs` is not initialized yet.
    pub fn draw(&self, gl: &G, uvs: &TextureCoordinateSet) -> bool {
        let Some(r) = self.state.resources() else {
            return false;
        };
        if !uvs.is_initialized() {
            return false;
        }
        let uv_floats = uvs.uvs().to_floats();

        gl.depth_mask(false);
        gl.use_program(Some(r.program));

        gl.active_texture(self.texture_unit);
        gl.bind_texture(consts::TEXTURE_EXTERNAL_OES, Some(r.camera_texture));
        gl.uniform_1_i32(
            &r.u_texture,
            i32::try_from(self.texture_unit).unwrap_or_default(),
        );

        gl.bind_buffer(consts::ARRAY_BUFFER, Some(r.position_buffer));
        gl.vertex_attrib_pointer_f32(r.a_position, 3, 0, 0);
        gl.enable_vertex_attrib_array(r.a_position);

        gl.bind_buffer(consts::ARRAY_BUFFER, Some(r.uv_buffer));
        gl.buffer_data(
            consts::ARRAY_BUFFER,
            bytemuck::cast_slice(&uv_floats[..]),
            consts::DYNAMIC_DRAW,
        );
        gl.vertex_attrib_pointer_f32(r.a_uv, 2, 0, 0);
        gl.enable_vertex_attrib_array(r.a_uv);

        gl.draw_arrays(consts::TRIANGLE_STRIP, 0, 4);

        gl.disable_vertex_attrib_array(r.a_uv);
        gl.disable_vertex_attrib_array(r.a_position);
        gl.bind_buffer(consts::ARRAY_BUFFER, None);
        gl.bind_texture(consts::TEXTURE_EXTERNAL_OES, None);
        gl.use_program(None);
        gl.depth_mask(true);
        true
    }
}

#[cfg(test)]
mod tests {
    use tether_core::geometry::DisplayRotation;
    use tether_core::uv::UvQuad;

    use super::*;
    use crate::fake_gl::{Call, FakeGl};

    fn ready(gl: &FakeGl) -> BackgroundRenderer<FakeGl> {
        let mut bg = BackgroundRenderer::new(1);
        bg.create(gl).unwrap();
        let _ = gl.take_calls();
        bg
    }

    #[test]
    fn uninitialized_draw_issues_no_calls() {
        let gl = FakeGl::default();
        let bg = BackgroundRenderer::<FakeGl>::new(0);
        let uvs = TextureCoordinateSet::computed(UvQuad::CANONICAL);
        assert!(!bg.draw(&gl, &uvs));
        assert!(gl.take_calls().is_empty());
    }

    #[test]
    fn uninitialized_uvs_skip_the_draw() {
        let gl = FakeGl::default();
        let bg = ready(&gl);
        assert!(!bg.draw(&gl, &TextureCoordinateSet::UNINITIALIZED));
        assert!(gl.take_calls().is_empty());
    }

    #[test]
    fn create_configures_external_texture() {
        let gl = FakeGl::default();
        let mut bg = BackgroundRenderer::new(1);
        bg.create(&gl).unwrap();
        let calls = gl.take_calls();
        assert!(calls.contains(&Call::TexParameter(
            consts::TEXTURE_EXTERNAL_OES,
            consts::TEXTURE_MIN_FILTER,
            0x2601
        )));
        assert!(calls.contains(&Call::TexParameter(
            consts::TEXTURE_EXTERNAL_OES,
            consts::TEXTURE_MAG_FILTER,
            0x2601
        )));
        // The fixed quad is uploaded once, at creation.
        assert!(calls.contains(&Call::BufferData(QUAD_POSITIONS.as_flattened().to_vec())));
        assert!(bg.camera_texture_name(&gl).is_some());
    }

    #[test]
    fn draw_is_a_depthless_strip_with_current_uvs() {
        let gl = FakeGl::default();
        let bg = ready(&gl);
        let quad = UvQuad::CANONICAL.rotated(DisplayRotation::Deg90);
        assert!(bg.draw(&gl, &TextureCoordinateSet::computed(quad)));

        let calls = gl.take_calls();
        assert_eq!(calls.first(), Some(&Call::DepthMask(false)));
        assert_eq!(calls.last(), Some(&Call::DepthMask(true)));
        assert!(calls.contains(&Call::ActiveTexture(1)));
        assert!(calls.contains(&Call::Uniform1i("texture", 1)));
        assert!(calls.contains(&Call::BufferData(quad.to_floats().to_vec())));
        assert!(calls.contains(&Call::Draw(consts::TRIANGLE_STRIP, 0, 4)));
    }

    #[test]
    fn destroy_releases_and_returns_to_uninitialized() {
        let gl = FakeGl::default();
        let mut bg = ready(&gl);
        bg.destroy(&gl);
        assert!(!bg.is_ready());
        let calls = gl.take_calls();
        assert_eq!(
            calls
                .iter()
                .filter(|c| matches!(
                    c,
                    Call::DeleteBuffer(_) | Call::DeleteTexture(_) | Call::DeleteProgram(_)
                ))
                .count(),
            4
        );
        // Second destroy is a no-op.
        bg.destroy(&gl);
        assert!(gl.take_calls().is_empty());
    }

    #[test]
    fn link_failure_is_reported() {
        let gl = FakeGl {
            fail_link: Some("background"),
            ..FakeGl::default()
        };
        let mut bg = BackgroundRenderer::new(0);
        let err = bg.create(&gl).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ProgramLink {
                renderer: "background",
                ..
            }
        ));
        assert!(!bg.is_ready());
    }

    #[test]
    fn missing_uniform_deletes_the_program() {
        let gl = FakeGl {
            missing_uniform: Some("texture"),
            ..FakeGl::default()
        };
        let mut bg = BackgroundRenderer::new(0);
        assert_eq!(
            bg.create(&gl),
            Err(RenderError::MissingUniform {
                renderer: "background",
                name: "texture"
            })
        );
        assert!(gl.take_calls().contains(&Call::DeleteProgram(1)));
    }
}
