// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! GLES backend for tether.
//!
//! [`GlowContext`] implements [`GlApi`] on top of a [`glow::Context`], so the
//! `tether_render` renderers can drive a real GLES 2.0+ context with
//! `GL_OES_EGL_image_external` support (the extension the camera texture
//! needs).
//!
//! # Safety
//!
//! A [`GlowContext`] must only be used on the thread where its context is
//! current, and only while it is current. Constructing one is `unsafe` for
//! that reason; every [`GlApi`] call after that is safe to make from the
//! render thread.

#![expect(
    unsafe_code,
    reason = "glow's HasContext methods are unsafe; soundness rests on the context being current"
)]

use core::fmt;

use glow::HasContext;
use tether_render::GlApi;

/// A [`glow::Context`] exposed through [`GlApi`].
pub struct GlowContext {
    gl: glow::Context,
}

impl fmt::Debug for GlowContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowContext").finish_non_exhaustive()
    }
}

impl GlowContext {
    /// Wraps a loaded context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as the returned
    /// value is used, and the value must not be sent to another thread.
    #[must_use]
    pub unsafe fn new(gl: glow::Context) -> Self {
        Self { gl }
    }

    /// The wrapped context, for drawing anything tether does not.
    #[must_use]
    pub fn inner(&self) -> &glow::Context {
        &self.gl
    }

    fn compile(&self, label: &str, kind: u32, src: &str) -> Result<glow::Shader, String> {
        // SAFETY: the context is current (construction contract).
        unsafe {
            let shader = self.gl.create_shader(kind)?;
            self.gl.shader_source(shader, src);
            self.gl.compile_shader(shader);
            if self.gl.get_shader_compile_status(shader) {
                Ok(shader)
            } else {
                let log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                Err(format!("{label}: shader compile failed: {log}"))
            }
        }
    }
}

impl GlApi for GlowContext {
    type Program = glow::Program;
    type Texture = glow::Texture;
    type Buffer = glow::Buffer;
    type UniformLocation = glow::UniformLocation;

    fn link_program(
        &self,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<glow::Program, String> {
        let vs = self.compile(label, glow::VERTEX_SHADER, vertex_src)?;
        let fs = match self.compile(label, glow::FRAGMENT_SHADER, fragment_src) {
            Ok(fs) => fs,
            Err(e) => {
                // SAFETY: the context is current.
                unsafe { self.gl.delete_shader(vs) };
                return Err(e);
            }
        };
        // SAFETY: the context is current; both shaders were created on it.
        unsafe {
            let program = match self.gl.create_program() {
                Ok(p) => p,
                Err(e) => {
                    self.gl.delete_shader(vs);
                    self.gl.delete_shader(fs);
                    return Err(e);
                }
            };
            self.gl.attach_shader(program, vs);
            self.gl.attach_shader(program, fs);
            self.gl.link_program(program);
            let linked = self.gl.get_program_link_status(program);
            self.gl.detach_shader(program, vs);
            self.gl.detach_shader(program, fs);
            self.gl.delete_shader(vs);
            self.gl.delete_shader(fs);
            if linked {
                log::debug!(target: "tether::gl", "{label}: program linked");
                Ok(program)
            } else {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                Err(log)
            }
        }
    }

    fn delete_program(&self, program: glow::Program) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.delete_program(program);
        }
    }

    fn use_program(&self, program: Option<glow::Program>) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.use_program(program);
        }
    }

    fn attrib_location(&self, program: glow::Program, name: &str) -> Option<u32> {
        // SAFETY: the context is current.
        unsafe { self.gl.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: glow::Program,
        name: &str,
    ) -> Option<glow::UniformLocation> {
        // SAFETY: the context is current.
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn create_texture(&self) -> Result<glow::Texture, String> {
        // SAFETY: the context is current.
        unsafe { self.gl.create_texture() }
    }

    fn delete_texture(&self, texture: glow::Texture) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.delete_texture(texture);
        }
    }

    fn texture_name(&self, texture: glow::Texture) -> u32 {
        texture.0.get()
    }

    fn active_texture(&self, unit: u32) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
        }
    }

    fn bind_texture(&self, target: u32, texture: Option<glow::Texture>) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.bind_texture(target, texture);
        }
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.tex_parameter_i32(target, parameter, value);
        }
    }

    fn create_buffer(&self) -> Result<glow::Buffer, String> {
        // SAFETY: the context is current.
        unsafe { self.gl.create_buffer() }
    }

    fn delete_buffer(&self, buffer: glow::Buffer) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.delete_buffer(buffer);
        }
    }

    fn bind_buffer(&self, target: u32, buffer: Option<glow::Buffer>) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.bind_buffer(target, buffer);
        }
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        // SAFETY: the context is current; glow copies `data` before returning.
        unsafe {
            self.gl.buffer_data_u8_slice(target, data, usage);
        }
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.enable_vertex_attrib_array(index);
        }
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.disable_vertex_attrib_array(index);
        }
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        // SAFETY: the context is current and a buffer is bound to
        // GL_ARRAY_BUFFER, so `offset` is a byte offset into it.
        unsafe {
            self.gl
                .vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset);
        }
    }

    fn uniform_1_i32(&self, location: &glow::UniformLocation, value: i32) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.uniform_1_i32(Some(location), value);
        }
    }

    fn uniform_1_f32(&self, location: &glow::UniformLocation, value: f32) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.uniform_1_f32(Some(location), value);
        }
    }

    fn uniform_4_f32(&self, location: &glow::UniformLocation, [x, y, z, w]: [f32; 4]) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.uniform_4_f32(Some(location), x, y, z, w);
        }
    }

    fn uniform_matrix_4_f32(&self, location: &glow::UniformLocation, value: &[f32; 16]) {
        // SAFETY: the context is current.
        unsafe {
            self.gl
                .uniform_matrix_4_f32_slice(Some(location), false, value);
        }
    }

    fn depth_mask(&self, enabled: bool) {
        // SAFETY: the context is current.
        unsafe {
            self.gl.depth_mask(enabled);
        }
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        // SAFETY: the context is current; the renderers bind and size the
        // attribute buffers before drawing.
        unsafe {
            self.gl.draw_arrays(mode, first, count);
        }
    }
}
