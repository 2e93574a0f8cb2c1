// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The GLES surface the renderers draw through.
//!
//! [`GlApi`] is deliberately shaped like the subset of GLES 2.0 the renderers
//! use, with typed handles instead of raw integers. Shader compilation is
//! folded into [`GlApi::link_program`]: the renderers only need "a linked
//! program for these sources".

use alloc::string::String;
use core::fmt;

use crate::error::RenderError;

/// GL enum values used by the renderers.
pub mod consts {
    /// `GL_TEXTURE_EXTERNAL_OES`, the camera-stream texture target.
    pub const TEXTURE_EXTERNAL_OES: u32 = 0x8D65;
    /// `GL_TEXTURE_MIN_FILTER`.
    pub const TEXTURE_MIN_FILTER: u32 = 0x2801;
    /// `GL_TEXTURE_MAG_FILTER`.
    pub const TEXTURE_MAG_FILTER: u32 = 0x2800;
    /// `GL_TEXTURE_WRAP_S`.
    pub const TEXTURE_WRAP_S: u32 = 0x2802;
    /// `GL_TEXTURE_WRAP_T`.
    pub const TEXTURE_WRAP_T: u32 = 0x2803;
    /// `GL_LINEAR`.
    pub const LINEAR: u32 = 0x2601;
    /// `GL_CLAMP_TO_EDGE`.
    pub const CLAMP_TO_EDGE: u32 = 0x812F;
    /// `GL_ARRAY_BUFFER`.
    pub const ARRAY_BUFFER: u32 = 0x8892;
    /// `GL_STATIC_DRAW`.
    pub const STATIC_DRAW: u32 = 0x88E4;
    /// `GL_DYNAMIC_DRAW`.
    pub const DYNAMIC_DRAW: u32 = 0x88E8;
    /// `GL_POINTS`.
    pub const POINTS: u32 = 0x0000;
    /// `GL_TRIANGLE_STRIP`.
    pub const TRIANGLE_STRIP: u32 = 0x0005;
}

/// Typed access to a GLES context.
///
/// All methods take `&self`: a GL context is implicitly mutable global state
/// bound to the calling thread, and implementations must only be used on the
/// thread where their context is current.
pub trait GlApi {
    /// Linked program handle.
    type Program: Copy + fmt::Debug + PartialEq;
    /// Texture handle.
    type Texture: Copy + fmt::Debug + PartialEq;
    /// Buffer handle.
    type Buffer: Copy + fmt::Debug + PartialEq;
    /// Uniform location.
    type UniformLocation: Clone + fmt::Debug;

    /// Compiles both shaders and links them into a program.
    ///
    /// `label` names the program in logs and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns the compiler or linker log on failure.
    fn link_program(
        &self,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self::Program, String>;
    /// Deletes a program.
    fn delete_program(&self, program: Self::Program);
    /// Makes `program` current, or unbinds with `None`.
    fn use_program(&self, program: Option<Self::Program>);
    /// Looks up a vertex attribute.
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    /// Looks up a uniform.
    fn uniform_location(&self, program: Self::Program, name: &str)
    -> Option<Self::UniformLocation>;

    /// Allocates a texture object.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure.
    fn create_texture(&self) -> Result<Self::Texture, String>;
    /// Deletes a texture.
    fn delete_texture(&self, texture: Self::Texture);
    /// The raw GL name of a texture, as handed to the tracking runtime.
    fn texture_name(&self, texture: Self::Texture) -> u32;
    /// Selects texture unit `unit` (0-based, i.e. `GL_TEXTURE0 + unit`).
    fn active_texture(&self, unit: u32);
    /// Binds `texture` to `target`, or unbinds with `None`.
    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    /// Sets an integer texture parameter on the texture bound to `target`.
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32);

    /// Allocates a buffer object.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure.
    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    /// Deletes a buffer.
    fn delete_buffer(&self, buffer: Self::Buffer);
    /// Binds `buffer` to `target`, or unbinds with `None`.
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>);
    /// Replaces the contents of the buffer bound to `target`.
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32);

    /// Enables a vertex attribute array.
    fn enable_vertex_attrib_array(&self, index: u32);
    /// Disables a vertex attribute array.
    fn disable_vertex_attrib_array(&self, index: u32);
    /// Points attribute `index` at `size` floats per vertex in the bound
    /// array buffer.
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32);

    /// Sets an `int`/`sampler` uniform on the current program.
    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32);
    /// Sets a `float` uniform on the current program.
    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32);
    /// Sets a `vec4` uniform on the current program.
    fn uniform_4_f32(&self, location: &Self::UniformLocation, value: [f32; 4]);
    /// Sets a column-major `mat4` uniform on the current program.
    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, value: &[f32; 16]);

    /// Enables or disables depth writes.
    fn depth_mask(&self, enabled: bool);
    /// Draws `count` vertices starting at `first`.
    fn draw_arrays(&self, mode: u32, first: i32, count: i32);
}

impl<G: GlApi + ?Sized> GlApi for &G {
    type Program = G::Program;
    type Texture = G::Texture;
    type Buffer = G::Buffer;
    type UniformLocation = G::UniformLocation;

    fn link_program(
        &self,
        label: &str,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self::Program, String> {
        (**self).link_program(label, vertex_src, fragment_src)
    }
    fn delete_program(&self, program: Self::Program) {
        (**self).delete_program(program);
    }
    fn use_program(&self, program: Option<Self::Program>) {
        (**self).use_program(program);
    }
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        (**self).attrib_location(program, name)
    }
    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        (**self).uniform_location(program, name)
    }
    fn create_texture(&self) -> Result<Self::Texture, String> {
        (**self).create_texture()
    }
    fn delete_texture(&self, texture: Self::Texture) {
        (**self).delete_texture(texture);
    }
    fn texture_name(&self, texture: Self::Texture) -> u32 {
        (**self).texture_name(texture)
    }
    fn active_texture(&self, unit: u32) {
        (**self).active_texture(unit);
    }
    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        (**self).bind_texture(target, texture);
    }
    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        (**self).tex_parameter_i32(target, parameter, value);
    }
    fn create_buffer(&self) -> Result<Self::Buffer, String> {
        (**self).create_buffer()
    }
    fn delete_buffer(&self, buffer: Self::Buffer) {
        (**self).delete_buffer(buffer);
    }
    fn bind_buffer(&self, target: u32, buffer: Option<Self::Buffer>) {
        (**self).bind_buffer(target, buffer);
    }
    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        (**self).buffer_data(target, data, usage);
    }
    fn enable_vertex_attrib_array(&self, index: u32) {
        (**self).enable_vertex_attrib_array(index);
    }
    fn disable_vertex_attrib_array(&self, index: u32) {
        (**self).disable_vertex_attrib_array(index);
    }
    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        (**self).vertex_attrib_pointer_f32(index, size, stride, offset);
    }
    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        (**self).uniform_1_i32(location, value);
    }
    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32) {
        (**self).uniform_1_f32(location, value);
    }
    fn uniform_4_f32(&self, location: &Self::UniformLocation, value: [f32; 4]) {
        (**self).uniform_4_f32(location, value);
    }
    fn uniform_matrix_4_f32(&self, location: &Self::UniformLocation, value: &[f32; 16]) {
        (**self).uniform_matrix_4_f32(location, value);
    }
    fn depth_mask(&self, enabled: bool) {
        (**self).depth_mask(enabled);
    }
    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        (**self).draw_arrays(mode, first, count);
    }
}

/// Links a program, logging and wrapping the failure.
pub(crate) fn link<G: GlApi>(
    gl: &G,
    renderer: &'static str,
    vertex_src: &str,
    fragment_src: &str,
) -> Result<G::Program, RenderError> {
    gl.link_program(renderer, vertex_src, fragment_src)
        .map_err(|log| {
            log::error!(target: "tether::render", "{renderer}: program link failed: {log}");
            RenderError::ProgramLink { renderer, log }
        })
}

/// Looks up a required attribute.
pub(crate) fn attrib<G: GlApi>(
    gl: &G,
    program: G::Program,
    renderer: &'static str,
    name: &'static str,
) -> Result<u32, RenderError> {
    gl.attrib_location(program, name)
        .ok_or(RenderError::MissingAttribute { renderer, name })
}

/// Looks up a required uniform.
pub(crate) fn uniform<G: GlApi>(
    gl: &G,
    program: G::Program,
    renderer: &'static str,
    name: &'static str,
) -> Result<G::UniformLocation, RenderError> {
    gl.uniform_location(program, name)
        .ok_or(RenderError::MissingUniform { renderer, name })
}

/// Creates a buffer and fills it with `data`.
pub(crate) fn static_buffer<G: GlApi>(
    gl: &G,
    renderer: &'static str,
    data: &[u8],
) -> Result<G::Buffer, RenderError> {
    let buffer = gl
        .create_buffer()
        .map_err(|log| RenderError::Allocation {
            renderer,
            resource: "vertex buffer",
            log,
        })?;
    gl.bind_buffer(consts::ARRAY_BUFFER, Some(buffer));
    gl.buffer_data(consts::ARRAY_BUFFER, data, consts::STATIC_DRAW);
    gl.bind_buffer(consts::ARRAY_BUFFER, None);
    Ok(buffer)
}

/// Converts a vertex count to the `GLsizei` `draw_arrays` takes.
pub(crate) fn vertex_count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
