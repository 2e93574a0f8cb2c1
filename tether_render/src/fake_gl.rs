// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-crate `GlApi` double for renderer unit tests.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::gl::GlApi;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Link(String),
    DeleteProgram(u32),
    UseProgram(Option<u32>),
    DeleteTexture(u32),
    ActiveTexture(u32),
    BindTexture(u32, Option<u32>),
    TexParameter(u32, u32, i32),
    DeleteBuffer(u32),
    BindBuffer(Option<u32>),
    BufferData(Vec<f32>),
    EnableAttrib(u32),
    DisableAttrib(u32),
    AttribPointer(u32, i32),
    Uniform1i(&'static str, i32),
    Uniform1f(&'static str, f32),
    Uniform4f(&'static str, [f32; 4]),
    UniformMat4(&'static str, [f32; 16]),
    DepthMask(bool),
    Draw(u32, i32, i32),
}

#[derive(Debug, Default)]
pub(crate) struct FakeGl {
    pub(crate) calls: RefCell<Vec<Call>>,
    pub(crate) next: Cell<u32>,
    pub(crate) fail_link: Option<&'static str>,
    pub(crate) missing_uniform: Option<&'static str>,
}

impl FakeGl {
    fn handle(&self) -> u32 {
        let h = self.next.get() + 1;
        self.next.set(h);
        h
    }

    fn push(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    pub(crate) fn take_calls(&self) -> Vec<Call> {
        core::mem::take(&mut *self.calls.borrow_mut())
    }

    pub(crate) fn draws(&self) -> Vec<(u32, i32)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Draw(mode, _, count) => Some((*mode, *count)),
                _ => None,
            })
            .collect()
    }
}

const UNIFORMS: [&str; 4] = ["texture", "mvp", "color", "point_size"];

impl GlApi for FakeGl {
    type Program = u32;
    type Texture = u32;
    type Buffer = u32;
    type UniformLocation = &'static str;

    fn link_program(&self, label: &str, _: &str, _: &str) -> Result<u32, String> {
        self.push(Call::Link(label.to_string()));
        if self.fail_link == Some(label) {
            return Err("0:1: syntax error".to_string());
        }
        Ok(self.handle())
    }

    fn delete_program(&self, program: u32) {
        self.push(Call::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.push(Call::UseProgram(program));
    }

    fn attrib_location(&self, _: u32, name: &str) -> Option<u32> {
        match name {
            "vertex" => Some(0),
            "textureCoords" => Some(1),
            _ => None,
        }
    }

    fn uniform_location(&self, _: u32, name: &str) -> Option<&'static str> {
        if self.missing_uniform == Some(name) {
            return None;
        }
        UNIFORMS.iter().copied().find(|u| *u == name)
    }

    fn create_texture(&self) -> Result<u32, String> {
        Ok(self.handle())
    }

    fn delete_texture(&self, texture: u32) {
        self.push(Call::DeleteTexture(texture));
    }

    fn texture_name(&self, texture: u32) -> u32 {
        texture
    }

    fn active_texture(&self, unit: u32) {
        self.push(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: u32, texture: Option<u32>) {
        self.push(Call::BindTexture(target, texture));
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        self.push(Call::TexParameter(target, parameter, value));
    }

    fn create_buffer(&self) -> Result<u32, String> {
        Ok(self.handle())
    }

    fn delete_buffer(&self, buffer: u32) {
        self.push(Call::DeleteBuffer(buffer));
    }

    fn bind_buffer(&self, _: u32, buffer: Option<u32>) {
        self.push(Call::BindBuffer(buffer));
    }

    fn buffer_data(&self, _: u32, data: &[u8], _: u32) {
        let floats = data
            .chunks_exact(4)
            .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
            .collect();
        self.push(Call::BufferData(floats));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.push(Call::EnableAttrib(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.push(Call::DisableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, _: i32, _: i32) {
        self.push(Call::AttribPointer(index, size));
    }

    fn uniform_1_i32(&self, location: &&'static str, value: i32) {
        self.push(Call::Uniform1i(*location, value));
    }

    fn uniform_1_f32(&self, location: &&'static str, value: f32) {
        self.push(Call::Uniform1f(*location, value));
    }

    fn uniform_4_f32(&self, location: &&'static str, value: [f32; 4]) {
        self.push(Call::Uniform4f(*location, value));
    }

    fn uniform_matrix_4_f32(&self, location: &&'static str, value: &[f32; 16]) {
        self.push(Call::UniformMat4(*location, *value));
    }

    fn depth_mask(&self, enabled: bool) {
        self.push(Call::DepthMask(enabled));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        self.push(Call::Draw(mode, first, count));
    }
}
