// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`GlApi`] that records instead of rendering.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};

use tether_render::GlApi;

/// A uniform value as last set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    /// `int` / sampler.
    Int(i32),
    /// `float`.
    Float(f32),
    /// `vec4`.
    Vec4([f32; 4]),
    /// `mat4`, column-major.
    Mat4([f32; 16]),
}

/// Uniform location handed out by [`RecordingGl`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordingUniform {
    program: u32,
    name: String,
}

/// One `draw_arrays` call, with the state it was issued under.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    /// Label of the current program (`"<none>"` without one).
    pub program: String,
    /// Primitive mode.
    pub mode: u32,
    /// First vertex.
    pub first: i32,
    /// Vertex count.
    pub count: i32,
    /// Whether depth writes were enabled.
    pub depth_write: bool,
    /// The current program's `mvp` uniform, if set.
    pub mvp: Option<[f32; 16]>,
    /// The current program's `color` uniform, if set.
    pub color: Option<[f32; 4]>,
}

/// One recorded call.
#[derive(Clone, Debug, PartialEq)]
pub enum GlCall {
    /// A program was linked.
    LinkProgram {
        /// Program label.
        label: String,
        /// New handle.
        program: u32,
    },
    /// A program was deleted.
    DeleteProgram(u32),
    /// A program was made current.
    UseProgram(Option<u32>),
    /// A texture was created.
    CreateTexture(u32),
    /// A texture was deleted.
    DeleteTexture(u32),
    /// A texture unit was selected.
    ActiveTexture(u32),
    /// A texture was bound.
    BindTexture {
        /// Target.
        target: u32,
        /// Texture, or `None` to unbind.
        texture: Option<u32>,
    },
    /// A texture parameter was set.
    TexParameter {
        /// Target.
        target: u32,
        /// Parameter.
        parameter: u32,
        /// Value.
        value: i32,
    },
    /// A buffer was created.
    CreateBuffer(u32),
    /// A buffer was deleted.
    DeleteBuffer(u32),
    /// A buffer was bound.
    BindBuffer {
        /// Target.
        target: u32,
        /// Buffer, or `None` to unbind.
        buffer: Option<u32>,
    },
    /// Buffer contents were replaced.
    BufferData {
        /// Target.
        target: u32,
        /// Size in bytes.
        bytes: usize,
        /// Usage hint.
        usage: u32,
    },
    /// An attribute array was enabled.
    EnableAttrib(u32),
    /// An attribute array was disabled.
    DisableAttrib(u32),
    /// An attribute pointer was set.
    AttribPointer {
        /// Attribute.
        index: u32,
        /// Floats per vertex.
        size: i32,
    },
    /// A uniform was set.
    Uniform {
        /// Uniform name.
        name: String,
        /// New value.
        value: UniformValue,
    },
    /// Depth writes were toggled.
    DepthMask(bool),
    /// Vertices were drawn.
    Draw(DrawCall),
}

const ATTRIBUTES: [(&str, u32); 2] = [("vertex", 0), ("textureCoords", 1)];
const UNIFORMS: [&str; 4] = ["texture", "mvp", "color", "point_size"];

/// Records every [`GlApi`] call.
///
/// Handles are small integers starting at 1. Programs remember the label
/// they were linked under, uniforms are tracked per program, and each draw
/// snapshots the current program's `mvp` and `color`.
#[derive(Debug)]
pub struct RecordingGl {
    calls: RefCell<Vec<GlCall>>,
    next_handle: Cell<u32>,
    labels: RefCell<HashMap<u32, String>>,
    uniforms: RefCell<HashMap<RecordingUniform, UniformValue>>,
    live: RefCell<BTreeSet<u32>>,
    current_program: Cell<Option<u32>>,
    depth_write: Cell<bool>,
    fail_link: Option<String>,
}

impl Default for RecordingGl {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingGl {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            next_handle: Cell::new(0),
            labels: RefCell::new(HashMap::new()),
            uniforms: RefCell::new(HashMap::new()),
            live: RefCell::new(BTreeSet::new()),
            current_program: Cell::new(None),
            depth_write: Cell::new(true),
            fail_link: None,
        }
    }

    /// Makes linking the program labelled `label` fail.
    #[must_use]
    pub fn failing_link(mut self, label: &str) -> Self {
        self.fail_link = Some(label.to_owned());
        self
    }

    fn push(&self, call: GlCall) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> u32 {
        let handle = self.next_handle.get() + 1;
        self.next_handle.set(handle);
        self.live.borrow_mut().insert(handle);
        handle
    }

    fn release(&self, handle: u32) {
        self.live.borrow_mut().remove(&handle);
    }

    fn set_uniform(&self, location: &RecordingUniform, value: UniformValue) {
        self.uniforms.borrow_mut().insert(location.clone(), value);
        self.push(GlCall::Uniform {
            name: location.name.clone(),
            value,
        });
    }

    fn current_uniform(&self, name: &str) -> Option<UniformValue> {
        let program = self.current_program.get()?;
        self.uniforms
            .borrow()
            .get(&RecordingUniform {
                program,
                name: name.to_owned(),
            })
            .copied()
    }

    /// Every call recorded so far.
    #[must_use]
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.borrow().clone()
    }

    /// Number of calls recorded so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// Forgets the recorded calls (object state is kept).
    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Every draw recorded so far.
    #[must_use]
    pub fn draws(&self) -> Vec<DrawCall> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                GlCall::Draw(d) => Some(d.clone()),
                _ => None,
            })
            .collect()
    }

    /// Draws issued with the program labelled `program`.
    #[must_use]
    pub fn draws_with(&self, program: &str) -> Vec<DrawCall> {
        self.draws()
            .into_iter()
            .filter(|d| d.program == program)
            .collect()
    }

    /// Programs, textures and buffers created and not yet deleted.
    #[must_use]
    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }
}

impl GlApi for RecordingGl {
    type Program = u32;
    type Texture = u32;
    type Buffer = u32;
    type UniformLocation = RecordingUniform;

    fn link_program(&self, label: &str, _: &str, _: &str) -> Result<u32, String> {
        if self.fail_link.as_deref() == Some(label) {
            return Err(format!("{label}: scripted link failure"));
        }
        let program = self.allocate();
        self.labels.borrow_mut().insert(program, label.to_owned());
        self.push(GlCall::LinkProgram {
            label: label.to_owned(),
            program,
        });
        Ok(program)
    }

    fn delete_program(&self, program: u32) {
        self.release(program);
        self.push(GlCall::DeleteProgram(program));
    }

    fn use_program(&self, program: Option<u32>) {
        self.current_program.set(program);
        self.push(GlCall::UseProgram(program));
    }

    fn attrib_location(&self, _: u32, name: &str) -> Option<u32> {
        ATTRIBUTES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, index)| index)
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<RecordingUniform> {
        UNIFORMS.iter().any(|u| *u == name).then(|| RecordingUniform {
            program,
            name: name.to_owned(),
        })
    }

    fn create_texture(&self) -> Result<u32, String> {
        let texture = self.allocate();
        self.push(GlCall::CreateTexture(texture));
        Ok(texture)
    }

    fn delete_texture(&self, texture: u32) {
        self.release(texture);
        self.push(GlCall::DeleteTexture(texture));
    }

    fn texture_name(&self, texture: u32) -> u32 {
        texture
    }

    fn active_texture(&self, unit: u32) {
        self.push(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: u32, texture: Option<u32>) {
        self.push(GlCall::BindTexture { target, texture });
    }

    fn tex_parameter_i32(&self, target: u32, parameter: u32, value: i32) {
        self.push(GlCall::TexParameter {
            target,
            parameter,
            value,
        });
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let buffer = self.allocate();
        self.push(GlCall::CreateBuffer(buffer));
        Ok(buffer)
    }

    fn delete_buffer(&self, buffer: u32) {
        self.release(buffer);
        self.push(GlCall::DeleteBuffer(buffer));
    }

    fn bind_buffer(&self, target: u32, buffer: Option<u32>) {
        self.push(GlCall::BindBuffer { target, buffer });
    }

    fn buffer_data(&self, target: u32, data: &[u8], usage: u32) {
        self.push(GlCall::BufferData {
            target,
            bytes: data.len(),
            usage,
        });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.push(GlCall::EnableAttrib(index));
    }

    fn disable_vertex_attrib_array(&self, index: u32) {
        self.push(GlCall::DisableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, _: i32, _: i32) {
        self.push(GlCall::AttribPointer { index, size });
    }

    fn uniform_1_i32(&self, location: &RecordingUniform, value: i32) {
        self.set_uniform(location, UniformValue::Int(value));
    }

    fn uniform_1_f32(&self, location: &RecordingUniform, value: f32) {
        self.set_uniform(location, UniformValue::Float(value));
    }

    fn uniform_4_f32(&self, location: &RecordingUniform, value: [f32; 4]) {
        self.set_uniform(location, UniformValue::Vec4(value));
    }

    fn uniform_matrix_4_f32(&self, location: &RecordingUniform, value: &[f32; 16]) {
        self.set_uniform(location, UniformValue::Mat4(*value));
    }

    fn depth_mask(&self, enabled: bool) {
        self.depth_write.set(enabled);
        self.push(GlCall::DepthMask(enabled));
    }

    fn draw_arrays(&self, mode: u32, first: i32, count: i32) {
        let program = self
            .current_program
            .get()
            .and_then(|p| self.labels.borrow().get(&p).cloned())
            .unwrap_or_else(|| "<none>".to_owned());
        let mvp = match self.current_uniform("mvp") {
            Some(UniformValue::Mat4(m)) => Some(m),
            _ => None,
        };
        let color = match self.current_uniform("color") {
            Some(UniformValue::Vec4(c)) => Some(c),
            _ => None,
        };
        self.push(GlCall::Draw(DrawCall {
            program,
            mode,
            first,
            count,
            depth_write: self.depth_write.get(),
            mvp,
            color,
        }));
    }
}

#[cfg(test)]
mod tests {
    use tether_core::anchor::AnchorCategory;
    use tether_core::matrix::ViewProjection;
    use tether_core::transform::Mat4;
    use tether_render::gl::consts;
    use tether_render::{BackgroundRenderer, OverlayRenderers};

    use super::*;

    #[test]
    fn draws_snapshot_the_current_uniforms() {
        let gl = RecordingGl::new();
        let mut overlays = OverlayRenderers::new();
        overlays.create_all(&gl).unwrap();
        let vp = ViewProjection::new(Mat4::from_translation(0.0, 0.0, -3.0), Mat4::IDENTITY);
        let color = AnchorCategory::Plane.default_color();
        overlays
            .get(AnchorCategory::Plane)
            .draw(&gl, &vp, Mat4::IDENTITY, color);

        let draws = gl.draws_with("plane");
        assert_eq!(draws.len(), 1, "one plane draw");
        assert_eq!(draws[0].mode, consts::TRIANGLE_STRIP, "strip");
        assert_eq!(draws[0].mvp, Some(vp.combined().to_cols_array()), "mvp");
        assert_eq!(draws[0].color, Some(color.to_array()), "color");
    }

    #[test]
    fn live_objects_track_creation_and_deletion() {
        let gl = RecordingGl::new();
        let mut background = BackgroundRenderer::new(0);
        background.create(&gl).unwrap();
        assert_eq!(gl.live_objects(), 4, "program, texture, two buffers");
        background.destroy(&gl);
        assert_eq!(gl.live_objects(), 0, "all released");
    }

    #[test]
    fn scripted_link_failure() {
        let gl = RecordingGl::new().failing_link("background");
        let mut background = BackgroundRenderer::new(0);
        assert!(background.create(&gl).is_err(), "link fails");
        assert_eq!(gl.live_objects(), 0, "nothing leaked");
    }
}
