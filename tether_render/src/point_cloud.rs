// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracked feature points.

use core::fmt;

use tether_core::anchor::Rgba;
use tether_core::matrix::ViewProjection;
use tether_core::tracking::PointCloud;

use crate::error::RenderError;
use crate::gl::{self, GlApi, consts};
use crate::shaders::{self, names};
use crate::state::RendererState;

const RENDERER: &str = "point_cloud";

/// Color feature points are drawn with.
pub const POINT_COLOR: Rgba = Rgba::new(31.0 / 255.0, 188.0 / 255.0, 210.0 / 255.0, 1.0);

/// Point sprite size in pixels.
pub const POINT_SIZE: f32 = 5.0;

/// What a [`PointCloudRenderer::draw`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointCloudDraw {
    /// Points drawn.
    pub drawn: usize,
    /// Points dropped by the cap.
    pub truncated: usize,
}

/// GPU resources of a ready [`PointCloudRenderer`].
pub struct PointCloudResources<G: GlApi> {
    program: G::Program,
    buffer: G::Buffer,
    a_position: u32,
    u_mvp: G::UniformLocation,
    u_color: G::UniformLocation,
    u_point_size: G::UniformLocation,
}

impl<G: GlApi> fmt::Debug for PointCloudResources<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointCloudResources")
            .field("program", &self.program)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

/// Draws the frame's feature points as point sprites.
///
/// The vertex buffer is rewritten every draw with the current points, at
/// most `max_points` of them.
pub struct PointCloudRenderer<G: GlApi> {
    state: RendererState<PointCloudResources<G>>,
    max_points: usize,
}

impl<G: GlApi> fmt::Debug for PointCloudRenderer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointCloudRenderer")
            .field("state", &self.state)
            .field("max_points", &self.max_points)
            .finish()
    }
}

impl<G: GlApi> PointCloudRenderer<G> {
    /// Creates an uninitialized renderer that draws at most `max_points`
    /// points per tick.
    #[must_use]
    pub const fn new(max_points: usize) -> Self {
        Self {
            state: RendererState::Uninitialized,
            max_points,
        }
    }

    /// Returns `true` once GPU resources exist.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// The per-tick point cap.
    #[must_use]
    pub const fn max_points(&self) -> usize {
        self.max_points
    }

    /// Links the program and allocates the vertex buffer.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if any resource cannot be created.
    pub fn create(&mut self, gl: &G) -> Result<(), RenderError> {
        self.destroy(gl);
        let program = gl::link(
            gl,
            RENDERER,
            shaders::FLAT_COLOR_VERTEX,
            shaders::FLAT_COLOR_FRAGMENT,
        )?;
        match Self::create_with_program(gl, program) {
            Ok(resources) => {
                log::info!(target: "tether::render", "point cloud renderer ready");
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
    ) -> Result<PointCloudResources<G>, RenderError> {
        let a_position = gl::attrib(gl, program, RENDERER, names::VERTEX)?;
        let u_mvp = gl::uniform(gl, program, RENDERER, names::MVP)?;
        let u_color = gl::uniform(gl, program, RENDERER, names::COLOR)?;
        let u_point_size = gl::uniform(gl, program, RENDERER, names::POINT_SIZE)?;
        let buffer = gl
            .create_buffer()
            .map_err(|log| RenderError::Allocation {
                renderer: RENDERER,
                resource: "point buffer",
                log,
            })?;
        Ok(PointCloudResources {
            program,
            buffer,
            a_position,
            u_mvp,
            u_color,
            u_point_size,
        })
    }

    /// Releases all GPU resources. A no-op when uninitialized.
    pub fn destroy(&mut self, gl: &G) {
        if let Some(r) = self.state.take() {
            gl.delete_buffer(r.buffer);
            gl.delete_program(r.program);
            log::info!(target: "tether::render", "point cloud renderer released");
        }
    }

    /// Draws `cloud` with `view_projection`'s combined matrix.
    ///
    /// Points beyond the cap are dropped (the first `max_points` are kept)
    /// and a warning is logged. Nothing is issued when the renderer is not
    /// ready or the cloud is empty.
    pub fn draw(
        &self,
        gl: &G,
        cloud: &PointCloud<'_>,
        view_projection: &ViewProjection,
    ) -> PointCloudDraw {
        let Some(r) = self.state.resources() else {
            return PointCloudDraw::default();
        };
        let (cloud, truncated) = cloud.truncated(self.max_points);
        if truncated > 0 {
            log::warn!(
                target: "tether::render",
                "point cloud truncated: drew {} of {} points",
                cloud.len(),
                cloud.len() + truncated
            );
        }
        if cloud.is_empty() {
            return PointCloudDraw {
                drawn: 0,
                truncated,
            };
        }

        gl.use_program(Some(r.program));
        gl.bind_buffer(consts::ARRAY_BUFFER, Some(r.buffer));
        gl.buffer_data(
            consts::ARRAY_BUFFER,
            bytemuck::cast_slice(cloud.as_flat()),
            consts::DYNAMIC_DRAW,
        );
        gl.vertex_attrib_pointer_f32(r.a_position, 4, 0, 0);
        gl.enable_vertex_attrib_array(r.a_position);

        gl.uniform_matrix_4_f32(&r.u_mvp, &view_projection.combined().to_cols_array());
        gl.uniform_4_f32(&r.u_color, POINT_COLOR.to_array());
        gl.uniform_1_f32(&r.u_point_size, POINT_SIZE);

        gl.draw_arrays(consts::POINTS, 0, gl::vertex_count(cloud.len()));

        gl.disable_vertex_attrib_array(r.a_position);
        gl.bind_buffer(consts::ARRAY_BUFFER, None);
        gl.use_program(None);

        PointCloudDraw {
            drawn: cloud.len(),
            truncated,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use tether_core::transform::Mat4;

    use super::*;
    use crate::fake_gl::{Call, FakeGl};

    fn vp() -> ViewProjection {
        ViewProjection::new(
            Mat4::from_translation(0.0, 0.0, -1.0),
            Mat4::from_scale(2.0, 2.0, 1.0),
        )
    }

    fn ready(gl: &FakeGl, max_points: usize) -> PointCloudRenderer<FakeGl> {
        let mut r = PointCloudRenderer::new(max_points);
        r.create(gl).unwrap();
        let _ = gl.take_calls();
        r
    }

    #[test]
    fn draws_points_with_combined_matrix() {
        let gl = FakeGl::default();
        let r = ready(&gl, 16);
        let pts = [[0.0, 0.0, -1.0, 0.9], [0.5, 0.5, -2.0, 0.4]];
        let result = r.draw(&gl, &PointCloud::new(&pts), &vp());
        assert_eq!(
            result,
            PointCloudDraw {
                drawn: 2,
                truncated: 0
            }
        );
        let calls = gl.take_calls();
        assert!(calls.contains(&Call::BufferData(pts.as_flattened().to_vec())));
        assert!(calls.contains(&Call::AttribPointer(0, 4)));
        assert!(calls.contains(&Call::UniformMat4("mvp", vp().combined().to_cols_array())));
        assert!(calls.contains(&Call::Uniform1f("point_size", 5.0)));
        assert!(calls.contains(&Call::Draw(consts::POINTS, 0, 2)));
    }

    #[test]
    fn cap_keeps_leading_points() {
        let gl = FakeGl::default();
        let r = ready(&gl, 2);
        let pts = [
            [1.0, 0.0, 0.0, 1.0],
            [2.0, 0.0, 0.0, 1.0],
            [3.0, 0.0, 0.0, 1.0],
        ];
        let result = r.draw(&gl, &PointCloud::new(&pts), &vp());
        assert_eq!(result.drawn, 2);
        assert_eq!(result.truncated, 1);
        assert_eq!(gl.draws(), vec![(consts::POINTS, 2)]);
        assert!(
            gl.take_calls()
                .contains(&Call::BufferData(pts[..2].as_flattened().to_vec()))
        );
    }

    #[test]
    fn empty_cloud_issues_no_draw() {
        let gl = FakeGl::default();
        let r = ready(&gl, 8);
        let result = r.draw(&gl, &PointCloud::new(&[]), &vp());
        assert_eq!(result, PointCloudDraw::default());
        assert!(gl.take_calls().is_empty());
    }

    #[test]
    fn uninitialized_draw_issues_no_calls() {
        let gl = FakeGl::default();
        let r = PointCloudRenderer::<FakeGl>::new(8);
        let pts = [[0.0; 4]];
        assert_eq!(
            r.draw(&gl, &PointCloud::new(&pts), &vp()),
            PointCloudDraw::default()
        );
        assert!(gl.take_calls().is_empty());
    }
}
