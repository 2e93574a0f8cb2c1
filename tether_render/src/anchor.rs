// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor overlay markers.
//!
//! Every [`AnchorCategory`] gets its own [`AnchorRenderer`] with its own
//! marker geometry: anchors on surfaces (planes and images) are drawn as a
//! small flat square lying in the anchor's local XZ plane, anchors on points
//! and faces as a single point sprite at the anchor origin.

use core::fmt;

use tether_core::anchor::{AnchorCategory, Rgba};
use tether_core::matrix::ViewProjection;
use tether_core::transform::Mat4;

use crate::error::RenderError;
use crate::gl::{self, GlApi, consts};
use crate::shaders::{self, names};
use crate::state::RendererState;

/// Half the side of the square marker, in meters.
pub const QUAD_HALF_EXTENT: f32 = 0.1;

/// Point sprite size of point-like markers, in pixels.
pub const MARKER_POINT_SIZE: f32 = 15.0;

/// Geometry of an anchor marker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarkerShape {
    /// A flat square on the anchor's XZ plane, drawn as a triangle strip.
    Quad {
        /// Half the side length.
        half_extent: f32,
    },
    /// A single point sprite at the anchor origin.
    Point {
        /// Sprite size in pixels.
        size: f32,
    },
}

impl MarkerShape {
    /// The marker used for anchors of `category`.
    #[must_use]
    pub const fn for_category(category: AnchorCategory) -> Self {
        match category {
            AnchorCategory::Plane | AnchorCategory::Image => Self::Quad {
                half_extent: QUAD_HALF_EXTENT,
            },
            AnchorCategory::Point | AnchorCategory::Face => Self::Point {
                size: MARKER_POINT_SIZE,
            },
        }
    }

    /// Vertex positions, three floats per vertex.
    fn vertices(self) -> ([[f32; 3]; 4], usize) {
        match self {
            Self::Quad { half_extent: h } => (
                [[-h, 0.0, -h], [h, 0.0, -h], [-h, 0.0, h], [h, 0.0, h]],
                4,
            ),
            Self::Point { .. } => ([[0.0; 3]; 4], 1),
        }
    }

    const fn mode(self) -> u32 {
        match self {
            Self::Quad { .. } => consts::TRIANGLE_STRIP,
            Self::Point { .. } => consts::POINTS,
        }
    }

    const fn point_size(self) -> f32 {
        match self {
            // Ignored by the rasterizer for triangles.
            Self::Quad { .. } => 1.0,
            Self::Point { size } => size,
        }
    }
}

/// GPU resources of a ready [`AnchorRenderer`].
pub struct AnchorResources<G: GlApi> {
    program: G::Program,
    buffer: G::Buffer,
    vertex_count: usize,
    a_position: u32,
    u_mvp: G::UniformLocation,
    u_color: G::UniformLocation,
    u_point_size: G::UniformLocation,
}

impl<G: GlApi> fmt::Debug for AnchorResources<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorResources")
            .field("program", &self.program)
            .field("buffer", &self.buffer)
            .field("vertex_count", &self.vertex_count)
            .finish_non_exhaustive()
    }
}

/// Draws markers for the anchors of one category.
pub struct AnchorRenderer<G: GlApi> {
    category: AnchorCategory,
    shape: MarkerShape,
    state: RendererState<AnchorResources<G>>,
}

impl<G: GlApi> fmt::Debug for AnchorRenderer<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnchorRenderer")
            .field("category", &self.category)
            .field("shape", &self.shape)
            .field("state", &self.state)
            .finish()
    }
}

impl<G: GlApi> AnchorRenderer<G> {
    /// Creates an uninitialized renderer for `category`'s markers.
    #[must_use]
    pub const fn new(category: AnchorCategory) -> Self {
        Self {
            category,
            shape: MarkerShape::for_category(category),
            state: RendererState::Uninitialized,
        }
    }

    /// The category this renderer draws.
    #[must_use]
    pub const fn category(&self) -> AnchorCategory {
        self.category
    }

    /// The marker geometry.
    #[must_use]
    pub const fn shape(&self) -> MarkerShape {
        self.shape
    }

    /// Returns `true` once GPU resources exist.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// Links the program and uploads the marker geometry.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if any resource cannot be created.
    pub fn create(&mut self, gl: &G) -> Result<(), RenderError> {
        self.destroy(gl);
        let renderer = self.category.name();
        let program = gl::link(
            gl,
            renderer,
            shaders::FLAT_COLOR_VERTEX,
            shaders::FLAT_COLOR_FRAGMENT,
        )?;
        match self.create_with_program(gl, program) {
            Ok(resources) => {
                log::info!(target: "tether::render", "{renderer} anchor renderer ready");
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
        &self,
        gl: &G,
        program: G::Program,
    ) -> Result<AnchorResources<G>, RenderError> {
        let renderer = self.category.name();
        let a_position = gl::attrib(gl, program, renderer, names::VERTEX)?;
        let u_mvp = gl::uniform(gl, program, renderer, names::MVP)?;
        let u_color = gl::uniform(gl, program, renderer, names::COLOR)?;
        let u_point_size = gl::uniform(gl, program, renderer, names::POINT_SIZE)?;
        let (vertices, vertex_count) = self.shape.vertices();
        let buffer = gl::static_buffer(
            gl,
            renderer,
            bytemuck::cast_slice(vertices[..vertex_count].as_flattened()),
        )?;
        Ok(AnchorResources {
            program,
            buffer,
            vertex_count,
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
            log::info!(
                target: "tether::render",
                "{} anchor renderer released",
                self.category.name()
            );
        }
    }

    /// Draws one marker at `model` in `color`.
    ///
    /// Returns `false` without issuing GL calls when not ready.
    pub fn draw(
        &self,
        gl: &G,
        view_projection: &ViewProjection,
        model: Mat4,
        color: Rgba,
    ) -> bool {
        let Some(r) = self.state.resources() else {
            return false;
        };
        let mvp = view_projection.model_view_projection(model);

        gl.use_program(Some(r.program));
        gl.bind_buffer(consts::ARRAY_BUFFER, Some(r.buffer));
        gl.vertex_attrib_pointer_f32(r.a_position, 3, 0, 0);
        gl.enable_vertex_attrib_array(r.a_position);

        gl.uniform_matrix_4_f32(&r.u_mvp, &mvp.to_cols_array());
        gl.uniform_4_f32(&r.u_color, color.to_array());
        gl.uniform_1_f32(&r.u_point_size, self.shape.point_size());

        gl.draw_arrays(self.shape.mode(), 0, gl::vertex_count(r.vertex_count));

        gl.disable_vertex_attrib_array(r.a_position);
        gl.bind_buffer(consts::ARRAY_BUFFER, None);
        gl.use_program(None);
        true
    }
}

/// One [`AnchorRenderer`] per category.
pub struct OverlayRenderers<G: GlApi> {
    renderers: [AnchorRenderer<G>; AnchorCategory::COUNT],
}

impl<G: GlApi> fmt::Debug for OverlayRenderers<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.renderers.iter()).finish()
    }
}

impl<G: GlApi> Default for OverlayRenderers<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GlApi> OverlayRenderers<G> {
    /// Creates all renderers, uninitialized.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            renderers: [
                AnchorRenderer::new(AnchorCategory::Plane),
                AnchorRenderer::new(AnchorCategory::Point),
                AnchorRenderer::new(AnchorCategory::Image),
                AnchorRenderer::new(AnchorCategory::Face),
            ],
        }
    }

    /// The renderer for `category`.
    #[must_use]
    pub const fn get(&self, category: AnchorCategory) -> &AnchorRenderer<G> {
        &self.renderers[category.index()]
    }

    /// Returns `true` if every renderer is ready.
    #[must_use]
    pub fn all_ready(&self) -> bool {
        self.renderers.iter().all(AnchorRenderer::is_ready)
    }

    /// Creates every renderer, in category order.
    ///
    /// On error the renderers created so far are released again.
    ///
    /// # Errors
    ///
    /// Returns the first [`RenderError`].
    pub fn create_all(&mut self, gl: &G) -> Result<(), RenderError> {
        for i in 0..self.renderers.len() {
            if let Err(e) = self.renderers[i].create(gl) {
                self.destroy_all(gl);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Releases every renderer, in reverse category order.
    pub fn destroy_all(&mut self, gl: &G) {
        for r in self.renderers.iter_mut().rev() {
            r.destroy(gl);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::fake_gl::{Call, FakeGl};

    fn ready(gl: &FakeGl) -> OverlayRenderers<FakeGl> {
        let mut overlays = OverlayRenderers::new();
        overlays.create_all(gl).unwrap();
        let _ = gl.take_calls();
        overlays
    }

    #[test]
    fn shapes_follow_category() {
        assert!(matches!(
            MarkerShape::for_category(AnchorCategory::Plane),
            MarkerShape::Quad { .. }
        ));
        assert!(matches!(
            MarkerShape::for_category(AnchorCategory::Image),
            MarkerShape::Quad { .. }
        ));
        assert!(matches!(
            MarkerShape::for_category(AnchorCategory::Point),
            MarkerShape::Point { .. }
        ));
        assert!(matches!(
            MarkerShape::for_category(AnchorCategory::Face),
            MarkerShape::Point { .. }
        ));
    }

    #[test]
    fn create_all_links_one_program_per_category() {
        let gl = FakeGl::default();
        let mut overlays = OverlayRenderers::new();
        overlays.create_all(&gl).unwrap();
        assert!(overlays.all_ready());
        let links: Vec<_> = gl
            .take_calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Link(label) => Some(label),
                _ => None,
            })
            .collect();
        assert_eq!(links, ["plane", "point", "image", "face"]);
    }

    #[test]
    fn plane_marker_is_a_strip_with_model_view_projection() {
        let gl = FakeGl::default();
        let overlays = ready(&gl);
        let vp = ViewProjection::new(
            Mat4::from_translation(0.0, 0.0, -2.0),
            Mat4::from_scale(0.5, 0.5, 1.0),
        );
        let model = Mat4::from_translation(1.0, 0.0, 0.0);
        let color = AnchorCategory::Plane.default_color();
        assert!(
            overlays
                .get(AnchorCategory::Plane)
                .draw(&gl, &vp, model, color)
        );

        let calls = gl.take_calls();
        let expected = vp.model_view_projection(model).to_cols_array();
        assert!(calls.contains(&Call::UniformMat4("mvp", expected)));
        assert!(calls.contains(&Call::Uniform4f("color", color.to_array())));
        assert!(calls.contains(&Call::Draw(consts::TRIANGLE_STRIP, 0, 4)));
    }

    #[test]
    fn point_marker_is_a_single_sprite() {
        let gl = FakeGl::default();
        let overlays = ready(&gl);
        let vp = ViewProjection::new(Mat4::IDENTITY, Mat4::IDENTITY);
        overlays.get(AnchorCategory::Point).draw(
            &gl,
            &vp,
            Mat4::IDENTITY,
            AnchorCategory::Point.default_color(),
        );
        assert_eq!(gl.draws(), vec![(consts::POINTS, 1)]);
        assert!(
            gl.take_calls()
                .contains(&Call::Uniform1f("point_size", MARKER_POINT_SIZE))
        );
    }

    #[test]
    fn failure_releases_earlier_renderers() {
        let gl = FakeGl {
            fail_link: Some("image"),
            ..FakeGl::default()
        };
        let mut overlays = OverlayRenderers::new();
        let err = overlays.create_all(&gl).unwrap_err();
        assert!(matches!(
            err,
            RenderError::ProgramLink {
                renderer: "image",
                ..
            }
        ));
        assert!(!overlays.get(AnchorCategory::Plane).is_ready());
        assert!(!overlays.get(AnchorCategory::Point).is_ready());
        let deleted = gl
            .take_calls()
            .iter()
            .filter(|c| matches!(c, Call::DeleteProgram(_)))
            .count();
        assert_eq!(deleted, 2);
    }

    #[test]
    fn destroy_all_runs_in_reverse_order() {
        let gl = FakeGl::default();
        let mut overlays = ready(&gl);
        overlays.destroy_all(&gl);
        let programs: Vec<_> = gl
            .take_calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::DeleteProgram(p) => Some(p),
                _ => None,
            })
            .collect();
        // Handles are allocated program, buffer per category starting at 1.
        assert_eq!(programs, [7, 5, 3, 1]);
        assert!(!overlays.all_ready());
    }

    #[test]
    fn uninitialized_draw_issues_no_calls() {
        let gl = FakeGl::default();
        let r = AnchorRenderer::<FakeGl>::new(AnchorCategory::Face);
        let vp = ViewProjection::new(Mat4::IDENTITY, Mat4::IDENTITY);
        assert!(!r.draw(&gl, &vp, Mat4::IDENTITY, Rgba::new(1.0, 1.0, 1.0, 1.0)));
        assert!(gl.take_calls().is_empty());
    }
}
