// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick camera matrices.
//!
//! [`MatrixProvider::compute`] reads the view matrix from the frame's camera
//! pose and asks the frame for a projection with the configured clip planes
//! and the current aspect ratio. The result is never cached across ticks:
//! every draw in a tick uses the one [`ViewProjection`] computed at the start
//! of that tick.

use crate::geometry::DisplayGeometry;
use crate::tracking::TrackingFrame;
use crate::transform::Mat4;

/// Near and far clip plane distances in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipPlanes {
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
}

impl ClipPlanes {
    /// 10 cm to 100 m, suitable for handheld AR.
    pub const DEFAULT: Self = Self {
        near: 0.1,
        far: 100.0,
    };
}

impl Default for ClipPlanes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// View and projection matrices for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewProjection {
    view: Mat4,
    projection: Mat4,
}

impl ViewProjection {
    /// Pairs a view matrix with a projection matrix.
    #[inline]
    #[must_use]
    pub const fn new(view: Mat4, projection: Mat4) -> Self {
        Self { view, projection }
    }

    /// World-to-camera matrix.
    #[inline]
    #[must_use]
    pub const fn view(&self) -> Mat4 {
        self.view
    }

    /// Camera-to-clip matrix.
    #[inline]
    #[must_use]
    pub const fn projection(&self) -> Mat4 {
        self.projection
    }

    /// `projection * view`.
    #[inline]
    #[must_use]
    pub fn combined(&self) -> Mat4 {
        self.projection * self.view
    }

    /// `view * model`.
    #[inline]
    #[must_use]
    pub fn model_view(&self, model: Mat4) -> Mat4 {
        self.view * model
    }

    /// `projection * view * model`.
    #[inline]
    #[must_use]
    pub fn model_view_projection(&self, model: Mat4) -> Mat4 {
        self.projection * self.view * model
    }
}

/// Derives a [`ViewProjection`] from a frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct MatrixProvider {
    planes: ClipPlanes,
}

impl MatrixProvider {
    /// Creates a provider that requests projections with `planes`.
    #[must_use]
    pub const fn new(planes: ClipPlanes) -> Self {
        Self { planes }
    }

    /// The configured clip planes.
    #[inline]
    #[must_use]
    pub const fn planes(&self) -> ClipPlanes {
        self.planes
    }

    /// Computes this tick's matrices.
    #[must_use]
    pub fn compute<F: TrackingFrame>(&self, frame: &F, geometry: &DisplayGeometry) -> ViewProjection {
        ViewProjection {
            view: frame.view_matrix(),
            projection: frame.projection_matrix(self.planes, geometry.aspect_ratio()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_is_projection_times_view() {
        let view = Mat4::from_translation(0.0, 0.0, -2.0);
        let projection = Mat4::from_scale(0.5, 0.5, 1.0);
        let vp = ViewProjection::new(view, projection);
        assert_eq!(vp.combined(), projection * view);
        assert_eq!(vp.combined().col(3), [0.0, 0.0, -2.0, 1.0]);
    }

    #[test]
    fn model_view_projection_applies_model_first() {
        let vp = ViewProjection::new(Mat4::from_translation(1.0, 0.0, 0.0), Mat4::IDENTITY);
        let model = Mat4::from_scale(3.0, 3.0, 3.0);
        let mvp = vp.model_view_projection(model);
        assert_eq!(mvp.transform_point([1.0, 0.0, 0.0]), [4.0, 0.0, 0.0, 1.0]);
        assert_eq!(vp.model_view(model), mvp);
    }

    #[test]
    fn default_planes_are_handheld() {
        let p = MatrixProvider::default().planes();
        assert_eq!(p.near, 0.1);
        assert_eq!(p.far, 100.0);
    }
}
