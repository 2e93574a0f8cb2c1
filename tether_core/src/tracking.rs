// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Traits a tracking runtime implements to drive the pipeline.
//!
//! The runtime owns the real work (camera capture, pose estimation, hit
//! testing). The pipeline only needs the narrow surface described here:
//!
//! - [`TrackingSession`] produces one [`TrackingFrame`] per tick.
//! - [`TrackingFrame`] exposes camera matrices, the display UV transform,
//!   the sparse point cloud and hit testing for that sample.
//! - [`HitResult`] turns a hit into a [`TrackedAnchor`].
//!
//! Runtime handles are owning values: dropping a frame, hit or anchor
//! releases the underlying runtime object, and they are move-only.

use alloc::vec::Vec;

use kurbo::Point;

use crate::anchor::AnchorCategory;
use crate::error::TrackingError;
use crate::geometry::DisplayGeometry;
use crate::matrix::ClipPlanes;
use crate::transform::Mat4;
use crate::uv::UvQuad;

/// Tracking status of the camera or of an anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackingState {
    /// Pose is current and reliable.
    Tracking,
    /// Tracking is temporarily lost; the pose may recover.
    Paused,
    /// Tracking has ended for good.
    Stopped,
}

/// What kind of trackable a hit landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackableKind {
    /// A detected plane.
    Plane,
    /// A feature point.
    Point,
    /// A recognized reference image.
    AugmentedImage,
    /// A tracked face.
    Face,
}

/// An anchor owned by the runtime.
pub trait TrackedAnchor {
    /// Current tracking state.
    fn tracking_state(&self) -> TrackingState;

    /// Anchor-to-world pose.
    fn pose(&self) -> Mat4;
}

/// One result of a screen-space hit test.
pub trait HitResult {
    /// The anchor type this hit produces.
    type Anchor: TrackedAnchor;

    /// What was hit.
    fn trackable_kind(&self) -> TrackableKind;

    /// Whether an anchor may be placed here.
    ///
    /// Plane hits qualify only inside the plane's polygon; point hits only
    /// when the point has an estimated surface normal.
    fn is_placeable(&self) -> bool;

    /// Creates an anchor at the hit pose.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::AnchorRejected`] if the runtime refuses.
    fn create_anchor(self) -> Result<Self::Anchor, TrackingError>;
}

/// Sparse feature points, 4 floats per point: `x y z confidence`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointCloud<'a> {
    points: &'a [[f32; 4]],
}

impl<'a> PointCloud<'a> {
    /// Wraps a slice of points.
    #[inline]
    #[must_use]
    pub const fn new(points: &'a [[f32; 4]]) -> Self {
        Self { points }
    }

    /// The points.
    #[inline]
    #[must_use]
    pub const fn points(&self) -> &'a [[f32; 4]] {
        self.points
    }

    /// The points as one flat float slice.
    #[inline]
    #[must_use]
    pub fn as_flat(&self) -> &'a [f32] {
        self.points.as_flattened()
    }

    /// Number of points.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if there are no points.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Keeps at most the first `max` points.
    ///
    /// Returns the truncated cloud and how many points were cut.
    #[must_use]
    pub fn truncated(&self, max: usize) -> (Self, usize) {
        if self.points.len() <= max {
            return (*self, 0);
        }
        (
            Self {
                points: &self.points[..max],
            },
            self.points.len() - max,
        )
    }
}

/// One sampled tracking update.
pub trait TrackingFrame {
    /// Anchor type produced by hits on this frame.
    type Anchor: TrackedAnchor;
    /// Hit result type.
    type Hit: HitResult<Anchor = Self::Anchor>;

    /// Camera capture time in nanoseconds.
    fn timestamp_ns(&self) -> i64;

    /// Tracking state of the camera.
    fn camera_tracking_state(&self) -> TrackingState;

    /// Whether the runtime's own view of the display geometry changed since
    /// the previous frame.
    fn display_geometry_changed(&self) -> bool;

    /// Maps background-quad texture coordinates from view space into camera
    /// image space for the current display rotation.
    fn transform_display_uvs(&self, uvs: &UvQuad) -> UvQuad;

    /// World-to-camera matrix.
    fn view_matrix(&self) -> Mat4;

    /// Camera-to-clip matrix for the given clip planes and aspect ratio.
    fn projection_matrix(&self, planes: ClipPlanes, aspect_ratio: f32) -> Mat4;

    /// Feature points observed in this frame, if any.
    fn point_cloud(&self) -> Option<PointCloud<'_>>;

    /// Hit-tests the screen-space point (pixels), nearest hit first.
    fn hit_test(&self, point: Point) -> Vec<Self::Hit>;

    /// RGBA color correction for the current lighting, if valid.
    fn light_estimate(&self) -> Option<[f32; 4]>;
}

/// A tracking session.
pub trait TrackingSession {
    /// Anchor type.
    type Anchor: TrackedAnchor;
    /// Frame type.
    type Frame: TrackingFrame<Anchor = Self::Anchor>;

    /// Tells the runtime which GL texture to stream camera images into.
    fn set_camera_texture(&mut self, texture_name: u32);

    /// Tells the runtime the display rotation and viewport size.
    fn set_display_geometry(&mut self, geometry: DisplayGeometry);

    /// Advances the session and returns the newest frame.
    ///
    /// May block per the runtime's own frame timeout.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackingError`] if no frame could be produced.
    fn update(&mut self) -> Result<Self::Frame, TrackingError>;

    /// Suspends camera capture and tracking.
    fn pause(&mut self) {}

    /// Resumes a paused session.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::ResumeFailed`] if the camera could not be
    /// reacquired.
    fn resume(&mut self) -> Result<(), TrackingError> {
        Ok(())
    }
}

/// Resolves a screen-space point to a new anchor.
///
/// Takes the first placeable hit, creates an anchor there and keeps it only
/// if it is tracking; a non-tracking anchor is dropped, which releases it.
/// Returns `None` when nothing placeable was hit.
pub fn place_anchor<F: TrackingFrame>(
    frame: &F,
    point: Point,
) -> Option<(AnchorCategory, F::Anchor)> {
    let hit = frame.hit_test(point).into_iter().find(|hit| hit.is_placeable())?;
    let category = AnchorCategory::from(hit.trackable_kind());
    let anchor = match hit.create_anchor() {
        Ok(anchor) => anchor,
        Err(e) => {
            log::warn!(target: "tether::anchor", "hit at {point:?} not anchored: {e}");
            return None;
        }
    };
    if anchor.tracking_state() != TrackingState::Tracking {
        log::debug!(
            target: "tether::anchor",
            "new {category:?} anchor at {point:?} is not tracking; released"
        );
        return None;
    }
    Some((category, anchor))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_keeps_leading_points() {
        let pts = [[0.0, 0.0, 0.0, 1.0], [1.0, 0.0, 0.0, 0.5], [2.0, 0.0, 0.0, 0.2]];
        let cloud = PointCloud::new(&pts);
        let (kept, cut) = cloud.truncated(2);
        assert_eq!(kept.len(), 2);
        assert_eq!(cut, 1);
        assert_eq!(kept.points()[1], [1.0, 0.0, 0.0, 0.5]);

        let (all, none_cut) = cloud.truncated(8);
        assert_eq!(all.len(), 3);
        assert_eq!(none_cut, 0);
    }

    #[test]
    fn flat_view_has_four_floats_per_point() {
        let pts = [[1.0, 2.0, 3.0, 0.9], [4.0, 5.0, 6.0, 0.8]];
        let cloud = PointCloud::new(&pts);
        assert_eq!(cloud.as_flat(), &[1.0, 2.0, 3.0, 0.9, 4.0, 5.0, 6.0, 0.8]);
        assert!(!cloud.is_empty());
        assert!(PointCloud::new(&[]).is_empty());
    }
}
