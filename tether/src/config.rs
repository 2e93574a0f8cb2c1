// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orchestrator configuration.

use tether_core::anchor::AnchorCategory;
use tether_core::matrix::ClipPlanes;

/// Which overlays are drawn.
///
/// Hidden anchor categories are still swept every tick; they are only
/// skipped at draw time. `point` also gates the feature point cloud.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OverlayVisibility {
    /// Anchors on planes.
    pub plane: bool,
    /// Anchors on feature points, and the point cloud itself.
    pub point: bool,
    /// Anchors on reference images.
    pub image: bool,
    /// Anchors on faces.
    pub face: bool,
}

impl OverlayVisibility {
    /// Every overlay visible.
    pub const ALL: Self = Self {
        plane: true,
        point: true,
        image: true,
        face: true,
    };

    /// Every overlay hidden.
    pub const NONE: Self = Self {
        plane: false,
        point: false,
        image: false,
        face: false,
    };

    /// Returns `true` if anchors of `category` are drawn.
    #[must_use]
    pub const fn shows(self, category: AnchorCategory) -> bool {
        match category {
            AnchorCategory::Plane => self.plane,
            AnchorCategory::Point => self.point,
            AnchorCategory::Image => self.image,
            AnchorCategory::Face => self.face,
        }
    }
}

impl Default for OverlayVisibility {
    fn default() -> Self {
        Self::ALL
    }
}

/// Settings for a [`FrameOrchestrator`](crate::FrameOrchestrator).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    /// Near and far planes of the projection matrix.
    pub clip_planes: ClipPlanes,
    /// Most feature points drawn per tick.
    pub max_points: usize,
    /// Initial overlay visibility.
    pub visibility: OverlayVisibility,
    /// Texture unit the camera texture is sampled on.
    pub camera_texture_unit: u32,
    /// Touches buffered by an [`InputHandle`](crate::InputHandle) between
    /// ticks before the oldest is dropped.
    pub touch_queue_capacity: usize,
}

impl Config {
    /// Defaults for a phone or tablet held in the hand.
    #[must_use]
    pub const fn handheld() -> Self {
        Self {
            clip_planes: ClipPlanes::DEFAULT,
            max_points: 8192,
            visibility: OverlayVisibility::ALL,
            camera_texture_unit: 0,
            touch_queue_capacity: 16,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::handheld()
    }
}
