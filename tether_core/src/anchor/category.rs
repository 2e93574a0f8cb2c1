// Copyright 2026 the Tether Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor categories and overlay colors.

use crate::tracking::TrackableKind;

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Rgba {
    /// Creates a color from normalized components.
    #[inline]
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit components.
    #[inline]
    #[must_use]
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// The components as an array, ready for a `vec4` uniform.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Which kind of trackable an anchor is attached to.
///
/// Each category is stored in its own partition and drawn by its own overlay
/// renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnchorCategory {
    /// Anchors placed on detected planes.
    Plane,
    /// Anchors placed on feature points.
    Point,
    /// Anchors on recognized reference images.
    Image,
    /// Anchors on tracked faces.
    Face,
}

const GREEN: Rgba = Rgba::from_rgba8(139, 195, 74, 255);
const BLUE: Rgba = Rgba::from_rgba8(66, 133, 244, 255);

impl AnchorCategory {
    /// All categories, in storage and draw order.
    pub const ALL: [Self; 4] = [Self::Plane, Self::Point, Self::Image, Self::Face];

    /// Number of categories.
    pub const COUNT: usize = Self::ALL.len();

    /// Index into per-category arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Plane => 0,
            Self::Point => 1,
            Self::Image => 2,
            Self::Face => 3,
        }
    }

    /// Short lowercase name, for logs and trace output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plane => "plane",
            Self::Point => "point",
            Self::Image => "image",
            Self::Face => "face",
        }
    }

    /// Color new anchors of this category are drawn with.
    #[must_use]
    pub const fn default_color(self) -> Rgba {
        match self {
            Self::Point => BLUE,
            Self::Plane | Self::Image | Self::Face => GREEN,
        }
    }
}

impl From<TrackableKind> for AnchorCategory {
    fn from(kind: TrackableKind) -> Self {
        match kind {
            TrackableKind::Plane => Self::Plane,
            TrackableKind::Point => Self::Point,
            TrackableKind::AugmentedImage => Self::Image,
            TrackableKind::Face => Self::Face,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_all_order() {
        for (i, c) in AnchorCategory::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
    }

    #[test]
    fn default_colors() {
        assert_eq!(
            AnchorCategory::Plane.default_color(),
            Rgba::from_rgba8(139, 195, 74, 255)
        );
        assert_eq!(
            AnchorCategory::Point.default_color(),
            Rgba::from_rgba8(66, 133, 244, 255)
        );
        assert_eq!(
            AnchorCategory::Face.default_color(),
            AnchorCategory::Image.default_color()
        );
    }

    #[test]
    fn rgba8_is_normalized() {
        let c = Rgba::from_rgba8(255, 0, 51, 255);
        assert_eq!(c.to_array(), [1.0, 0.0, 0.2, 1.0]);
    }

    #[test]
    fn trackable_kinds_map_to_categories() {
        assert_eq!(
            AnchorCategory::from(TrackableKind::AugmentedImage),
            AnchorCategory::Image
        );
        assert_eq!(
            AnchorCategory::from(TrackableKind::Point),
            AnchorCategory::Point
        );
    }
}
